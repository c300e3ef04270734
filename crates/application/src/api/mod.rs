//! Typed bindings for the manuscript API's resources.
//!
//! Each binding wraps an [`ApiClient`](crate::ApiClient), so every call goes
//! through the same authentication and refresh handling.

mod auth;
mod manuscripts;
mod users;
mod workspaces;

pub use auth::AuthApi;
pub use manuscripts::ManuscriptApi;
pub use users::UsersApi;
pub use workspaces::WorkspaceApi;
