//! Folio Application - Session handling and the authenticated API client
//!
//! This crate owns the client-side session, the refresh-once interceptor
//! around every request, and the typed resource APIs built on top of it.
//! I/O is reached only through the ports in [`ports`].

pub mod api;
pub mod auth;
pub mod client;
pub mod error;
pub mod ports;
pub mod session;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod testing;

pub use api::{AuthApi, ManuscriptApi, UsersApi, WorkspaceApi};
pub use auth::{DEFAULT_REFRESH_PATH, RefreshGate, RefreshOutcome, TokenRefresher};
pub use client::ApiClient;
pub use error::{ApiError, ApiResult};
pub use ports::{CredentialStorage, HttpTransport, StorageError, TransportError};
pub use session::{MemoryCredentialStorage, SessionError, SessionStore};
