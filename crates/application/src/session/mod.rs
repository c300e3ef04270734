//! Session state and its storage.

mod memory;
mod store;

pub use memory::MemoryCredentialStorage;
pub use store::{ACCESS_TOKEN_KEY, COOKIES_KEY, SessionError, SessionStore, USER_DATA_KEY};
