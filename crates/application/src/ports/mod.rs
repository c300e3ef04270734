//! Port definitions (interfaces)
//!
//! Ports define the boundaries between the client core and the outside
//! world. Each port is a trait implemented by adapters in the
//! infrastructure layer.

mod credential_storage;
mod transport;

pub use credential_storage::{CredentialStorage, StorageError};
pub use transport::{HttpTransport, TransportError};
