//! Durable credential storage port
//!
//! Defines the cookie-equivalent store the session is mirrored into so a
//! restart reconstructs the same signed-in state.

use async_trait::async_trait;

/// Errors that can occur while reading or writing stored credentials.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StorageError {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Named string entries that survive a process restart.
///
/// Values are opaque to the storage; the session store puts JSON-encoded
/// text in them.
#[async_trait]
pub trait CredentialStorage: Send + Sync {
    /// Reads an entry. Missing entries are `Ok(None)`.
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Writes an entry, replacing any previous value.
    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Deletes an entry. Deleting a missing entry succeeds.
    async fn remove(&self, key: &str) -> Result<(), StorageError>;
}
