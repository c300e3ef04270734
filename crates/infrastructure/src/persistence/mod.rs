//! Durable storage adapters.

mod file_credential_storage;

pub use file_credential_storage::FileCredentialStorage;
