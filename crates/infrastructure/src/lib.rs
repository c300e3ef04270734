//! Folio Infrastructure - Adapters and implementations
//!
//! This crate provides concrete implementations of the ports
//! defined in the application layer: a reqwest transport that keeps the
//! refresh cookie, and a file that holds the session between runs.

pub mod adapters;
pub mod persistence;

pub use adapters::ReqwestTransport;
pub use persistence::FileCredentialStorage;
