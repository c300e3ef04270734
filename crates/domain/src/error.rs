//! Domain error types

use thiserror::Error;

/// Domain-level errors raised while validating input before it reaches the API.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A required field is missing or blank.
    #[error("{0} is required")]
    MissingField(&'static str),

    /// Two password fields that must agree do not.
    #[error("passwords do not match")]
    PasswordMismatch,

    /// A value is outside its accepted range or set.
    #[error("invalid value for {field}: {message}")]
    InvalidValue {
        /// Name of the offending field.
        field: &'static str,
        /// What was wrong with it.
        message: String,
    },

    /// An identifier could not be parsed.
    #[error("invalid identifier: {0}")]
    InvalidIdentifier(String),

    /// A request body could not be encoded as JSON.
    #[error("could not encode request body: {0}")]
    Serialization(String),
}

/// Result type alias for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;

/// Rejects blank strings for required fields.
pub(crate) fn require(field: &'static str, value: &str) -> DomainResult<()> {
    if value.trim().is_empty() {
        Err(DomainError::MissingField(field))
    } else {
        Ok(())
    }
}
