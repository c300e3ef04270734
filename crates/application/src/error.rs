//! Client error types

use folio_domain::{ApiResponse, DomainError};
use serde_json::Value;
use thiserror::Error;

use crate::ports::TransportError;
use crate::session::SessionError;

/// Errors surfaced to callers of the API client.
///
/// `Clone` so that one refresh failure can be handed to every request that
/// was waiting on the same refresh.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// No response was received.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The server answered with a non-success status.
    #[error("server responded with status {status}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body, lossily decoded
        body: String,
    },

    /// The token refresh exchange failed; the session has been cleared.
    #[error("session expired: token refresh failed: {0}")]
    RefreshFailed(Box<Self>),

    /// A success response did not have the expected shape.
    #[error("could not decode response: {0}")]
    Decode(String),

    /// Updating the session failed.
    #[error(transparent)]
    Session(#[from] SessionError),

    /// Input was rejected before sending.
    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// Result type alias for API operations.
pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    /// Wraps a non-success response.
    #[must_use]
    pub fn from_response(response: &ApiResponse) -> Self {
        Self::Status {
            status: response.status,
            body: response.text(),
        }
    }

    /// HTTP status behind this error, if one was received.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::RefreshFailed(inner) => inner.status(),
            _ => None,
        }
    }

    /// Returns true if the user has to sign in again: either the refresh
    /// failed or an already-retried request was still rejected.
    #[must_use]
    pub fn requires_sign_in(&self) -> bool {
        matches!(self, Self::RefreshFailed(_) | Self::Status { status: 401, .. })
    }

    /// Human-readable message from the error body, if the server sent one.
    ///
    /// Looks at `detail`, then `message`, then the first field error
    /// (`{"email": ["Enter a valid email."]}`), then a bare list of errors.
    #[must_use]
    pub fn server_message(&self) -> Option<String> {
        match self {
            Self::Status { body, .. } => extract_message(body),
            Self::RefreshFailed(inner) => inner.server_message(),
            _ => None,
        }
    }
}

fn first_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Array(items) => items.iter().find_map(first_text),
        _ => None,
    }
}

fn extract_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    match &value {
        Value::Object(map) => ["detail", "message"]
            .iter()
            .find_map(|key| map.get(*key).and_then(first_text))
            .or_else(|| map.values().find_map(first_text)),
        Value::Array(_) => first_text(&value),
        _ => None,
    }
}
