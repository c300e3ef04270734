//! HTTP transport port

use async_trait::async_trait;
use folio_domain::{ApiRequest, ApiResponse};
use thiserror::Error;

/// Failures below the HTTP layer. A response with any status code,
/// including 4xx and 5xx, is not a transport error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The request URL could not be built.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// The request did not complete in time.
    #[error("request timed out after {timeout_ms}ms")]
    Timeout {
        /// Configured timeout
        timeout_ms: u64,
    },

    /// The server could not be reached.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// Anything else the HTTP stack reported.
    #[error("transport error: {0}")]
    Other(String),
}

/// Port for sending one request to the API.
///
/// Implementations resolve the request path against the deployment's API
/// base, send exactly what they are given, and keep any out-of-band
/// credential (the refresh cookie) in their own jar. They never retry.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Sends the request and returns whatever response arrives.
    ///
    /// # Errors
    ///
    /// Returns a `TransportError` only when no response was received.
    async fn send(&self, request: &ApiRequest) -> Result<ApiResponse, TransportError>;
}
