//! Access token refresh exchange.

use std::sync::Arc;

use folio_domain::ApiRequest;
use serde::Deserialize;
use tracing::debug;

use crate::error::ApiError;
use crate::ports::HttpTransport;

/// Default refresh endpoint, relative to the API base.
pub const DEFAULT_REFRESH_PATH: &str = "/auth/user/token/refresh/";

/// What a refresh exchange produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// The server issued a new access token.
    Refreshed(String),
    /// The server answered with success but without a token.
    NoToken,
    /// The refresh credential was rejected or the server was unreachable.
    Rejected(ApiError),
}

/// Refresh endpoint body.
#[derive(Debug, Deserialize)]
struct RefreshResponse {
    #[serde(default)]
    access: Option<String>,
}

/// Performs the refresh call directly on the transport.
///
/// The call carries no body and no `Authorization` header; the refresh
/// credential is the cookie the transport keeps. It does not go through
/// [`crate::ApiClient`], so a rejected refresh cannot trigger another.
#[derive(Clone)]
pub struct TokenRefresher {
    transport: Arc<dyn HttpTransport>,
    path: String,
}

impl TokenRefresher {
    /// Creates a refresher posting to `path`.
    #[must_use]
    pub fn new(transport: Arc<dyn HttpTransport>, path: impl Into<String>) -> Self {
        Self {
            transport,
            path: path.into(),
        }
    }

    /// Refresh endpoint path.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Runs one refresh exchange.
    pub async fn exchange(&self) -> RefreshOutcome {
        debug!(path = %self.path, "refreshing access token");
        let response = match self.transport.send(&ApiRequest::post(&self.path)).await {
            Ok(response) => response,
            Err(e) => return RefreshOutcome::Rejected(ApiError::Transport(e)),
        };

        if !response.is_success() {
            return RefreshOutcome::Rejected(ApiError::from_response(&response));
        }

        match response.json::<Option<RefreshResponse>>() {
            Ok(Some(RefreshResponse {
                access: Some(token),
            })) if !token.is_empty() => RefreshOutcome::Refreshed(token),
            Ok(_) => RefreshOutcome::NoToken,
            Err(e) => {
                debug!(error = %e, "refresh response body is not a token");
                RefreshOutcome::NoToken
            }
        }
    }
}
