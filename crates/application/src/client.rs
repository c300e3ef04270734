//! Authenticated API client.
//!
//! Every call goes through [`ApiClient::send`], which attaches the bearer
//! token, and on a first 401 refreshes the token once and re-issues the
//! request. The caller only ever sees the final outcome.

use std::fmt;
use std::sync::Arc;

use folio_domain::{AUTHORIZATION, ApiRequest, ApiResponse, Attempt, token_preview};
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use crate::api::{AuthApi, ManuscriptApi, UsersApi, WorkspaceApi};
use crate::auth::{RefreshGate, RefreshOutcome, TokenRefresher, authenticate, bearer};
use crate::error::{ApiError, ApiResult};
use crate::ports::HttpTransport;
use crate::session::SessionStore;

/// What the interceptor decided about one response.
enum Verdict {
    /// Hand the response to the caller.
    Deliver(ApiResponse),
    /// Propagate the failure unchanged.
    Reject(ApiError),
    /// First 401: refresh and re-issue.
    Refresh(ApiResponse),
}

impl Verdict {
    fn judge(response: ApiResponse, attempt: Attempt) -> Self {
        if response.is_success() {
            Self::Deliver(response)
        } else if response.is_unauthorized() && attempt.may_refresh() {
            Self::Refresh(response)
        } else {
            Self::Reject(ApiError::from_response(&response))
        }
    }
}

/// Client for the manuscript API.
///
/// Cheap to clone; clones share the transport, the session and the refresh
/// gate.
#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn HttpTransport>,
    session: SessionStore,
    refresher: TokenRefresher,
    gate: Arc<RefreshGate>,
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("refresh_path", &self.refresher.path())
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Creates a client over `transport` that keeps its credential in
    /// `session` and refreshes it at `refresh_path`.
    #[must_use]
    pub fn new(
        transport: Arc<dyn HttpTransport>,
        session: SessionStore,
        refresh_path: impl Into<String>,
    ) -> Self {
        let refresher = TokenRefresher::new(Arc::clone(&transport), refresh_path);
        Self {
            transport,
            session,
            refresher,
            gate: Arc::new(RefreshGate::new()),
        }
    }

    /// The session this client authenticates with.
    #[must_use]
    pub const fn session(&self) -> &SessionStore {
        &self.session
    }

    /// Authentication and user endpoints.
    #[must_use]
    pub fn auth(&self) -> AuthApi {
        AuthApi::new(self.clone())
    }

    /// User administration endpoints.
    #[must_use]
    pub fn users(&self) -> UsersApi {
        UsersApi::new(self.clone())
    }

    /// Workspace and membership endpoints.
    #[must_use]
    pub fn workspaces(&self) -> WorkspaceApi {
        WorkspaceApi::new(self.clone())
    }

    /// Manuscript, chapter and document endpoints.
    #[must_use]
    pub fn manuscripts(&self) -> ManuscriptApi {
        ManuscriptApi::new(self.clone())
    }

    /// Sends a request, refreshing the access token at most once.
    ///
    /// # Errors
    ///
    /// - `ApiError::Transport` if no response arrived (never retried)
    /// - `ApiError::Status` for any non-2xx that is not a first 401, and for
    ///   a 401 on the re-issued request
    /// - `ApiError::RefreshFailed` if the refresh exchange failed; the
    ///   session has been cleared
    pub async fn send(&self, request: &ApiRequest) -> ApiResult<ApiResponse> {
        let session = self.session.snapshot().await;
        let observed = self.gate.generation();
        let mut outgoing = authenticate(request, &session);
        let mut attempt = Attempt::First;

        loop {
            let response = self.transmit(&outgoing, attempt).await?;
            match Verdict::judge(response, attempt) {
                Verdict::Deliver(response) => return Ok(response),
                Verdict::Reject(err) => return Err(err),
                Verdict::Refresh(rejected) => {
                    attempt = attempt.next();
                    let refresh = self.gate.run(observed, &session.access_token, || {
                        self.refresh_session()
                    });
                    match refresh.await {
                        RefreshOutcome::Refreshed(token) => {
                            outgoing = request.clone().with_header(AUTHORIZATION, bearer(&token));
                        }
                        RefreshOutcome::NoToken => return Err(ApiError::from_response(&rejected)),
                        RefreshOutcome::Rejected(err) => {
                            return Err(ApiError::RefreshFailed(Box::new(err)));
                        }
                    }
                }
            }
        }
    }

    /// Sends a request and decodes the JSON body.
    ///
    /// # Errors
    ///
    /// Everything [`ApiClient::send`] returns, plus `ApiError::Decode`.
    pub async fn fetch<T: DeserializeOwned>(&self, request: &ApiRequest) -> ApiResult<T> {
        let response = self.send(request).await?;
        response.json().map_err(|e| ApiError::Decode(e.to_string()))
    }

    /// Sends a request whose response body is not needed.
    ///
    /// # Errors
    ///
    /// Everything [`ApiClient::send`] returns.
    pub async fn execute(&self, request: &ApiRequest) -> ApiResult<()> {
        self.send(request).await.map(|_| ())
    }

    async fn transmit(&self, request: &ApiRequest, attempt: Attempt) -> ApiResult<ApiResponse> {
        debug!(
            method = %request.method(),
            path = request.path(),
            %attempt,
            "sending request"
        );
        let response = self.transport.send(request).await?;
        debug!(status = response.status, path = request.path(), "response received");
        Ok(response)
    }

    /// Runs one exchange and applies it to the session.
    async fn refresh_session(&self) -> RefreshOutcome {
        let outcome = self.refresher.exchange().await;
        match &outcome {
            RefreshOutcome::Refreshed(token) => {
                info!(token = %token_preview(token), "access token refreshed");
                if let Err(e) = self.session.set_access_token(token.clone()).await {
                    warn!(error = %e, "refreshed token could not be persisted");
                }
            }
            RefreshOutcome::Rejected(err) => {
                warn!(error = %err, "token refresh failed, clearing session");
                if let Err(e) = self.session.reset().await {
                    warn!(error = %e, "session could not be cleared from storage");
                }
            }
            RefreshOutcome::NoToken => {
                warn!("refresh response carried no access token");
            }
        }
        outcome
    }
}
