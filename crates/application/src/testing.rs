//! In-memory transport double for unit tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use folio_domain::{AUTHORIZATION, ApiRequest, ApiResponse, HttpMethod};

use crate::auth::{DEFAULT_REFRESH_PATH, bearer};
use crate::ports::{HttpTransport, TransportError};

struct Rule {
    method: Option<HttpMethod>,
    path: String,
    authorization: Option<String>,
    response: ApiResponse,
}

#[derive(Default)]
struct Script {
    rules: Vec<Rule>,
    refreshes: VecDeque<ApiResponse>,
    sent: Vec<ApiRequest>,
}

/// Transport that answers from a fixed script and records what was sent.
///
/// Rules bound to a bearer token win over token-agnostic ones. Refresh
/// responses are queued and consumed one per exchange. Anything unscripted
/// fails with `TransportError::ConnectionFailed`. Each send yields once so
/// concurrent callers interleave.
#[derive(Clone, Default)]
pub struct ScriptedTransport {
    script: Arc<Mutex<Script>>,
}

#[allow(clippy::unwrap_used)]
impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared(&self) -> Arc<dyn HttpTransport> {
        Arc::new(self.clone())
    }

    /// Answers requests to `path` carrying `Bearer <token>`.
    pub fn respond_for(&self, path: &str, token: &str, response: ApiResponse) {
        self.push(None, path, Some(bearer(token)), response);
    }

    /// Answers requests to `path` whatever their credentials.
    pub fn respond_any(&self, path: &str, response: ApiResponse) {
        self.push(None, path, None, response);
    }

    /// Answers `method` requests to `path` whatever their credentials.
    pub fn respond_method(&self, method: HttpMethod, path: &str, response: ApiResponse) {
        self.push(Some(method), path, None, response);
    }

    /// Queues the response for the next refresh exchange.
    pub fn on_refresh(&self, response: ApiResponse) {
        self.script.lock().unwrap().refreshes.push_back(response);
    }

    pub fn sent(&self) -> Vec<ApiRequest> {
        self.script.lock().unwrap().sent.clone()
    }

    pub fn refresh_calls(&self) -> usize {
        self.sent()
            .iter()
            .filter(|r| r.path() == DEFAULT_REFRESH_PATH)
            .count()
    }

    fn push(
        &self,
        method: Option<HttpMethod>,
        path: &str,
        authorization: Option<String>,
        response: ApiResponse,
    ) {
        self.script.lock().unwrap().rules.push(Rule {
            method,
            path: path.to_string(),
            authorization,
            response,
        });
    }

    fn answer(&self, request: &ApiRequest) -> Option<ApiResponse> {
        let mut script = self.script.lock().unwrap();
        script.sent.push(request.clone());

        if request.path() == DEFAULT_REFRESH_PATH {
            return script.refreshes.pop_front();
        }

        let candidates = || {
            script.rules.iter().filter(|rule| {
                rule.path == request.path()
                    && rule.method.is_none_or(|m| m == request.method())
            })
        };
        let presented = request.header(AUTHORIZATION);
        candidates()
            .find(|rule| rule.authorization.is_some() && rule.authorization.as_deref() == presented)
            .or_else(|| candidates().find(|rule| rule.authorization.is_none()))
            .map(|rule| rule.response.clone())
    }
}

#[async_trait]
impl HttpTransport for ScriptedTransport {
    async fn send(&self, request: &ApiRequest) -> Result<ApiResponse, TransportError> {
        let answer = self.answer(request);
        tokio::task::yield_now().await;
        answer.ok_or_else(|| {
            TransportError::ConnectionFailed(format!("unscripted {} {}", request.method(), request.path()))
        })
    }
}
