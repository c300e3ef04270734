//! HTTP transport implementation using reqwest.
//!
//! This adapter implements the `HttpTransport` port. Cookies are kept in the
//! session rather than in the client, so the refresh credential the server
//! sets at sign-in is stored with the session and outlives the process.

use std::time::Duration;

use async_trait::async_trait;
use folio_application::SessionStore;
use folio_application::ports::{HttpTransport, TransportError};
use folio_domain::{ApiRequest, ApiResponse, HttpMethod};
use reqwest::header::{ACCEPT, COOKIE, SET_COOKIE};
use reqwest::{Client, Method, Url};
use tracing::{trace, warn};

const MAX_REDIRECTS: usize = 10;

/// Transport over a `reqwest::Client`.
///
/// Request paths are appended to the API base, so `/workspaces/` against
/// `https://host/api` goes to `https://host/api/workspaces/`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
    base_url: Url,
    timeout_ms: u64,
    cookies: Option<SessionStore>,
}

impl ReqwestTransport {
    /// Creates a transport for the API at `base_url`.
    ///
    /// Configuration:
    /// - Follow redirects: up to 10
    /// - Request timeout: `timeout`
    /// - Cookies: none until [`ReqwestTransport::with_session_cookies`]
    ///
    /// # Errors
    ///
    /// Returns `TransportError::Other` if the client cannot be created.
    pub fn new(base_url: Url, user_agent: &str, timeout: Duration) -> Result<Self, TransportError> {
        let client = Client::builder()
            .user_agent(user_agent)
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .timeout(timeout)
            .build()
            .map_err(|e| TransportError::Other(e.to_string()))?;

        Ok(Self::with_client(client, base_url, timeout))
    }

    /// Creates a transport over a preconfigured client.
    #[must_use]
    pub fn with_client(client: Client, base_url: Url, timeout: Duration) -> Self {
        Self {
            client,
            base_url,
            timeout_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
            cookies: None,
        }
    }

    /// Sends and collects cookies through `session`'s jar.
    #[must_use]
    pub fn with_session_cookies(mut self, session: SessionStore) -> Self {
        self.cookies = Some(session);
        self
    }

    /// The API base every request path is resolved against.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn resolve(&self, path: &str) -> Result<Url, TransportError> {
        let joined = format!("{}{path}", self.base_url.as_str().trim_end_matches('/'));
        Url::parse(&joined).map_err(|e| TransportError::InvalidUrl(format!("{e}: {joined}")))
    }

    /// Converts domain `HttpMethod` to reqwest `Method`.
    const fn to_reqwest_method(method: HttpMethod) -> Method {
        match method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
            HttpMethod::Put => Method::PUT,
            HttpMethod::Patch => Method::PATCH,
            HttpMethod::Delete => Method::DELETE,
        }
    }

    /// Maps reqwest errors to `TransportError`.
    fn map_error(error: &reqwest::Error, timeout_ms: u64) -> TransportError {
        if error.is_timeout() {
            return TransportError::Timeout { timeout_ms };
        }
        if error.is_connect() {
            return TransportError::ConnectionFailed(error.to_string());
        }
        if error.is_redirect() {
            return TransportError::Other(format!("more than {MAX_REDIRECTS} redirects"));
        }
        TransportError::Other(error.to_string())
    }

    /// Stores the response's `Set-Cookie` headers. A storage failure does
    /// not fail the request.
    async fn keep_cookies(&self, headers: &[(String, String)], url: &Url) {
        let Some(session) = &self.cookies else {
            return;
        };
        let set_cookies = headers
            .iter()
            .filter(|(name, _)| name.eq_ignore_ascii_case(SET_COOKIE.as_str()))
            .map(|(_, value)| value.as_str());
        if let Err(e) = session.store_cookies(set_cookies, url).await {
            warn!(error = %e, "cookies could not be stored");
        }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: &ApiRequest) -> Result<ApiResponse, TransportError> {
        let url = self.resolve(request.path())?;
        let cookie = match &self.cookies {
            Some(session) => session.cookie_header(&url).await,
            None => None,
        };

        let mut builder = self
            .client
            .request(Self::to_reqwest_method(request.method()), url.clone())
            .header(ACCEPT, "application/json");
        if let Some(cookie) = cookie {
            builder = builder.header(COOKIE, cookie);
        }
        for (name, value) in request.headers() {
            builder = builder.header(name, value);
        }
        if let Some(body) = request.body() {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| Self::map_error(&e, self.timeout_ms))?;

        let status = response.status().as_u16();
        let headers: Vec<(String, String)> = response
            .headers()
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_str().unwrap_or("<binary>").to_string()))
            .collect();
        self.keep_cookies(&headers, &url).await;
        let body = response
            .bytes()
            .await
            .map_err(|e| TransportError::Other(format!("failed to read body: {e}")))?
            .to_vec();

        trace!(status, bytes = body.len(), "response body read");
        Ok(ApiResponse::new(status, headers, body))
    }
}
