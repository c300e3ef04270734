//! Session credential types

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::cookie::CookieJar;

/// The authenticated user as returned by the auth endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    /// Server-side identifier
    pub id: Uuid,
    /// Display name
    pub username: String,
    /// Email address
    pub email: String,
    /// Avatar reference, if the user has one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

/// Minimal user entry from the user directory listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    /// Server-side identifier
    pub id: Uuid,
    /// Display name
    pub username: String,
}

/// Body returned by login, registration and OAuth exchange.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthResponse {
    /// Short-lived bearer credential.
    pub access: String,
    /// Refresh credential. The server also sets it as a cookie, which is
    /// what the refresh exchange actually uses.
    #[serde(default)]
    pub refresh: String,
    /// The user the tokens belong to.
    pub user: AuthUser,
}

/// In-memory record of the current access token, user and cookies.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Session {
    /// Bearer token; empty when signed out.
    pub access_token: String,
    /// Signed-in user, if known.
    pub user: Option<AuthUser>,
    /// Cookies set by the API, including the refresh credential.
    pub cookies: CookieJar,
}

impl Session {
    /// Creates a session from its parts.
    #[must_use]
    pub fn new(access_token: impl Into<String>, user: Option<AuthUser>) -> Self {
        Self {
            access_token: access_token.into(),
            user,
            cookies: CookieJar::new(),
        }
    }

    /// Returns true if a non-empty access token is held.
    #[must_use]
    pub const fn has_token(&self) -> bool {
        !self.access_token.is_empty()
    }

    /// Returns true if no token, user or cookie is held.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.access_token.is_empty() && self.user.is_none() && self.cookies.is_empty()
    }
}

/// Shortens a token for log output (first 8 chars + ...).
#[must_use]
pub fn token_preview(token: &str) -> String {
    if token.len() > 12 {
        format!("{}...", token.chars().take(8).collect::<String>())
    } else {
        "***".to_string()
    }
}
