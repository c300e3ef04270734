//! Credential payloads sent to the auth endpoints.
//!
//! Each payload validates itself before any network I/O so that obviously
//! bad input never costs a round trip.

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult, require};

/// Username-or-email plus password sign-in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    /// Username, when signing in by name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// Email, when signing in by address
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Password
    pub password: String,
}

impl LoginRequest {
    /// Sign in by username.
    #[must_use]
    pub fn with_username(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: Some(username.into()),
            email: None,
            password: password.into(),
        }
    }

    /// Sign in by email address.
    #[must_use]
    pub fn with_email(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: None,
            email: Some(email.into()),
            password: password.into(),
        }
    }

    /// Sign in with whatever identifier the user typed; anything with an
    /// `@` is treated as an email address.
    #[must_use]
    pub fn from_identifier(identifier: impl Into<String>, password: impl Into<String>) -> Self {
        let identifier = identifier.into();
        if identifier.contains('@') {
            Self::with_email(identifier, password)
        } else {
            Self::with_username(identifier, password)
        }
    }

    /// Checks that an identifier and a password are present.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::MissingField` for the first missing part.
    pub fn validate(&self) -> DomainResult<()> {
        let has_identifier = [&self.username, &self.email]
            .iter()
            .any(|v| v.as_deref().is_some_and(|s| !s.trim().is_empty()));
        if !has_identifier {
            return Err(DomainError::MissingField("username or email"));
        }
        require("password", &self.password)
    }
}

/// New account registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterRequest {
    /// Desired username
    pub username: String,
    /// Email address
    pub email: String,
    /// Password
    pub password1: String,
    /// Password confirmation
    pub password2: String,
}

impl RegisterRequest {
    /// Builds a validated registration payload.
    ///
    /// # Errors
    ///
    /// Returns an error if a field is blank, the email has no `@`, or the
    /// two passwords differ.
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        password1: impl Into<String>,
        password2: impl Into<String>,
    ) -> DomainResult<Self> {
        let request = Self {
            username: username.into(),
            email: email.into(),
            password1: password1.into(),
            password2: password2.into(),
        };
        request.validate()?;
        Ok(request)
    }

    /// Re-checks the payload.
    ///
    /// # Errors
    ///
    /// See [`RegisterRequest::new`].
    pub fn validate(&self) -> DomainResult<()> {
        require("username", &self.username)?;
        require("email", &self.email)?;
        if !self.email.contains('@') {
            return Err(DomainError::InvalidValue {
                field: "email",
                message: "must be an email address".to_string(),
            });
        }
        require("password", &self.password1)?;
        if self.password1 != self.password2 {
            return Err(DomainError::PasswordMismatch);
        }
        Ok(())
    }
}

/// Token obtained from Google sign-in, exchanged for a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoogleAuthRequest {
    /// Google access token
    pub access_token: String,
    /// Google ID token, when the client received one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_token: Option<String>,
}

/// Request a password-reset email.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordResetRequest {
    /// Account email address
    pub email: String,
}

/// Complete a password reset with the link's uid and token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordResetConfirm {
    /// Encoded user id from the reset link
    pub uid: String,
    /// One-time token from the reset link
    pub token: String,
    /// New password
    pub new_password1: String,
    /// New password confirmation
    pub new_password2: String,
}

impl PasswordResetConfirm {
    /// Checks the link parts are present and the passwords agree.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::MissingField` or `DomainError::PasswordMismatch`.
    pub fn validate(&self) -> DomainResult<()> {
        require("uid", &self.uid)?;
        require("token", &self.token)?;
        require("new password", &self.new_password1)?;
        if self.new_password1 != self.new_password2 {
            return Err(DomainError::PasswordMismatch);
        }
        Ok(())
    }
}

/// Change the password of the signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordChange {
    /// Current password
    pub old_password: String,
    /// New password
    pub new_password1: String,
    /// New password confirmation
    pub new_password2: String,
}

impl PasswordChange {
    /// Checks the passwords are present and the new ones agree.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::MissingField` or `DomainError::PasswordMismatch`.
    pub fn validate(&self) -> DomainResult<()> {
        require("current password", &self.old_password)?;
        require("new password", &self.new_password1)?;
        if self.new_password1 != self.new_password2 {
            return Err(DomainError::PasswordMismatch);
        }
        Ok(())
    }
}

/// Partial update of the signed-in user's profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ProfileUpdate {
    /// New username
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// New email
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// New avatar reference
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

impl ProfileUpdate {
    /// Returns true if nothing would change.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.username.is_none() && self.email.is_none() && self.avatar_url.is_none()
    }
}
