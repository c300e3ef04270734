//! Authentication and user endpoints.

use folio_domain::{
    ApiRequest, AuthResponse, AuthUser, GoogleAuthRequest, LoginRequest, PasswordChange,
    PasswordResetConfirm, PasswordResetRequest, ProfileUpdate, RegisterRequest, UserSummary,
};
use tracing::{info, warn};

use crate::client::ApiClient;
use crate::error::{ApiError, ApiResult};

const LOGIN: &str = "/auth/user/login/";
const REGISTRATION: &str = "/auth/user/registration/";
const GOOGLE: &str = "/auth/user/google/";
const LOGOUT: &str = "/auth/user/logout/";
const PASSWORD_RESET: &str = "/auth/user/password/reset/";
const PASSWORD_RESET_CONFIRM: &str = "/auth/user/password/reset/confirm/";
const PASSWORD_CHANGE: &str = "/auth/user/password/change/";
const CURRENT_USER: &str = "/user/me/";
const ALL_USERS: &str = "/user/all/";

/// Sign-in, sign-out, password and profile operations.
#[derive(Debug, Clone)]
pub struct AuthApi {
    client: ApiClient,
}

impl AuthApi {
    pub(crate) const fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Signs in and stores the issued token and user in the session.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Domain` for incomplete credentials, otherwise
    /// whatever the server or session store reported.
    pub async fn login(&self, credentials: &LoginRequest) -> ApiResult<AuthUser> {
        credentials.validate()?;
        let request = ApiRequest::post(LOGIN).with_json(credentials)?;
        self.establish(&request).await
    }

    /// Creates an account and signs in as it.
    ///
    /// # Errors
    ///
    /// See [`AuthApi::login`].
    pub async fn register(&self, registration: &RegisterRequest) -> ApiResult<AuthUser> {
        registration.validate()?;
        let request = ApiRequest::post(REGISTRATION).with_json(registration)?;
        self.establish(&request).await
    }

    /// Exchanges a Google token for a session.
    ///
    /// # Errors
    ///
    /// See [`AuthApi::login`].
    pub async fn google_login(&self, google: &GoogleAuthRequest) -> ApiResult<AuthUser> {
        let request = ApiRequest::post(GOOGLE).with_json(google)?;
        self.establish(&request).await
    }

    /// Signs out on the server and clears the local session.
    ///
    /// The session is cleared even when the server call fails; that failure
    /// is still returned.
    ///
    /// # Errors
    ///
    /// Returns the server error, or a session storage error.
    pub async fn logout(&self) -> ApiResult<()> {
        let remote = self.client.execute(&ApiRequest::post(LOGOUT)).await;
        if let Err(e) = &remote {
            warn!(error = %e, "server-side logout failed, clearing local session anyway");
        }
        let local = self.client.session().reset().await;
        remote?;
        local?;
        info!("signed out");
        Ok(())
    }

    /// Asks the server to email a password-reset link.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Domain` for a blank email, otherwise the server error.
    pub async fn request_password_reset(&self, email: &str) -> ApiResult<()> {
        if email.trim().is_empty() {
            return Err(folio_domain::DomainError::MissingField("email").into());
        }
        let request = ApiRequest::post(PASSWORD_RESET).with_json(&PasswordResetRequest {
            email: email.trim().to_string(),
        })?;
        self.client.execute(&request).await
    }

    /// Completes a password reset from an emailed link.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Domain` for invalid input, otherwise the server error.
    pub async fn confirm_password_reset(&self, confirm: &PasswordResetConfirm) -> ApiResult<()> {
        confirm.validate()?;
        let request = ApiRequest::post(PASSWORD_RESET_CONFIRM).with_json(confirm)?;
        self.client.execute(&request).await
    }

    /// Changes the signed-in user's password.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Domain` for invalid input, otherwise the server error.
    pub async fn change_password(&self, change: &PasswordChange) -> ApiResult<()> {
        change.validate()?;
        let request = ApiRequest::post(PASSWORD_CHANGE).with_json(change)?;
        self.client.execute(&request).await
    }

    /// Fetches the signed-in user's profile.
    ///
    /// # Errors
    ///
    /// Returns the server error.
    pub async fn current_user(&self) -> ApiResult<AuthUser> {
        self.client.fetch(&ApiRequest::get(CURRENT_USER)).await
    }

    /// Updates the signed-in user's profile and the stored user summary.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Domain` for an empty update, otherwise the server
    /// or session error.
    pub async fn update_profile(&self, update: &ProfileUpdate) -> ApiResult<AuthUser> {
        if update.is_empty() {
            return Err(folio_domain::DomainError::InvalidValue {
                field: "profile",
                message: "nothing to change".to_string(),
            }
            .into());
        }
        let request = ApiRequest::patch(CURRENT_USER).with_json(update)?;
        let user: AuthUser = self.client.fetch(&request).await?;
        self.client.session().set_user(Some(user.clone())).await?;
        Ok(user)
    }

    /// Lists every user, for picking new workspace members.
    ///
    /// # Errors
    ///
    /// Returns the server error.
    pub async fn all_users(&self) -> ApiResult<Vec<UserSummary>> {
        self.client.fetch(&ApiRequest::get(ALL_USERS)).await
    }

    async fn establish(&self, request: &ApiRequest) -> ApiResult<AuthUser> {
        let auth: AuthResponse = self.client.fetch(request).await?;
        self.client.session().establish(&auth).await?;
        info!(username = %auth.user.username, "signed in");
        Ok(auth.user)
    }
}
