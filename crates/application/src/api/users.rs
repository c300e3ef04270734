//! User administration endpoints.

use folio_domain::{ApiRequest, CreateUserRequest, InviteUserRequest, UpdateUserRequest, User};
use tracing::info;
use uuid::Uuid;

use crate::client::ApiClient;
use crate::error::ApiResult;

const CREATE: &str = "/user/create/";
const INVITE: &str = "/user/invite/";

fn user_path(id: Uuid) -> String {
    format!("/user/{id}/")
}

/// Creating, editing, removing and inviting users.
#[derive(Debug, Clone)]
pub struct UsersApi {
    client: ApiClient,
}

impl UsersApi {
    pub(crate) const fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Fetches one user.
    ///
    /// # Errors
    ///
    /// Returns the server error.
    pub async fn get(&self, id: Uuid) -> ApiResult<User> {
        self.client.fetch(&ApiRequest::get(user_path(id))).await
    }

    /// Creates a user.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Domain` for a blank username or a bad email,
    /// otherwise the server error.
    pub async fn create(&self, user: &CreateUserRequest) -> ApiResult<User> {
        user.validate()?;
        let request = ApiRequest::post(CREATE).with_json(user)?;
        let created: User = self.client.fetch(&request).await?;
        info!(id = %created.id, username = %created.username, "user created");
        Ok(created)
    }

    /// Applies a partial update to a user.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Domain` for an empty or invalid update, otherwise
    /// the server error.
    pub async fn update(&self, id: Uuid, update: &UpdateUserRequest) -> ApiResult<User> {
        update.validate()?;
        let request = ApiRequest::patch(user_path(id)).with_json(update)?;
        self.client.fetch(&request).await
    }

    /// Deletes a user.
    ///
    /// # Errors
    ///
    /// Returns the server error.
    pub async fn delete(&self, id: Uuid) -> ApiResult<()> {
        self.client.execute(&ApiRequest::delete(user_path(id))).await
    }

    /// Sends an invitation email.
    ///
    /// # Errors
    ///
    /// Returns the server error.
    pub async fn invite(&self, invite: &InviteUserRequest) -> ApiResult<()> {
        let request = ApiRequest::post(INVITE).with_json(invite)?;
        self.client.execute(&request).await
    }
}
