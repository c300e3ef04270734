//! Workspace and membership endpoints.

use folio_domain::{
    AddMember, ApiRequest, UpdateMemberRole, Workspace, WorkspaceManuscript, WorkspaceMembership,
    WorkspaceName, WorkspaceRole,
};
use uuid::Uuid;

use crate::client::ApiClient;
use crate::error::ApiResult;

const WORKSPACES: &str = "/workspaces/";

fn workspace_path(id: Uuid) -> String {
    format!("{WORKSPACES}{id}/")
}

fn memberships_path(workspace: Uuid) -> String {
    format!("{WORKSPACES}{workspace}/memberships/")
}

fn membership_path(workspace: Uuid, membership: Uuid) -> String {
    format!("{WORKSPACES}{workspace}/memberships/{membership}/")
}

/// Workspace CRUD and membership management.
#[derive(Debug, Clone)]
pub struct WorkspaceApi {
    client: ApiClient,
}

impl WorkspaceApi {
    pub(crate) const fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Lists the workspaces visible to the signed-in user.
    ///
    /// # Errors
    ///
    /// Returns the server error.
    pub async fn list(&self) -> ApiResult<Vec<Workspace>> {
        self.client.fetch(&ApiRequest::get(WORKSPACES)).await
    }

    /// Fetches one workspace.
    ///
    /// # Errors
    ///
    /// Returns the server error.
    pub async fn get(&self, id: Uuid) -> ApiResult<Workspace> {
        self.client.fetch(&ApiRequest::get(workspace_path(id))).await
    }

    /// Creates a workspace.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Domain` for a blank name, otherwise the server error.
    pub async fn create(&self, name: &str) -> ApiResult<Workspace> {
        let request = ApiRequest::post(WORKSPACES).with_json(&WorkspaceName::new(name)?)?;
        self.client.fetch(&request).await
    }

    /// Renames a workspace.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Domain` for a blank name, otherwise the server error.
    pub async fn rename(&self, id: Uuid, name: &str) -> ApiResult<Workspace> {
        let request = ApiRequest::patch(workspace_path(id)).with_json(&WorkspaceName::new(name)?)?;
        self.client.fetch(&request).await
    }

    /// Deletes a workspace.
    ///
    /// # Errors
    ///
    /// Returns the server error.
    pub async fn delete(&self, id: Uuid) -> ApiResult<()> {
        self.client.execute(&ApiRequest::delete(workspace_path(id))).await
    }

    /// Lists the manuscripts in a workspace.
    ///
    /// # Errors
    ///
    /// Returns the server error.
    pub async fn manuscripts(&self, id: Uuid) -> ApiResult<Vec<WorkspaceManuscript>> {
        let path = format!("{WORKSPACES}{id}/manuscripts/");
        self.client.fetch(&ApiRequest::get(path)).await
    }

    /// Lists a workspace's members.
    ///
    /// # Errors
    ///
    /// Returns the server error.
    pub async fn members(&self, id: Uuid) -> ApiResult<Vec<WorkspaceMembership>> {
        self.client.fetch(&ApiRequest::get(memberships_path(id))).await
    }

    /// Adds a user to a workspace with the given role.
    ///
    /// # Errors
    ///
    /// Returns the server error.
    pub async fn add_member(
        &self,
        workspace: Uuid,
        user: Uuid,
        role: WorkspaceRole,
    ) -> ApiResult<WorkspaceMembership> {
        let request =
            ApiRequest::post(memberships_path(workspace)).with_json(&AddMember { user, role })?;
        self.client.fetch(&request).await
    }

    /// Changes a member's role.
    ///
    /// # Errors
    ///
    /// Returns the server error.
    pub async fn update_member_role(
        &self,
        workspace: Uuid,
        membership: Uuid,
        role: WorkspaceRole,
    ) -> ApiResult<WorkspaceMembership> {
        let request = ApiRequest::patch(membership_path(workspace, membership))
            .with_json(&UpdateMemberRole { role })?;
        self.client.fetch(&request).await
    }

    /// Removes a member from a workspace.
    ///
    /// # Errors
    ///
    /// Returns the server error.
    pub async fn remove_member(&self, workspace: Uuid, membership: Uuid) -> ApiResult<()> {
        self.client
            .execute(&ApiRequest::delete(membership_path(workspace, membership)))
            .await
    }
}
