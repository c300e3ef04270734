//! Workspaces and their memberships

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{DomainError, DomainResult, require};

/// A shared space that owns manuscripts and has members.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workspace {
    /// Server-side identifier
    pub id: Uuid,
    /// Display name
    pub name: String,
    /// User who created the workspace
    pub created_by: Uuid,
    /// Creation timestamp
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// Last modification timestamp
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    /// Hyperlink to the membership collection
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workspace_memberships: Option<String>,
}

/// Manuscript entry as listed under a workspace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkspaceManuscript {
    /// Server-side identifier
    pub id: Uuid,
    /// Manuscript title
    pub title: String,
}

/// Role a member holds inside a workspace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum WorkspaceRole {
    /// Full control, including membership management
    Admin,
    /// Can edit every manuscript
    Editor,
    /// Can write own manuscripts
    Author,
    /// Read access
    #[default]
    Member,
}

impl WorkspaceRole {
    /// All roles, most privileged first.
    pub const ALL: [Self; 4] = [Self::Admin, Self::Editor, Self::Author, Self::Member];

    /// Wire name of the role.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "ADMIN",
            Self::Editor => "EDITOR",
            Self::Author => "AUTHOR",
            Self::Member => "MEMBER",
        }
    }

    /// Returns true if this role may add, re-role or remove members.
    #[must_use]
    pub const fn can_manage_members(self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl fmt::Display for WorkspaceRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WorkspaceRole {
    type Err = DomainError;

    fn from_str(s: &str) -> DomainResult<Self> {
        Self::ALL
            .into_iter()
            .find(|role| role.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| DomainError::InvalidValue {
                field: "role",
                message: format!("unknown role '{s}', expected one of ADMIN, EDITOR, AUTHOR, MEMBER"),
            })
    }
}

/// Profile details the server may embed in a membership.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberDetails {
    /// Display name
    pub username: String,
    /// Email address
    pub email: String,
    /// Avatar reference
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

/// A user's membership in a workspace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkspaceMembership {
    /// Membership identifier
    pub id: Uuid,
    /// Member's user id
    pub user: Uuid,
    /// Workspace id
    pub workspace: Uuid,
    /// Role held
    pub role: WorkspaceRole,
    /// Embedded user profile, when provided
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_details: Option<MemberDetails>,
}

impl WorkspaceMembership {
    /// Best available label for the member.
    #[must_use]
    pub fn display_name(&self) -> String {
        self.user_details
            .as_ref()
            .map_or_else(|| self.user.to_string(), |d| d.username.clone())
    }
}

/// Payload for creating or renaming a workspace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkspaceName {
    /// Display name
    pub name: String,
}

impl WorkspaceName {
    /// Builds a trimmed, non-blank name payload.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::MissingField` if the name is blank.
    pub fn new(name: impl Into<String>) -> DomainResult<Self> {
        let name = name.into();
        require("workspace name", &name)?;
        Ok(Self {
            name: name.trim().to_string(),
        })
    }
}

/// Payload for adding a member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddMember {
    /// User to add
    pub user: Uuid,
    /// Role to grant
    pub role: WorkspaceRole,
}

/// Payload for changing a member's role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateMemberRole {
    /// New role
    pub role: WorkspaceRole,
}
