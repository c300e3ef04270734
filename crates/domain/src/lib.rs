//! Folio Domain - Core types
//!
//! This crate defines the data model shared by the Folio client: the
//! session credential and its cookie jar, request and response
//! descriptors, user administration records, and the workspace /
//! manuscript / chapter / document resources.
//! All types here are pure Rust with no I/O dependencies.

pub mod auth;
pub mod cookie;
pub mod error;
pub mod manuscript;
pub mod request;
pub mod response;
pub mod user;
pub mod workspace;

pub use auth::{
    AuthResponse, AuthUser, GoogleAuthRequest, LoginRequest, PasswordChange,
    PasswordResetConfirm, PasswordResetRequest, ProfileUpdate, RegisterRequest, Session,
    UserSummary, token_preview,
};
pub use cookie::{Cookie, CookieJar};
pub use error::{DomainError, DomainResult};
pub use manuscript::{
    Chapter, ChapterDocument, CreateChapter, CreateManuscript, Manuscript, ManuscriptStatus,
    UpdateChapter, UpdateManuscript, sort_chapters,
};
pub use request::{AUTHORIZATION, ApiRequest, Attempt, HttpMethod};
pub use response::ApiResponse;
pub use user::{
    CreateUserRequest, InviteUserRequest, UpdateUserRequest, User, UserRole, UserStatus,
};
pub use workspace::{
    AddMember, MemberDetails, UpdateMemberRole, Workspace, WorkspaceManuscript,
    WorkspaceMembership, WorkspaceName, WorkspaceRole,
};
