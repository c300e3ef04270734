//! Authentication domain types

mod credentials;
mod session;

pub use credentials::{
    GoogleAuthRequest, LoginRequest, PasswordChange, PasswordResetConfirm, PasswordResetRequest,
    ProfileUpdate, RegisterRequest,
};
pub use session::{AuthResponse, AuthUser, Session, UserSummary, token_preview};
