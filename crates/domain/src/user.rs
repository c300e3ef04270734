//! User administration records

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{DomainError, DomainResult, require};

/// Account state of an administered user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    /// Can sign in
    Active,
    /// Disabled by an administrator
    Inactive,
    /// Invited, has not signed in yet
    Invited,
    /// Blocked
    Suspended,
}

/// Administrative role of a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Unrestricted
    Superadmin,
    /// Manages users
    Admin,
    /// Cashier
    Cashier,
    /// Manager
    Manager,
}

macro_rules! wire_enum {
    ($ty:ident, $field:literal, [$($variant:ident => $name:literal),+ $(,)?]) => {
        impl $ty {
            /// Every value, in declaration order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// Wire name.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $name),+
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = DomainError;

            fn from_str(s: &str) -> DomainResult<Self> {
                Self::ALL
                    .iter()
                    .copied()
                    .find(|value| value.as_str().eq_ignore_ascii_case(s.trim()))
                    .ok_or_else(|| DomainError::InvalidValue {
                        field: $field,
                        message: format!(
                            "unknown {} '{s}', expected one of {}",
                            $field,
                            [$($name),+].join(", ")
                        ),
                    })
            }
        }
    };
}

wire_enum!(UserStatus, "status", [
    Active => "active",
    Inactive => "inactive",
    Invited => "invited",
    Suspended => "suspended",
]);

wire_enum!(UserRole, "role", [
    Superadmin => "superadmin",
    Admin => "admin",
    Cashier => "cashier",
    Manager => "manager",
]);

/// A user as seen by the administration endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Server-side identifier
    pub id: Uuid,
    /// Given name
    #[serde(default)]
    pub first_name: String,
    /// Family name
    #[serde(default)]
    pub last_name: String,
    /// Sign-in name
    pub username: String,
    /// Email address
    pub email: String,
    /// Contact number
    #[serde(default)]
    pub phone_number: String,
    /// Account state
    pub status: UserStatus,
    /// Administrative role
    pub role: UserRole,
    /// Creation timestamp
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// Last modification timestamp
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl User {
    /// First and last name, or the username when both are blank.
    #[must_use]
    pub fn full_name(&self) -> String {
        let name = format!("{} {}", self.first_name.trim(), self.last_name.trim());
        let name = name.trim();
        if name.is_empty() {
            self.username.clone()
        } else {
            name.to_string()
        }
    }
}

/// Payload for creating a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    /// Given name
    pub first_name: String,
    /// Family name
    pub last_name: String,
    /// Sign-in name
    pub username: String,
    /// Email address
    pub email: String,
    /// Contact number
    pub phone_number: String,
    /// Administrative role
    pub role: UserRole,
    /// Initial password; the server generates one when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl CreateUserRequest {
    /// Checks the required fields.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::MissingField` for a blank username or email, and
    /// `DomainError::InvalidValue` for an email without `@`.
    pub fn validate(&self) -> DomainResult<()> {
        require("username", &self.username)?;
        require("email", &self.email)?;
        check_email(&self.email)
    }
}

/// Partial update of an administered user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    /// Given name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    /// Family name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    /// Sign-in name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// Email address
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Contact number
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    /// Administrative role
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<UserRole>,
    /// New password
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    /// Account state
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<UserStatus>,
}

impl UpdateUserRequest {
    /// Rejects an update that changes nothing or blanks a required field.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidValue` for an empty update or a bad
    /// email, `DomainError::MissingField` for a blank username or email.
    pub fn validate(&self) -> DomainResult<()> {
        if *self == Self::default() {
            return Err(DomainError::InvalidValue {
                field: "user",
                message: "nothing to change".to_string(),
            });
        }
        if let Some(username) = &self.username {
            require("username", username)?;
        }
        if let Some(email) = &self.email {
            require("email", email)?;
            check_email(email)?;
        }
        Ok(())
    }
}

/// Payload for inviting someone by email.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InviteUserRequest {
    /// Email address
    pub email: String,
    /// Administrative role
    pub role: UserRole,
}

impl InviteUserRequest {
    /// Builds a trimmed invitation.
    ///
    /// # Errors
    ///
    /// Returns an error if the email is blank or has no `@`.
    pub fn new(email: impl Into<String>, role: UserRole) -> DomainResult<Self> {
        let email = email.into();
        require("email", &email)?;
        check_email(&email)?;
        Ok(Self {
            email: email.trim().to_string(),
            role,
        })
    }
}

fn check_email(email: &str) -> DomainResult<()> {
    if email.contains('@') {
        Ok(())
    } else {
        Err(DomainError::InvalidValue {
            field: "email",
            message: "must be an email address".to_string(),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_user_decodes_camel_case() {
        let user: User = serde_json::from_value(json!({
            "id": "0b8f3c44-4f55-4b51-9d1f-4ab1a0c6b0d2",
            "firstName": "Ada",
            "lastName": "Lovelace",
            "username": "ada",
            "email": "ada@example.com",
            "phoneNumber": "+44 20 7946 0000",
            "status": "invited",
            "role": "manager",
            "createdAt": "2024-03-01T10:00:00Z",
            "updatedAt": "2024-03-02T10:00:00Z"
        }))
        .unwrap();

        assert_eq!(user.full_name(), "Ada Lovelace");
        assert_eq!(user.status, UserStatus::Invited);
        assert_eq!(user.role, UserRole::Manager);
    }

    #[test]
    fn test_full_name_falls_back_to_username() {
        let user: User = serde_json::from_value(json!({
            "id": "0b8f3c44-4f55-4b51-9d1f-4ab1a0c6b0d2",
            "username": "ada",
            "email": "ada@example.com",
            "status": "active",
            "role": "admin"
        }))
        .unwrap();
        assert_eq!(user.full_name(), "ada");
    }

    #[test]
    fn test_enums_parse_case_insensitively() {
        assert_eq!("Admin".parse::<UserRole>(), Ok(UserRole::Admin));
        assert_eq!(" SUSPENDED ".parse::<UserStatus>(), Ok(UserStatus::Suspended));
        let err = "owner".parse::<UserRole>().unwrap_err();
        assert!(err.to_string().contains("superadmin, admin, cashier, manager"));
    }

    #[test]
    fn test_update_serializes_only_changed_fields() {
        let update = UpdateUserRequest {
            phone_number: Some("555".to_string()),
            status: Some(UserStatus::Inactive),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(&update).unwrap(),
            json!({ "phoneNumber": "555", "status": "inactive" })
        );
    }

    #[test]
    fn test_update_validation() {
        assert!(UpdateUserRequest::default().validate().is_err());
        let blank = UpdateUserRequest {
            username: Some("  ".to_string()),
            ..Default::default()
        };
        assert_eq!(blank.validate(), Err(DomainError::MissingField("username")));
    }

    #[test]
    fn test_invite_requires_email() {
        assert_eq!(
            InviteUserRequest::new(" ", UserRole::Admin),
            Err(DomainError::MissingField("email"))
        );
        let invite = InviteUserRequest::new(" bob@example.com ", UserRole::Cashier).unwrap();
        assert_eq!(
            serde_json::to_value(&invite).unwrap(),
            json!({ "email": "bob@example.com", "role": "cashier" })
        );
    }
}
