use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub i64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Dashboard roles. Both may manage content; only admins manage accounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Editor,
}

impl Role {
    pub fn label(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Editor => "editor",
        }
    }
}

/// Internal dashboard account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub name: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub email: String,
    pub name: String,
    pub password_hash: String,
    pub role: Role,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterRequest {
    #[serde(default)]
    #[validate(email(message = "a valid email is required"))]
    pub email: String,
    #[serde(default)]
    #[validate(length(min = 8, message = "password must be at least 8 characters"))]
    pub password: String,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "email is required"))]
    pub email: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
}

/// Self-service profile edit. Changing the password requires the current one.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ProfileUpdate {
    #[serde(default)]
    #[validate(length(min = 1, max = 120, message = "name must be 1-120 characters"))]
    pub name: Option<String>,
    #[serde(default)]
    #[validate(email(message = "a valid email is required"))]
    pub email: Option<String>,
    #[serde(default, rename = "currentPassword", alias = "current_password")]
    pub current_password: Option<String>,
    #[serde(default, rename = "newPassword", alias = "new_password")]
    #[validate(length(min = 8, message = "password must be at least 8 characters"))]
    pub new_password: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[serde(default)]
    #[validate(email(message = "a valid email is required"))]
    pub email: String,
    #[serde(default)]
    #[validate(length(min = 8, message = "password must be at least 8 characters"))]
    pub password: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub role: Option<Role>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct AdminUserUpdate {
    #[serde(default)]
    #[validate(length(min = 1, max = 120, message = "name must be 1-120 characters"))]
    pub name: Option<String>,
    #[serde(default)]
    #[validate(email(message = "a valid email is required"))]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<Role>,
    #[serde(default)]
    #[validate(length(min = 8, message = "password must be at least 8 characters"))]
    pub password: Option<String>,
}

/// Token plus the account it was issued for.
#[derive(Debug, Clone, Serialize)]
pub struct AuthGrant {
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub user: User,
}

pub(crate) fn normalize_email(raw: &str) -> String {
    raw.trim().to_ascii_lowercase()
}

/// Display name fallback: the local part of the email.
pub(crate) fn display_name(name: Option<&str>, email: &str) -> String {
    match name.map(str::trim) {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => email.split('@').next().unwrap_or(email).to_string(),
    }
}
