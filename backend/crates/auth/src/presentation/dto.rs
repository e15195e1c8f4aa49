//! API DTOs (Data Transfer Objects)

use chrono::{DateTime, Utc};
use kernel::id::UserId;
use kernel::query::Page;
use serde::{Deserialize, Serialize};

use crate::domain::entity::user::User;
use crate::domain::value_object::user_role::UserRole;
use crate::error::{AuthError, AuthResult};

/// 400 naming every missing required field
pub(crate) fn require_fields(fields: &[(&str, bool)]) -> AuthResult<()> {
    let missing: Vec<&str> = fields
        .iter()
        .filter(|(_, present)| !present)
        .map(|(name, _)| *name)
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(AuthError::Validation(format!(
            "Missing fields: {}",
            missing.join(", ")
        )))
    }
}

// ============================================================================
// Register
// ============================================================================

/// Register request
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub age: Option<i64>,
}

/// Register response
#[derive(Debug, Clone, Serialize)]
pub struct RegisterResponse {
    pub message: String,
    pub id: UserId,
}

// ============================================================================
// Login
// ============================================================================

/// Login request
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Login response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub message: String,
    pub expires_at: DateTime<Utc>,
}

// ============================================================================
// Users
// ============================================================================

/// `?id&page&limit&order`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UsersQuery {
    pub id: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
    pub order: Option<String>,
}

/// `?id`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IdQuery {
    pub id: Option<String>,
}

/// Update user request
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub age: Option<i64>,
}

/// Public view of a user; the password hash never leaves the crate
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub age: i32,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.user_id,
            name: user.user_name.into_db(),
            email: user.email.into_db(),
            age: user.age.value(),
            role: user.role,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Paged users
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UsersPageResponse {
    pub users: Vec<UserResponse>,
    pub total_pages: u64,
    pub current_page: u64,
}

impl From<Page<User>> for UsersPageResponse {
    fn from(page: Page<User>) -> Self {
        let page = page.map(UserResponse::from);
        Self {
            users: page.items,
            total_pages: page.total_pages,
            current_page: page.current_page,
        }
    }
}

// ============================================================================
// Generic
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
