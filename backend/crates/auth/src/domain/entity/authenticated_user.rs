//! Token claims and the caller identity derived from them

use chrono::{DateTime, Duration, TimeZone, Utc};
use kernel::id::UserId;
use serde::{Deserialize, Serialize};

use crate::domain::entity::user::User;
use crate::domain::value_object::user_role::UserRole;
use crate::error::{AuthError, AuthResult};

/// JWT payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub id: UserId,
    pub email: String,
    pub role: UserRole,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    pub fn for_user(user: &User, issued_at: DateTime<Utc>, ttl: Duration) -> Self {
        Self {
            id: user.user_id,
            email: user.email.as_str().to_string(),
            role: user.role,
            iat: issued_at.timestamp(),
            exp: (issued_at + ttl).timestamp(),
        }
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        Utc.timestamp_opt(self.exp, 0)
            .single()
            .unwrap_or(DateTime::<Utc>::MIN_UTC)
    }
}

/// Verified caller, inserted into request extensions by `require_auth`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: UserId,
    pub email: String,
    pub role: UserRole,
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

impl AuthenticatedUser {
    pub fn from_claims(claims: Claims, token: String) -> Self {
        Self {
            expires_at: claims.expires_at(),
            user_id: claims.id,
            email: claims.email,
            role: claims.role,
            token,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    /// The owner or an admin
    pub fn can_manage(&self, owner: &UserId) -> bool {
        self.user_id == *owner || self.is_admin()
    }

    pub fn ensure_role(&self, allowed: &[UserRole]) -> AuthResult<()> {
        if allowed.contains(&self.role) {
            Ok(())
        } else {
            Err(AuthError::RoleNotAllowed(self.role))
        }
    }
}
