use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Stored and serialized as `"User"` / `"Admin"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum UserRole {
    #[default]
    User,
    Admin,
}

impl UserRole {
    #[inline]
    pub const fn code(&self) -> &'static str {
        match self {
            UserRole::User => "User",
            UserRole::Admin => "Admin",
        }
    }

    #[inline]
    pub const fn is_admin(&self) -> bool {
        matches!(self, UserRole::Admin)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid user role: {0}")]
pub struct InvalidUserRole(pub String);

impl FromStr for UserRole {
    type Err = InvalidUserRole;

    fn from_str(code: &str) -> Result<Self, Self::Err> {
        match code {
            "User" => Ok(UserRole::User),
            "Admin" => Ok(UserRole::Admin),
            other => Err(InvalidUserRole(other.to_string())),
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
