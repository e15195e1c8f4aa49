//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in infrastructure layer.

use std::time::Duration;

use kernel::id::UserId;
use kernel::query::{PageRequest, Sort, SortField};

use crate::domain::entity::user::User;
use crate::domain::value_object::{
    email::Email, user_age::UserAge, user_name::UserName,
};
use crate::error::AuthResult;

/// Sortable user fields for `order`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserSortField {
    Name,
    Email,
    Age,
    CreatedAt,
    UpdatedAt,
}

impl SortField for UserSortField {
    fn parse(key: &str) -> Option<Self> {
        match key {
            "name" => Some(UserSortField::Name),
            "email" => Some(UserSortField::Email),
            "age" => Some(UserSortField::Age),
            "created_at" | "createdAt" => Some(UserSortField::CreatedAt),
            "updated_at" | "updatedAt" => Some(UserSortField::UpdatedAt),
            _ => None,
        }
    }

    fn column(&self) -> &'static str {
        match self {
            UserSortField::Name => "user_name",
            UserSortField::Email => "email",
            UserSortField::Age => "age",
            UserSortField::CreatedAt => "created_at",
            UserSortField::UpdatedAt => "updated_at",
        }
    }
}

/// User repository trait
#[trait_variant::make(UserRepository: Send)]
pub trait LocalUserRepository {
    async fn create(&self, user: &User) -> AuthResult<()>;

    async fn find_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>>;

    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>>;

    async fn exists_by_email(&self, email: &Email) -> AuthResult<bool>;

    /// Name taken by anyone other than `except`
    async fn exists_by_user_name(
        &self,
        user_name: &UserName,
        except: Option<&UserId>,
    ) -> AuthResult<bool>;

    async fn list(&self, page: &PageRequest, sorts: &[Sort<UserSortField>]) -> AuthResult<Vec<User>>;

    async fn count(&self) -> AuthResult<u64>;

    /// Returns the updated user, `None` if absent
    async fn update_profile(
        &self,
        user_id: &UserId,
        user_name: &UserName,
        age: UserAge,
    ) -> AuthResult<Option<User>>;

    /// Returns `false` if nothing was deleted
    async fn delete(&self, user_id: &UserId) -> AuthResult<bool>;
}

/// Revoked-token cache
///
/// Keys come from `AuthConfig::denylist_key` over the SHA-256 of the token,
/// so the token itself is never stored.
#[trait_variant::make(TokenDenylist: Send)]
pub trait LocalTokenDenylist {
    /// The entry must vanish after `ttl`
    async fn revoke(&self, key: &str, ttl: Duration) -> AuthResult<()>;

    async fn is_revoked(&self, key: &str) -> AuthResult<bool>;
}
