//! Domain Layer
//!
//! Contains entities, value objects, and repository traits.

pub mod entity;
pub mod repository;
pub mod value_object;

// Re-exports
pub use entity::{
    authenticated_user::{AuthenticatedUser, Claims},
    user::User,
};
pub use repository::{TokenDenylist, UserRepository, UserSortField};
