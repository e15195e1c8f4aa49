//! Auth (Authentication) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Business logic, entities, repository traits
//! - `application/` - Use cases and application services
//! - `infra/` - Database and cache implementations
//! - `presentation/` - HTTP handlers, DTOs, router, middleware
//!
//! ## Features
//! - Register / login / logout with email + password
//! - Stateless JWT (HS256) with a Redis denylist for logged-out tokens
//! - Role-based access (User, Admin)
//! - User admin: list, get, update, delete
//!
//! ## Security Model
//! - Passwords hashed with Argon2id (NIST SP 800-63B compliant)
//! - Tokens accepted from `x-access-token` or `Authorization: Bearer`
//! - Only the SHA-256 of a revoked token is stored

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;


// Re-exports for convenience
pub use application::config::AuthConfig;
pub use domain::{AuthenticatedUser, TokenDenylist, UserRepository};
pub use domain::value_object::user_role::UserRole;
pub use error::{AuthError, AuthResult};
pub use infra::{PgUserRepository, RedisTokenDenylist};
pub use presentation::middleware::{AuthMiddlewareState, require_auth, require_roles};
pub use presentation::router::{auth_router, users_router};

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

pub mod models {
    pub use crate::domain::entity::*;
    pub use crate::domain::value_object::*;
    pub use crate::presentation::dto::*;
}

pub mod router {
    pub use crate::presentation::router::*;
}
