//! Kata Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Kata entity, level and star value objects, repository trait
//! - `application/` - Use cases
//! - `infra/` - PostgreSQL repository
//! - `presentation/` - HTTP handlers, DTOs, routers
//!
//! ## Features
//! - Kata CRUD with level filter, paging and sorting
//! - Star ratings by participants, averaged over every rating
//! - Joining a kata as a participant
//! - File attachments kept in object storage
//! - Katas created by a given user
//!
//! Every route requires a token verified by [`auth::require_auth`].

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

#[cfg(test)]
mod tests;

// Re-exports for convenience
pub use application::config::KataConfig;
pub use domain::{Kata, KataLevel, KataRepository};
pub use error::{KataError, KataResult};
pub use infra::PgKataRepository;
pub use presentation::router::{katas_router, user_katas_router};

pub mod models {
    pub use crate::domain::entity::*;
    pub use crate::domain::value_object::*;
    pub use crate::presentation::dto::*;
}

pub mod router {
    pub use crate::presentation::router::*;
}
