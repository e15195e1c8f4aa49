//! Domain Layer
//!
//! Contains entities, value objects, and repository traits.

pub mod entity;
pub mod repository;
pub mod value_object;

// Re-exports
pub use entity::kata::{Kata, KataDraft};
pub use repository::{KataFilter, KataRepository, KataSortField};
pub use value_object::{
    kata_level::KataLevel,
    kata_stars::{KataStars, StarRating},
};
