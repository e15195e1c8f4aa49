//! Value Object Module

pub mod kata_level;
pub mod kata_name;
pub mod kata_stars;
