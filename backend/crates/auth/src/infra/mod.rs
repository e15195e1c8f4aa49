//! Infrastructure Layer
//!
//! Database implementations and external service integrations.

pub mod postgres;
pub mod redis_denylist;

pub use postgres::PgUserRepository;
pub use redis_denylist::RedisTokenDenylist;
