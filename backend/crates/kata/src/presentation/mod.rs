//! Presentation Layer
//!
//! HTTP handlers, DTOs and routers.

pub mod dto;
pub mod handlers;
pub mod router;

pub use handlers::KataAppState;
pub use router::{katas_router, katas_router_generic, user_katas_router, user_katas_router_generic};
