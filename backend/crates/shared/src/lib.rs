//! Kernel shared by the `auth` and `kata` contexts
//!
//! Holds only what means the same thing everywhere: the error type every
//! handler renders through, UUID-backed ids, and the paging and sorting
//! vocabulary of list endpoints.

pub mod error {
    pub mod app_error;
    pub mod conversions;
    pub mod kind;

    pub use app_error::{AppError, AppResult};
    pub use kind::ErrorKind;
}
pub mod id;
pub mod query;
