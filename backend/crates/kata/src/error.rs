//! Kata Error Types
//!
//! Kata-specific error variants that integrate with the unified
//! `kernel::error::AppError` system.

use auth::AuthError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use platform::storage::StorageError;
use platform::upload::UploadError;
use thiserror::Error;

use crate::domain::value_object::kata_level::InvalidKataLevel;

/// Kata-specific result type alias
pub type KataResult<T> = Result<T, KataError>;

#[derive(Debug, Error)]
pub enum KataError {
    #[error("Kata not found")]
    KataNotFound,

    #[error("User not found")]
    UserNotFound,

    #[error("File not found: {0}")]
    FileNotFound(String),

    /// Caller is neither the creator nor an admin
    #[error("Only the creator or an admin can modify this kata")]
    NotOwner,

    #[error("Only participants can rate this kata")]
    NotParticipant,

    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    InvalidLevel(#[from] InvalidKataLevel),

    #[error(transparent)]
    Upload(#[from] UploadError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    App(#[from] AppError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl KataError {
    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.kind().status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            KataError::KataNotFound | KataError::UserNotFound | KataError::FileNotFound(_) => {
                ErrorKind::NotFound
            }
            KataError::NotOwner | KataError::NotParticipant => ErrorKind::Forbidden,
            KataError::Validation(_) | KataError::InvalidLevel(_) => ErrorKind::BadRequest,
            KataError::Upload(e) => match e {
                UploadError::UnsupportedMime { .. } => ErrorKind::UnsupportedMediaType,
                UploadError::TooLarge { .. } => ErrorKind::PayloadTooLarge,
                UploadError::MissingField(_)
                | UploadError::EmptyField(_)
                | UploadError::UnexpectedField { .. }
                | UploadError::TooManyFiles { .. } => ErrorKind::BadRequest,
            },
            KataError::Storage(StorageError::NotFound(_)) => ErrorKind::NotFound,
            KataError::Storage(StorageError::InvalidName(_)) => ErrorKind::BadRequest,
            KataError::Storage(_) => ErrorKind::BadGateway,
            KataError::Auth(e) => e.kind(),
            KataError::App(e) => e.kind(),
            KataError::Database(_) | KataError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    pub fn to_app_error(&self) -> AppError {
        match self {
            KataError::App(e) => e.without_source(),
            KataError::Auth(e) => e.to_app_error(),
            KataError::Database(_) | KataError::Internal(_) => {
                AppError::internal("Something went wrong")
            }
            KataError::Storage(StorageError::Backend(_) | StorageError::Config(_)) => {
                AppError::bad_gateway("File storage is unavailable")
                    .with_action("Try again later")
            }
            _ => AppError::new(self.kind(), self.to_string()),
        }
    }

    fn log(&self) {
        match self {
            KataError::Database(e) => {
                tracing::error!(error = %e, "Kata database error");
            }
            KataError::Internal(msg) => {
                tracing::error!(message = %msg, "Kata internal error");
            }
            KataError::Storage(e) => {
                tracing::error!(error = %e, "Kata storage error");
            }
            KataError::App(e) if e.is_server_error() => {
                tracing::error!(error = ?e, "Kata application error");
            }
            KataError::NotOwner | KataError::NotParticipant => {
                tracing::warn!(error = %self, "Kata access denied");
            }
            _ => {
                tracing::debug!(error = %self, "Kata error");
            }
        }
    }
}

impl IntoResponse for KataError {
    fn into_response(self) -> Response {
        match self {
            // Logs itself
            KataError::Auth(e) => e.into_response(),
            KataError::App(e) => {
                if e.is_server_error() {
                    tracing::error!(error = ?e, "Kata application error");
                }
                e.into_response()
            }
            other => {
                other.log();
                other.to_app_error().into_response()
            }
        }
    }
}
