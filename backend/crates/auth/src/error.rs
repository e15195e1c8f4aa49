//! Auth Error Types
//!
//! This module provides auth-specific error variants that integrate
//! with the unified `kernel::error::AppError` system.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use platform::password::{PasswordHashError, PasswordPolicyError};
use platform::token::TokenError;
use thiserror::Error;

use crate::domain::value_object::user_role::UserRole;

/// Auth-specific result type alias
pub type AuthResult<T> = Result<T, AuthError>;

/// Auth-specific error variants
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("User not found")]
    UserNotFound,

    #[error("Email already registered")]
    EmailTaken,

    #[error("User name already exists")]
    UserNameTaken,

    /// Unknown email or wrong password; never say which
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Missing JWT in request")]
    MissingToken,

    #[error("Token has expired")]
    TokenExpired,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Token has been revoked")]
    TokenRevoked,

    #[error("Cannot access with role: {0}")]
    RoleNotAllowed(UserRole),

    /// Caller is neither the owner nor an admin
    #[error("Not allowed to modify this user")]
    NotOwner,

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    PasswordPolicy(#[from] PasswordPolicyError),

    #[error("Token denylist unavailable: {0}")]
    DenylistUnavailable(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error(transparent)]
    App(#[from] AppError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.kind().status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::UserNotFound => ErrorKind::NotFound,
            AuthError::EmailTaken | AuthError::UserNameTaken => ErrorKind::Conflict,
            AuthError::InvalidCredentials
            | AuthError::MissingToken
            | AuthError::TokenExpired
            | AuthError::InvalidToken
            | AuthError::TokenRevoked => ErrorKind::Unauthorized,
            AuthError::RoleNotAllowed(_) | AuthError::NotOwner => ErrorKind::Forbidden,
            AuthError::Validation(_) | AuthError::PasswordPolicy(_) => ErrorKind::BadRequest,
            AuthError::DenylistUnavailable(_) => ErrorKind::ServiceUnavailable,
            AuthError::App(e) => e.kind(),
            AuthError::Database(_) | AuthError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Convert to AppError
    pub fn to_app_error(&self) -> AppError {
        match self {
            AuthError::App(e) => e.without_source(),
            AuthError::MissingToken => AppError::unauthorized(self.to_string())
                .with_action("Send the token in the x-access-token header"),
            AuthError::TokenExpired => {
                AppError::unauthorized(self.to_string()).with_action("Log in again")
            }
            // Do not leak driver details to clients
            AuthError::Database(_) | AuthError::Internal(_) => {
                AppError::internal("Something went wrong")
            }
            AuthError::DenylistUnavailable(_) => {
                AppError::service_unavailable("Authentication temporarily unavailable")
            }
            _ => AppError::new(self.kind(), self.to_string()),
        }
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            AuthError::Database(e) => {
                tracing::error!(error = %e, "Auth database error");
            }
            AuthError::Internal(msg) => {
                tracing::error!(message = %msg, "Auth internal error");
            }
            AuthError::DenylistUnavailable(msg) => {
                tracing::error!(message = %msg, "Token denylist unavailable");
            }
            AuthError::App(e) if e.is_server_error() => {
                tracing::error!(error = ?e, "Auth application error");
            }
            AuthError::InvalidCredentials => {
                tracing::warn!("Invalid login attempt");
            }
            AuthError::TokenRevoked | AuthError::InvalidToken => {
                tracing::warn!(error = %self, "Rejected token");
            }
            AuthError::RoleNotAllowed(role) => {
                tracing::warn!(role = %role, "Role not allowed");
            }
            _ => {
                tracing::debug!(error = %self, "Auth error");
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        self.log();
        match self {
            AuthError::App(e) => e.into_response(),
            other => other.to_app_error().into_response(),
        }
    }
}

impl From<PasswordHashError> for AuthError {
    fn from(err: PasswordHashError) -> Self {
        AuthError::Internal(err.to_string())
    }
}

impl From<TokenError> for AuthError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Expired => AuthError::TokenExpired,
            TokenError::Invalid(_) => AuthError::InvalidToken,
            TokenError::WeakSecret | TokenError::Signing(_) => AuthError::Internal(err.to_string()),
        }
    }
}

impl From<redis::RedisError> for AuthError {
    fn from(err: redis::RedisError) -> Self {
        AuthError::DenylistUnavailable(err.to_string())
    }
}
