//! `From` impls into [`AppError`] and its HTTP rendering

use super::app_error::AppError;
use super::kind::ErrorKind;

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        use std::io::ErrorKind as Io;

        let kind = match err.kind() {
            Io::NotFound => ErrorKind::NotFound,
            Io::PermissionDenied => ErrorKind::Forbidden,
            Io::TimedOut | Io::ConnectionRefused | Io::ConnectionReset => {
                ErrorKind::ServiceUnavailable
            }
            _ => ErrorKind::InternalServerError,
        };
        AppError::new(kind, "I/O operation failed").with_source(err)
    }
}

/// Typed ids parse through `uuid`
impl From<uuid::Error> for AppError {
    fn from(err: uuid::Error) -> Self {
        AppError::bad_request("Invalid id format").with_source(err)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        match err.classify() {
            serde_json::error::Category::Io => {
                AppError::internal("JSON serialization error").with_source(err)
            }
            _ => AppError::bad_request(format!("JSON parse error: {}", err)).with_source(err),
        }
    }
}

/// SQLSTATE to error, see the PostgreSQL error code appendix
#[cfg(feature = "sqlx")]
fn from_sqlstate(code: &str) -> AppError {
    match code {
        "23505" => AppError::conflict("Duplicate key value"),
        "23503" => AppError::conflict("Referenced record does not exist"),
        "23502" | "23514" | "22P02" => AppError::bad_request("Value rejected by the database"),
        c if c.starts_with("53") || c.starts_with("57") => {
            AppError::service_unavailable("Database unavailable")
        }
        _ => AppError::internal("Database error"),
    }
}

#[cfg(feature = "sqlx")]
impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        let app_err = match &err {
            sqlx::Error::RowNotFound => AppError::not_found("Record not found"),
            sqlx::Error::PoolTimedOut | sqlx::Error::Io(_) => {
                AppError::service_unavailable("Database unavailable")
            }
            sqlx::Error::Database(db_err) => match db_err.code() {
                Some(code) => from_sqlstate(&code),
                None => AppError::internal("Database error"),
            },
            _ => AppError::internal("Database error"),
        };
        app_err.with_source(err)
    }
}

/// RFC 7807 problem document
#[cfg(feature = "axum")]
#[derive(serde::Serialize)]
struct Problem<'a> {
    #[serde(rename = "type")]
    problem_type: String,
    title: &'static str,
    status: u16,
    detail: &'a str,
    action: Option<&'a str>,
}

#[cfg(feature = "axum")]
impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        use axum::http::StatusCode;

        let kind = self.kind();
        let status =
            StatusCode::from_u16(kind.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let problem = Problem {
            problem_type: kind.problem_type(),
            title: kind.as_str(),
            status: kind.status_code(),
            detail: self.message(),
            action: self.action(),
        };

        (status, axum::Json(problem)).into_response()
    }
}
