use kernel::error::app_error::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const KATA_NAME_MAX_LENGTH: usize = 128;

/// Trimmed, 1..=128 chars
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KataName(String);

impl KataName {
    pub fn new(raw: impl AsRef<str>) -> AppResult<Self> {
        let trimmed = raw.as_ref().trim();

        if trimmed.is_empty() {
            return Err(AppError::bad_request("Kata name cannot be empty"));
        }
        if trimmed.chars().count() > KATA_NAME_MAX_LENGTH {
            return Err(AppError::bad_request(format!(
                "Kata name must be at most {} characters",
                KATA_NAME_MAX_LENGTH
            )));
        }
        if trimmed.chars().any(char::is_control) {
            return Err(AppError::bad_request("Kata name contains control characters"));
        }

        Ok(Self(trimmed.to_string()))
    }

    pub fn from_db(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_db(self) -> String {
        self.0
    }
}

impl fmt::Display for KataName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
