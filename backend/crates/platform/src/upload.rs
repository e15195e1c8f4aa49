//! Upload policy for multipart attachments

use thiserror::Error;

use crate::crypto::random_suffix;

/// 200 MiB
pub const DEFAULT_MAX_FILE_SIZE: usize = 209_715_200;

pub const DEFAULT_MAX_FILES: usize = 3;

pub const DEFAULT_FIELD_NAME: &str = "files";

/// Images, mp4, pdf, Office documents and rar/zip archives
pub const DEFAULT_ALLOWED_MIMES: &[&str] = &[
    "image/jpeg",
    "image/jpg",
    "image/png",
    "video/mp4",
    "application/pdf",
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    "application/vnd.openxmlformats-officedocument.presentationml.presentation",
    "application/x-rar-compressed",
    "application/zip",
    "application/x-zip-compressed",
    "multipart/x-zip",
    "application/octet-stream",
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UploadError {
    #[error("There is no {0} field")]
    MissingField(String),

    #[error("{0} field is empty")]
    EmptyField(String),

    #[error("Unexpected field {field}. The field name must be called {expected}")]
    UnexpectedField { field: String, expected: String },

    #[error("The field must contain at most {max} files")]
    TooManyFiles { max: usize },

    #[error("Invalid file type {mime}. Only {allowed} types are allowed.")]
    UnsupportedMime { mime: String, allowed: String },

    #[error("File too large. Files can size at most {max} Bytes")]
    TooLarge { max: usize },
}

#[derive(Debug, Clone)]
pub struct UploadPolicy {
    pub allowed_mimes: Vec<String>,
    pub max_file_size: usize,
    pub max_files: usize,
    pub field_name: String,
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self {
            allowed_mimes: DEFAULT_ALLOWED_MIMES.iter().map(|m| m.to_string()).collect(),
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            max_files: DEFAULT_MAX_FILES,
            field_name: DEFAULT_FIELD_NAME.to_string(),
        }
    }
}

impl UploadPolicy {
    /// Compares the essence of the type: parameters such as `; charset=` are ignored.
    pub fn check_mime(&self, mime: &str) -> Result<(), UploadError> {
        let essence = mime
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();

        if self.allowed_mimes.iter().any(|m| *m == essence) {
            Ok(())
        } else {
            Err(UploadError::UnsupportedMime {
                mime: mime.to_string(),
                allowed: self.allowed_mimes.join(","),
            })
        }
    }

    pub fn check_size(&self, size: usize) -> Result<(), UploadError> {
        if size > self.max_file_size {
            return Err(UploadError::TooLarge {
                max: self.max_file_size,
            });
        }
        Ok(())
    }

    pub fn check_field(&self, field: &str) -> Result<(), UploadError> {
        if field == self.field_name {
            Ok(())
        } else {
            Err(UploadError::UnexpectedField {
                field: field.to_string(),
                expected: self.field_name.clone(),
            })
        }
    }

    /// `count` is the number of files received so far, including the current one
    pub fn check_count(&self, count: usize) -> Result<(), UploadError> {
        if count > self.max_files {
            return Err(UploadError::TooManyFiles {
                max: self.max_files,
            });
        }
        Ok(())
    }

    /// `{unix_ms}-{random}-{name}`
    pub fn unique_filename(&self, original: &str) -> String {
        format!(
            "{}-{}-{}",
            chrono::Utc::now().timestamp_millis(),
            random_suffix(),
            sanitize_filename(original)
        )
    }
}

/// Keep only the last path component and a conservative character set.
pub fn sanitize_filename(original: &str) -> String {
    let base = original
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .trim();

    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();

    let cleaned = cleaned.trim_start_matches('.');
    if cleaned.is_empty() {
        "file".to_string()
    } else {
        cleaned.to_string()
    }
}
