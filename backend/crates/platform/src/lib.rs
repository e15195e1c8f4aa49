//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Cryptographic utilities (SHA-256, random suffixes)
//! - Password hashing (Argon2id, NIST SP 800-63B compliant)
//! - JWT signing and verification
//! - Object storage (S3 or local filesystem)
//! - Upload policy for multipart attachments
//! - Numeric value fixing for user input

pub mod crypto;
pub mod password;
pub mod storage;
pub mod token;
pub mod upload;
pub mod values;
