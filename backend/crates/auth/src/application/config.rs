//! Application Configuration
//!
//! Configuration for the Auth application layer.

use std::time::Duration;

use platform::password::PasswordHasherService;
use platform::token::TokenCodec;

use crate::error::{AuthError, AuthResult};

/// Default token TTL (3 hours)
pub const DEFAULT_TOKEN_TTL: Duration = Duration::from_secs(3 * 3600);

/// Default upper bound for `limit` on list endpoints
pub const DEFAULT_MAX_PAGE_SIZE: u64 = 100;

/// Auth application configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// HS256 signer/verifier built from the secret key
    pub token_codec: TokenCodec,
    /// Lifetime of issued tokens
    pub token_ttl: Duration,
    /// Argon2id hasher carrying the optional pepper
    pub password_hasher: PasswordHasherService,
    /// Redis key prefix for revoked tokens
    pub denylist_prefix: String,
    pub max_page_size: u64,
}

impl AuthConfig {
    pub fn new(
        secret: &[u8],
        token_ttl: Duration,
        password_pepper: Option<Vec<u8>>,
    ) -> AuthResult<Self> {
        let token_codec =
            TokenCodec::new(secret).map_err(|e| AuthError::Internal(e.to_string()))?;

        Ok(Self {
            token_codec,
            token_ttl,
            password_hasher: PasswordHasherService::new(password_pepper),
            denylist_prefix: "denylist:".to_string(),
            max_page_size: DEFAULT_MAX_PAGE_SIZE,
        })
    }

    /// Config with a random secret key (tokens die with the process)
    pub fn with_random_secret() -> Self {
        Self {
            token_codec: TokenCodec::with_random_secret(),
            token_ttl: DEFAULT_TOKEN_TTL,
            password_hasher: PasswordHasherService::default(),
            denylist_prefix: "denylist:".to_string(),
            max_page_size: DEFAULT_MAX_PAGE_SIZE,
        }
    }

    /// Create config for development
    pub fn development() -> Self {
        Self::with_random_secret()
    }

    pub fn token_ttl_chrono(&self) -> chrono::Duration {
        chrono::Duration::from_std(self.token_ttl).unwrap_or(chrono::Duration::hours(3))
    }

    /// `denylist:<sha256(token)>`
    pub fn denylist_key(&self, token: &str) -> String {
        format!(
            "{}{}",
            self.denylist_prefix,
            platform::crypto::sha256_hex(token.as_bytes())
        )
    }
}
