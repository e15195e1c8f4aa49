//! Login Use Case
//!
//! Checks credentials and issues a signed token.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use platform::password::ClearTextPassword;

use crate::application::config::AuthConfig;
use crate::domain::entity::authenticated_user::Claims;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{email::Email, user_name::UserName};
use crate::error::{AuthError, AuthResult};

/// Login input
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

/// Login output
#[derive(Debug)]
pub struct LoginOutput {
    pub token: String,
    pub user_name: UserName,
    pub expires_at: DateTime<Utc>,
}

/// Login use case
pub struct LoginUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
    config: Arc<AuthConfig>,
}

impl<U> LoginUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>, config: Arc<AuthConfig>) -> Self {
        Self { user_repo, config }
    }

    pub async fn execute(&self, input: LoginInput) -> AuthResult<LoginOutput> {
        let email = Email::new(&input.email).map_err(|_| AuthError::InvalidCredentials)?;
        let password = ClearTextPassword::for_verification(input.password);

        let user = self
            .user_repo
            .find_by_email(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        let hasher = self.config.password_hasher.clone();
        let stored_hash = user.password_hash.clone();
        let valid = tokio::task::spawn_blocking(move || hasher.verify(&password, &stored_hash))
            .await
            .map_err(|e| AuthError::Internal(format!("Verification task failed: {}", e)))?;

        if !valid {
            return Err(AuthError::InvalidCredentials);
        }

        let claims = Claims::for_user(&user, Utc::now(), self.config.token_ttl_chrono());
        let token = self.config.token_codec.sign(&claims)?;

        tracing::info!(user_id = %user.user_id, "User logged in");

        Ok(LoginOutput {
            token,
            expires_at: claims.expires_at(),
            user_name: user.user_name,
        })
    }
}
