//! Logout Use Case
//!
//! Denylists the caller's token until it would have expired anyway.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;

use crate::application::config::AuthConfig;
use crate::domain::entity::authenticated_user::AuthenticatedUser;
use crate::domain::repository::TokenDenylist;
use crate::error::AuthResult;

pub struct LogoutUseCase<D>
where
    D: TokenDenylist,
{
    denylist: Arc<D>,
    config: Arc<AuthConfig>,
}

impl<D> LogoutUseCase<D>
where
    D: TokenDenylist,
{
    pub fn new(denylist: Arc<D>, config: Arc<AuthConfig>) -> Self {
        Self { denylist, config }
    }

    pub async fn execute(&self, caller: &AuthenticatedUser) -> AuthResult<()> {
        let remaining = (caller.expires_at - Utc::now()).num_seconds().max(1);
        let ttl = Duration::from_secs(remaining.unsigned_abs());

        self.denylist
            .revoke(&self.config.denylist_key(&caller.token), ttl)
            .await?;

        tracing::info!(user_id = %caller.user_id, ttl_secs = ttl.as_secs(), "User logged out");
        Ok(())
    }
}
