//! Verify Token Use Case
//!
//! Signature and expiry first, then the denylist.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::domain::entity::authenticated_user::{AuthenticatedUser, Claims};
use crate::domain::repository::TokenDenylist;
use crate::error::{AuthError, AuthResult};

pub struct VerifyTokenUseCase<D>
where
    D: TokenDenylist,
{
    denylist: Arc<D>,
    config: Arc<AuthConfig>,
}

impl<D> VerifyTokenUseCase<D>
where
    D: TokenDenylist,
{
    pub fn new(denylist: Arc<D>, config: Arc<AuthConfig>) -> Self {
        Self { denylist, config }
    }

    pub async fn execute(&self, token: &str) -> AuthResult<AuthenticatedUser> {
        let claims: Claims = self.config.token_codec.verify(token)?;

        if self
            .denylist
            .is_revoked(&self.config.denylist_key(token))
            .await?
        {
            return Err(AuthError::TokenRevoked);
        }

        Ok(AuthenticatedUser::from_claims(claims, token.to_string()))
    }
}
