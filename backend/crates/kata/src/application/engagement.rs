//! Stars and participants

use std::sync::Arc;

use auth::AuthenticatedUser;
use kernel::id::{KataId, UserId};
use platform::values::fix_number_value;

use crate::domain::repository::KataRepository;
use crate::domain::value_object::kata_stars::MAX_STARS;
use crate::error::{KataError, KataResult};

/// Rate kata use case
pub struct RateKataUseCase<K: KataRepository> {
    kata_repo: Arc<K>,
}

impl<K: KataRepository> RateKataUseCase<K> {
    pub fn new(kata_repo: Arc<K>) -> Self {
        Self { kata_repo }
    }

    /// `stars` is clamped to `0..=5` and rounded. Returns the new average.
    pub async fn execute(
        &self,
        caller: &AuthenticatedUser,
        kata_id: &KataId,
        stars: f64,
    ) -> KataResult<f64> {
        let stars = fix_number_value(stars, 0.0, f64::from(MAX_STARS), true) as u8;
        let user = caller.user_id;

        let kata = self
            .kata_repo
            .modify(kata_id, |kata| {
                if !kata.is_participant(&user) {
                    return Err(KataError::NotParticipant);
                }
                kata.rate(user, stars);
                Ok(())
            })
            .await?
            .ok_or(KataError::KataNotFound)?;

        tracing::info!(
            kata_id = %kata_id,
            user_id = %user,
            stars,
            average = kata.stars.average,
            "Kata rated"
        );
        Ok(kata.stars.average)
    }
}

/// Join kata use case
pub struct JoinKataUseCase<K: KataRepository> {
    kata_repo: Arc<K>,
}

impl<K: KataRepository> JoinKataUseCase<K> {
    pub fn new(kata_repo: Arc<K>) -> Self {
        Self { kata_repo }
    }

    /// Idempotent. Returns the participant list.
    pub async fn execute(
        &self,
        caller: &AuthenticatedUser,
        kata_id: &KataId,
    ) -> KataResult<Vec<UserId>> {
        let user = caller.user_id;
        let mut added = false;

        let kata = self
            .kata_repo
            .modify(kata_id, |kata| {
                added = kata.join(user);
                Ok(())
            })
            .await?
            .ok_or(KataError::KataNotFound)?;

        if added {
            tracing::info!(kata_id = %kata_id, user_id = %user, "Participant joined");
        }
        Ok(kata.participants)
    }
}
