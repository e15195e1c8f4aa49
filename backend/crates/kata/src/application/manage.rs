//! Create / Update / Delete Kata Use Cases

use std::sync::Arc;

use auth::AuthenticatedUser;
use kernel::id::{KataId, UserId};
use platform::storage::ObjectStorage;

use crate::application::config::{DEFAULT_DESCRIPTION, DEFAULT_INTENTS, DEFAULT_SOLUTION};
use crate::domain::entity::kata::{Kata, KataDraft};
use crate::domain::repository::KataRepository;
use crate::domain::value_object::{kata_level::KataLevel, kata_name::KataName};
use crate::error::{KataError, KataResult};

/// The creator or an admin
pub(crate) fn ensure_can_manage(caller: &AuthenticatedUser, kata: &Kata) -> KataResult<()> {
    if caller.can_manage(&kata.creator) {
        Ok(())
    } else {
        Err(KataError::NotOwner)
    }
}

fn validate_intents(intents: i64) -> KataResult<i32> {
    i32::try_from(intents)
        .ok()
        .filter(|i| *i >= 0)
        .ok_or_else(|| KataError::Validation("intents must be a non-negative integer".into()))
}

// ============================================================================
// Create
// ============================================================================

pub struct CreateKataInput {
    pub name: String,
    pub description: Option<String>,
    pub level: Option<String>,
    pub intents: Option<i64>,
    pub solution: Option<String>,
    pub participants: Vec<UserId>,
}

pub struct CreateKataUseCase<K: KataRepository> {
    kata_repo: Arc<K>,
}

impl<K: KataRepository> CreateKataUseCase<K> {
    pub fn new(kata_repo: Arc<K>) -> Self {
        Self { kata_repo }
    }

    pub async fn execute(&self, caller: &AuthenticatedUser, input: CreateKataInput) -> KataResult<Kata> {
        let draft = KataDraft {
            name: KataName::new(&input.name)?,
            description: input
                .description
                .filter(|d| !d.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string()),
            level: input
                .level
                .as_deref()
                .map(KataLevel::from_lenient)
                .unwrap_or_default(),
            intents: match input.intents {
                Some(intents) => validate_intents(intents)?,
                None => DEFAULT_INTENTS,
            },
            solution: input
                .solution
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_SOLUTION.to_string()),
        };

        let kata = Kata::create(draft, caller.user_id, input.participants);
        self.kata_repo.create(&kata).await?;

        tracing::info!(
            kata_id = %kata.kata_id,
            creator = %kata.creator,
            level = %kata.level,
            "Kata created"
        );

        Ok(kata)
    }
}

// ============================================================================
// Update
// ============================================================================

pub struct UpdateKataInput {
    pub kata_id: KataId,
    pub name: String,
    pub description: String,
    pub level: String,
    pub intents: i64,
    pub solution: String,
}

pub struct UpdateKataUseCase<K: KataRepository> {
    kata_repo: Arc<K>,
}

impl<K: KataRepository> UpdateKataUseCase<K> {
    pub fn new(kata_repo: Arc<K>) -> Self {
        Self { kata_repo }
    }

    pub async fn execute(&self, caller: &AuthenticatedUser, input: UpdateKataInput) -> KataResult<Kata> {
        let draft = KataDraft {
            name: KataName::new(&input.name)?,
            description: input.description,
            level: KataLevel::from_lenient(&input.level),
            intents: validate_intents(input.intents)?,
            solution: input.solution,
        };

        let kata = self
            .kata_repo
            .modify(&input.kata_id, |kata| {
                ensure_can_manage(caller, kata)?;
                kata.apply(draft);
                Ok(())
            })
            .await?
            .ok_or(KataError::KataNotFound)?;

        tracing::info!(kata_id = %kata.kata_id, updated_by = %caller.user_id, "Kata updated");
        Ok(kata)
    }
}

// ============================================================================
// Delete
// ============================================================================

pub struct DeleteKataUseCase<K: KataRepository> {
    kata_repo: Arc<K>,
    storage: ObjectStorage,
}

impl<K: KataRepository> DeleteKataUseCase<K> {
    pub fn new(kata_repo: Arc<K>, storage: ObjectStorage) -> Self {
        Self { kata_repo, storage }
    }

    pub async fn execute(&self, caller: &AuthenticatedUser, kata_id: &KataId) -> KataResult<()> {
        let kata = self
            .kata_repo
            .find_by_id(kata_id)
            .await?
            .ok_or(KataError::KataNotFound)?;
        ensure_can_manage(caller, &kata)?;

        let deleted = self
            .kata_repo
            .delete(kata_id)
            .await?
            .ok_or(KataError::KataNotFound)?;

        // Storage failure is not fatal once the document is gone
        if let Err(e) = self.storage.delete_many(&deleted.files).await {
            tracing::error!(kata_id = %kata_id, error = %e, "Failed to delete kata files");
        }

        tracing::info!(
            kata_id = %kata_id,
            deleted_by = %caller.user_id,
            files = deleted.files.len(),
            "Kata deleted"
        );
        Ok(())
    }
}
