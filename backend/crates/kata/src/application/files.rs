//! Kata attachments
//!
//! Bytes go to object storage under a unique name; the kata document keeps
//! the list of names.

use std::sync::Arc;

use auth::AuthenticatedUser;
use bytes::Bytes;
use kernel::id::KataId;
use platform::storage::{ObjectStorage, StorageError};
use platform::upload::UploadError;

use crate::application::config::KataConfig;
use crate::application::manage::ensure_can_manage;
use crate::domain::repository::KataRepository;
use crate::error::{KataError, KataResult};

/// One file read from the multipart body
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub original_name: String,
    pub content_type: String,
    pub data: Bytes,
}

// ============================================================================
// Upload
// ============================================================================

pub struct UploadFilesUseCase<K: KataRepository> {
    kata_repo: Arc<K>,
    storage: ObjectStorage,
    config: Arc<KataConfig>,
}

impl<K: KataRepository> UploadFilesUseCase<K> {
    pub fn new(kata_repo: Arc<K>, storage: ObjectStorage, config: Arc<KataConfig>) -> Self {
        Self {
            kata_repo,
            storage,
            config,
        }
    }

    /// Returns the stored names, in upload order
    pub async fn execute(
        &self,
        caller: &AuthenticatedUser,
        kata_id: &KataId,
        files: Vec<UploadedFile>,
    ) -> KataResult<Vec<String>> {
        let policy = &self.config.upload;

        if files.is_empty() {
            return Err(UploadError::EmptyField(policy.field_name.clone()).into());
        }
        policy.check_count(files.len())?;
        for file in &files {
            policy.check_mime(&file.content_type)?;
            policy.check_size(file.data.len())?;
        }

        let kata = self
            .kata_repo
            .find_by_id(kata_id)
            .await?
            .ok_or(KataError::KataNotFound)?;
        ensure_can_manage(caller, &kata)?;

        let mut stored = Vec::with_capacity(files.len());
        for file in files {
            let name = policy.unique_filename(&file.original_name);
            if let Err(e) = self.storage.put(&name, file.data).await {
                self.discard(kata_id, &stored).await;
                return Err(e.into());
            }
            stored.push(name);
        }

        let attached = self
            .kata_repo
            .modify(kata_id, |kata| {
                ensure_can_manage(caller, kata)?;
                kata.attach_files(stored.iter().cloned());
                Ok(())
            })
            .await;

        match attached {
            Ok(Some(_)) => {
                tracing::info!(
                    kata_id = %kata_id,
                    uploaded_by = %caller.user_id,
                    files = stored.len(),
                    "Kata files uploaded"
                );
                Ok(stored)
            }
            Ok(None) => {
                self.discard(kata_id, &stored).await;
                Err(KataError::KataNotFound)
            }
            Err(e) => {
                self.discard(kata_id, &stored).await;
                Err(e)
            }
        }
    }

    /// Remove objects that never made it onto the kata
    async fn discard(&self, kata_id: &KataId, names: &[String]) {
        if names.is_empty() {
            return;
        }
        if let Err(e) = self.storage.delete_many(names).await {
            tracing::warn!(kata_id = %kata_id, error = %e, "Failed to discard uploaded files");
        }
    }
}

// ============================================================================
// Download
// ============================================================================

pub struct DownloadFileUseCase<K: KataRepository> {
    kata_repo: Arc<K>,
    storage: ObjectStorage,
}

impl<K: KataRepository> DownloadFileUseCase<K> {
    pub fn new(kata_repo: Arc<K>, storage: ObjectStorage) -> Self {
        Self { kata_repo, storage }
    }

    /// Only names listed on the kata are served
    pub async fn execute(&self, kata_id: &KataId, filename: &str) -> KataResult<Bytes> {
        let kata = self
            .kata_repo
            .find_by_id(kata_id)
            .await?
            .ok_or(KataError::KataNotFound)?;

        if !kata.has_file(filename) {
            return Err(KataError::FileNotFound(filename.to_string()));
        }

        match self.storage.get(filename).await {
            Ok(data) => Ok(data),
            Err(StorageError::NotFound(name)) => {
                tracing::warn!(kata_id = %kata_id, object = %name, "Listed file missing from storage");
                Err(KataError::FileNotFound(name))
            }
            Err(e) => Err(e.into()),
        }
    }
}
