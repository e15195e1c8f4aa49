//! Object storage for uploaded files
//!
//! Thin wrapper over `object_store`: S3 in production, a local directory in
//! development, memory in tests. Objects live at the bucket root and are
//! addressed by a flat file name.

use std::path::Path;
use std::sync::Arc;

use bytes::Bytes;
use object_store::{
    ObjectStore, PutPayload, aws::AmazonS3Builder, local::LocalFileSystem, memory::InMemory,
    path::Path as ObjectPath,
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Object not found: {0}")]
    NotFound(String),

    #[error("Invalid object name: {0}")]
    InvalidName(String),

    #[error("Storage configuration error: {0}")]
    Config(String),

    #[error("Storage backend error: {0}")]
    Backend(#[from] object_store::Error),
}

#[derive(Debug, Clone)]
pub struct ObjectStorage {
    store: Arc<dyn ObjectStore>,
}

impl ObjectStorage {
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self { store }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemory::new()))
    }

    /// Local directory, created if missing
    pub fn local(dir: impl AsRef<Path>) -> Result<Self, StorageError> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir).map_err(|e| {
            StorageError::Config(format!(
                "Failed to create storage directory '{}': {}",
                dir.display(),
                e
            ))
        })?;

        let store = LocalFileSystem::new_with_prefix(dir)?;
        Ok(Self::new(Arc::new(store)))
    }

    /// S3 bucket; credentials and region come from the standard `AWS_*`
    /// environment variables.
    pub fn s3(bucket: &str) -> Result<Self, StorageError> {
        let store = AmazonS3Builder::from_env()
            .with_bucket_name(bucket)
            .build()
            .map_err(|e| StorageError::Config(format!("Failed to create S3 store: {}", e)))?;
        Ok(Self::new(Arc::new(store)))
    }

    fn object_path(name: &str) -> Result<ObjectPath, StorageError> {
        if name.is_empty()
            || name == "."
            || name == ".."
            || name.contains(['/', '\\'])
            || name.chars().any(char::is_control)
        {
            return Err(StorageError::InvalidName(name.to_string()));
        }
        Ok(ObjectPath::from(name))
    }

    pub async fn put(&self, name: &str, data: Bytes) -> Result<(), StorageError> {
        let path = Self::object_path(name)?;
        self.store.put(&path, PutPayload::from(data)).await?;
        tracing::debug!(object = %name, "Stored object");
        Ok(())
    }

    pub async fn exists(&self, name: &str) -> Result<bool, StorageError> {
        let path = Self::object_path(name)?;
        match self.store.head(&path).await {
            Ok(_) => Ok(true),
            Err(object_store::Error::NotFound { .. }) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn get(&self, name: &str) -> Result<Bytes, StorageError> {
        let path = Self::object_path(name)?;
        let result = self.store.get(&path).await.map_err(|e| match e {
            object_store::Error::NotFound { .. } => StorageError::NotFound(name.to_string()),
            other => StorageError::Backend(other),
        })?;
        Ok(result.bytes().await?)
    }

    /// Delete every named object.
    ///
    /// Missing objects are skipped. All names are attempted; the first
    /// failure is returned.
    pub async fn delete_many(&self, names: &[String]) -> Result<(), StorageError> {
        let mut first_error = None;

        for name in names {
            let outcome = match Self::object_path(name) {
                Ok(path) => match self.store.delete(&path).await {
                    Ok(()) | Err(object_store::Error::NotFound { .. }) => Ok(()),
                    Err(e) => Err(StorageError::Backend(e)),
                },
                Err(e) => Err(e),
            };

            if let Err(e) = outcome {
                tracing::warn!(object = %name, error = %e, "Failed to delete object");
                first_error.get_or_insert(e);
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}
