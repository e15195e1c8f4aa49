//! Server settings from the environment

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, bail};
use auth::AuthConfig;
use kata::KataConfig;
use platform::storage::ObjectStorage;

const DEFAULT_FRONTEND_ORIGINS: &str = "http://localhost:3000";

/// Where uploaded files go
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageBackend {
    Local(PathBuf),
    S3 { bucket: String },
}

impl StorageBackend {
    pub fn open(&self) -> anyhow::Result<ObjectStorage> {
        let storage = match self {
            StorageBackend::Local(dir) => ObjectStorage::local(dir)
                .with_context(|| format!("Failed to open storage at {}", dir.display()))?,
            StorageBackend::S3 { bucket } => ObjectStorage::s3(bucket)
                .with_context(|| format!("Failed to open S3 bucket {}", bucket))?,
        };
        Ok(storage)
    }
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub addr: SocketAddr,
    pub database_url: String,
    pub database_max_connections: u32,
    pub redis_url: String,
    /// `None` means a random per-process secret (debug builds only)
    pub secret_key: Option<String>,
    pub token_ttl: Duration,
    pub password_pepper: Option<String>,
    pub storage: StorageBackend,
    pub frontend_origins: Vec<String>,
}

impl Settings {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok(), cfg!(debug_assertions))
    }

    /// `lookup` returns the raw value of a variable, if set
    pub fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
        debug: bool,
    ) -> anyhow::Result<Self> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let host: IpAddr = get("HOST")
            .unwrap_or_else(|| "0.0.0.0".to_string())
            .parse()
            .context("HOST must be an IP address")?;
        let port: u16 = get("PORT")
            .unwrap_or_else(|| "8000".to_string())
            .parse()
            .context("PORT must be a number")?;

        let database_url = get("DATABASE_URL").context("DATABASE_URL must be set")?;
        let database_max_connections: u32 = get("DATABASE_MAX_CONNECTIONS")
            .unwrap_or_else(|| "10".to_string())
            .parse()
            .context("DATABASE_MAX_CONNECTIONS must be a number")?;

        let redis_url = get("REDIS_URL").unwrap_or_else(|| "redis://localhost:6379".to_string());

        let secret_key = get("SECRET_KEY");
        if secret_key.is_none() && !debug {
            bail!("SECRET_KEY must be set in release builds");
        }

        let token_ttl_secs: u64 = get("TOKEN_TTL_SECS")
            .unwrap_or_else(|| "10800".to_string())
            .parse()
            .context("TOKEN_TTL_SECS must be a number of seconds")?;

        let storage = match get("STORAGE_BACKEND").as_deref().unwrap_or("local") {
            "local" => StorageBackend::Local(PathBuf::from(
                get("LOCAL_STORAGE_DIR").unwrap_or_else(|| "public/tmp".to_string()),
            )),
            "s3" => StorageBackend::S3 {
                bucket: get("AWS_BUCKET_NAME").unwrap_or_else(|| "bucket_example".to_string()),
            },
            other => bail!("STORAGE_BACKEND must be 'local' or 's3', got '{}'", other),
        };

        let frontend_origins = get("FRONTEND_ORIGINS")
            .unwrap_or_else(|| DEFAULT_FRONTEND_ORIGINS.to_string())
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();

        Ok(Self {
            addr: SocketAddr::new(host, port),
            database_url,
            database_max_connections,
            redis_url,
            secret_key,
            token_ttl: Duration::from_secs(token_ttl_secs),
            password_pepper: get("PASSWORD_PEPPER"),
            storage,
            frontend_origins,
        })
    }

    pub fn auth_config(&self) -> anyhow::Result<AuthConfig> {
        let pepper = self.password_pepper.as_ref().map(|p| p.as_bytes().to_vec());
        match &self.secret_key {
            Some(secret) => AuthConfig::new(secret.as_bytes(), self.token_ttl, pepper)
                .context("Invalid SECRET_KEY"),
            None => {
                tracing::warn!("SECRET_KEY not set, using a random secret; tokens will not survive a restart");
                let mut config = AuthConfig::development();
                config.token_ttl = self.token_ttl;
                config.password_hasher = platform::password::PasswordHasherService::new(pepper);
                Ok(config)
            }
        }
    }

    pub fn kata_config(&self) -> KataConfig {
        KataConfig::default()
    }
}
