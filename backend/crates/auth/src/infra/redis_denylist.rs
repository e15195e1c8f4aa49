//! Redis Token Denylist

use std::time::Duration;

use redis::AsyncCommands;
use redis::aio::ConnectionManager;

use crate::domain::repository::TokenDenylist;
use crate::error::AuthResult;

/// Denylist entries stored as `SET key 1 EX ttl`
#[derive(Clone)]
pub struct RedisTokenDenylist {
    conn: ConnectionManager,
}

impl RedisTokenDenylist {
    pub fn new(conn: ConnectionManager) -> Self {
        Self { conn }
    }

    pub async fn connect(url: &str) -> AuthResult<Self> {
        let client = redis::Client::open(url)?;
        let conn = ConnectionManager::new(client).await?;
        Ok(Self { conn })
    }
}

impl TokenDenylist for RedisTokenDenylist {
    async fn revoke(&self, key: &str, ttl: Duration) -> AuthResult<()> {
        let mut conn = self.conn.clone();
        let _: () = conn.set_ex(key, 1u8, ttl.as_secs().max(1)).await?;
        Ok(())
    }

    async fn is_revoked(&self, key: &str) -> AuthResult<bool> {
        let mut conn = self.conn.clone();
        let exists: bool = conn.exists(key).await?;
        Ok(exists)
    }
}
