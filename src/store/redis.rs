//! Redis backend for the ownership store.
//!
//! A thin wrapper over `redis::aio::ConnectionManager`, which reconnects on
//! its own; the manager is cheap to clone, so each operation works on its
//! own handle and the trait stays `&self`.

use async_trait::async_trait;
use redis::AsyncCommands;

use super::KvStore;
use crate::errors::Result;

/// Production [`KvStore`] backed by a Redis server.
pub struct RedisStore {
    manager: redis::aio::ConnectionManager,
}

impl RedisStore {
    /// Opens a managed connection to the Redis server at `url`.
    pub async fn connect(url: &str) -> Result<Self> {
        let client = redis::Client::open(url)?;
        let manager = client.get_connection_manager().await?;
        Ok(Self { manager })
    }
}

#[async_trait]
impl KvStore for RedisStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let mut conn = self.manager.clone();
        let value: Option<String> = conn.get(key).await?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut conn = self.manager.clone();
        let _: () = conn.set(key, value).await?;
        Ok(())
    }

    async fn set_with_expiry(&self, key: &str, value: &str, seconds: u64) -> Result<()> {
        let mut conn = self.manager.clone();
        let _: () = conn.set_ex(key, value, seconds).await?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let mut conn = self.manager.clone();
        let _: () = conn.del(key).await?;
        Ok(())
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        let mut conn = self.manager.clone();
        let found: bool = conn.exists(key).await?;
        Ok(found)
    }

    async fn increment(&self, key: &str) -> Result<i64> {
        let mut conn = self.manager.clone();
        let value: i64 = conn.incr(key, 1).await?;
        Ok(value)
    }

    async fn keys(&self, pattern: &str) -> Result<Vec<String>> {
        let mut conn = self.manager.clone();
        let found: Vec<String> = conn.keys(pattern).await?;
        Ok(found)
    }
}
