//! Ownership store - the async key/value map shared by the lifecycle engine
//! and the authorization gate.
//!
//! Two backends implement the same [`KvStore`] contract: a Redis client for
//! production deployments and an in-process fallback used when no
//! `REDIS_CONNECTION` is configured. Callers must not be able to tell them
//! apart; every operation is individually awaitable and a missing key is
//! never an error.

pub mod keys;
pub mod memory;
pub mod redis;

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::config::AppConfig;
use crate::errors::Result;

pub use self::memory::{MemoryStore, StoreEvent};
pub use self::redis::RedisStore;

/// Async map contract shared by the Redis backend and the in-memory fallback.
#[async_trait]
pub trait KvStore: Send + Sync {
    /// Returns the value for `key`, or `None` when absent.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Sets `key` to `value` with no expiry.
    async fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Sets `key` to `value` and schedules deletion after `seconds`,
    /// replacing any prior pending expiry for the same key.
    async fn set_with_expiry(&self, key: &str, value: &str, seconds: u64) -> Result<()>;

    /// Removes `key`. Removing an absent key is a no-op.
    async fn delete(&self, key: &str) -> Result<()>;

    /// Whether `key` currently exists.
    async fn exists(&self, key: &str) -> Result<bool>;

    /// Increments the integer at `key`, treating a missing key as zero.
    /// Returns the incremented value.
    async fn increment(&self, key: &str) -> Result<i64>;

    /// Returns every key matching `pattern` (`*` and `?` wildcards).
    async fn keys(&self, pattern: &str) -> Result<Vec<String>>;

    /// Releases backend resources. Idempotent; default is a no-op.
    async fn close(&self) -> Result<()> {
        Ok(())
    }
}

/// Connects the store selected by `config`: Redis when a connection string
/// is present, the in-memory fallback otherwise.
pub async fn connect(config: &AppConfig) -> Result<Arc<dyn KvStore>> {
    match &config.redis_url {
        Some(url) => {
            let store = RedisStore::connect(url).await?;
            info!("Connected to Redis ownership store");
            Ok(Arc::new(store))
        }
        None => {
            let store = MemoryStore::new();
            store.connect().await?;
            info!("No REDIS_CONNECTION configured, using in-memory ownership store");
            Ok(Arc::new(store))
        }
    }
}
