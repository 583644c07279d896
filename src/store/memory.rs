//! In-process fallback backend for the ownership store.
//!
//! Simulates the small slice of Redis the bot relies on: plain get/set,
//! TTL-based expiry, glob key listing and an integer counter, plus a
//! connect/disconnect lifecycle with subscriber notifications. Used whenever
//! no `REDIS_CONNECTION` is configured, so tests and small deployments run
//! without any external service.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::debug;

use super::KvStore;
use super::keys::glob_match;
use crate::errors::{Error, Result};

/// Lifecycle notification emitted by the fallback store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreEvent {
    /// `connect()` completed.
    Connected,
    /// `close()` tore the store down.
    Disconnected,
}

#[derive(Default)]
struct Inner {
    connected: bool,
    cache: HashMap<String, String>,
    timers: HashMap<String, JoinHandle<()>>,
}

/// In-memory [`KvStore`] with Redis-like expiry semantics.
pub struct MemoryStore {
    inner: Arc<Mutex<Inner>>,
    events: broadcast::Sender<StoreEvent>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    /// Creates a disconnected store; call [`connect`](Self::connect) before use.
    #[must_use]
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(16);
        Self {
            inner: Arc::new(Mutex::new(Inner::default())),
            events,
        }
    }

    /// Subscribes to connect/disconnect notifications.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.events.subscribe()
    }

    /// Initializes the cache. Fails if the store is already connected.
    pub async fn connect(&self) -> Result<()> {
        {
            let mut inner = self.lock();
            if inner.connected {
                return Err(Error::store("instance cannot connect twice"));
            }
            inner.cache = HashMap::new();
            inner.connected = true;
        }
        let _ = self.events.send(StoreEvent::Connected);
        debug!("Memory store connected");
        Ok(())
    }

    /// Alias for [`close`](KvStore::close), mirroring the Redis client surface.
    pub async fn quit(&self) -> Result<()> {
        KvStore::close(self).await
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        // Timer tasks never panic while holding the lock, so poisoning only
        // occurs if a test aborts mid-operation; recover the data either way.
        self.inner.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

#[async_trait]
impl KvStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.lock().cache.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.lock().cache.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn set_with_expiry(&self, key: &str, value: &str, seconds: u64) -> Result<()> {
        let mut inner = self.lock();
        inner.cache.insert(key.to_string(), value.to_string());

        // Re-arm: a fresh TTL replaces whatever was pending for this key.
        if let Some(old) = inner.timers.remove(key) {
            old.abort();
        }

        let shared = Arc::clone(&self.inner);
        let owned_key = key.to_string();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(seconds)).await;
            let mut inner = shared.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
            inner.cache.remove(&owned_key);
            inner.timers.remove(&owned_key);
        });
        inner.timers.insert(key.to_string(), handle);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.lock().cache.remove(key);
        Ok(())
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        Ok(self.lock().cache.contains_key(key))
    }

    async fn increment(&self, key: &str) -> Result<i64> {
        let mut inner = self.lock();
        let current = inner
            .cache
            .get(key)
            .and_then(|v| v.parse::<i64>().ok())
            .unwrap_or(0);
        let next = current + 1;
        inner.cache.insert(key.to_string(), next.to_string());
        Ok(next)
    }

    async fn keys(&self, pattern: &str) -> Result<Vec<String>> {
        Ok(self
            .lock()
            .cache
            .keys()
            .filter(|k| glob_match(pattern, k))
            .cloned()
            .collect())
    }

    async fn close(&self) -> Result<()> {
        {
            let mut inner = self.lock();
            if !inner.connected {
                return Ok(());
            }
            inner.cache.clear();
            for (_, handle) in inner.timers.drain() {
                handle.abort();
            }
            inner.connected = false;
        }
        let _ = self.events.send(StoreEvent::Disconnected);
        debug!("Memory store disconnected");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn connected_store() -> MemoryStore {
        let store = MemoryStore::new();
        store.connect().await.unwrap();
        store
    }

    #[tokio::test]
    async fn get_missing_key_is_none_not_error() {
        let store = connected_store().await;
        assert_eq!(store.get("nope").await.unwrap(), None);
        assert!(!store.exists("nope").await.unwrap());
    }

    #[tokio::test]
    async fn set_get_delete_round_trip() {
        let store = connected_store().await;
        store.set("tvc.1.2", "owner").await.unwrap();
        assert_eq!(store.get("tvc.1.2").await.unwrap().as_deref(), Some("owner"));
        assert!(store.exists("tvc.1.2").await.unwrap());

        store.delete("tvc.1.2").await.unwrap();
        assert_eq!(store.get("tvc.1.2").await.unwrap(), None);
        // deleting again is a no-op
        store.delete("tvc.1.2").await.unwrap();
    }

    #[tokio::test]
    async fn double_connect_fails() {
        let store = connected_store().await;
        let err = store.connect().await.unwrap_err();
        assert!(matches!(err, Error::Store { .. }));
    }

    #[tokio::test]
    async fn close_is_idempotent_and_clears_state() {
        let store = connected_store().await;
        let mut events = store.subscribe();
        store.set("k", "v").await.unwrap();

        store.quit().await.unwrap();
        assert_eq!(events.recv().await.unwrap(), StoreEvent::Disconnected);
        assert_eq!(store.get("k").await.unwrap(), None);

        // second close is a silent no-op
        store.quit().await.unwrap();
    }

    #[tokio::test]
    async fn connect_emits_notification() {
        let store = MemoryStore::new();
        let mut events = store.subscribe();
        store.connect().await.unwrap();
        assert_eq!(events.recv().await.unwrap(), StoreEvent::Connected);
    }

    #[tokio::test(start_paused = true)]
    async fn expiry_removes_key_after_ttl() {
        let store = connected_store().await;
        store.set_with_expiry("tvc.1.2", "owner", 5).await.unwrap();
        assert!(store.exists("tvc.1.2").await.unwrap());

        tokio::time::sleep(Duration::from_secs(6)).await;
        assert_eq!(store.get("tvc.1.2").await.unwrap(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn fresh_ttl_replaces_pending_expiry() {
        let store = connected_store().await;
        store.set_with_expiry("k", "a", 2).await.unwrap();
        store.set_with_expiry("k", "b", 60).await.unwrap();

        tokio::time::sleep(Duration::from_secs(5)).await;
        // the original 2s timer was re-armed, value still present
        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("b"));

        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(store.get("k").await.unwrap(), None);
    }

    #[tokio::test]
    async fn increment_treats_missing_as_zero() {
        let store = connected_store().await;
        assert_eq!(store.increment("reports.count").await.unwrap(), 1);
        assert_eq!(store.increment("reports.count").await.unwrap(), 2);
        assert_eq!(
            store.get("reports.count").await.unwrap().as_deref(),
            Some("2")
        );
    }

    #[tokio::test]
    async fn keys_filters_by_glob() {
        let store = connected_store().await;
        store.set("tvc.42.1", "a").await.unwrap();
        store.set("tvc.42.2", "b").await.unwrap();
        store.set("tvc.43.1", "c").await.unwrap();
        store.set("lobbyCached.42", "d").await.unwrap();

        let mut found = store.keys("tvc.42.*").await.unwrap();
        found.sort();
        assert_eq!(found, vec!["tvc.42.1", "tvc.42.2"]);
    }
}
