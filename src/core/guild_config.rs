//! Guild configuration store.
//!
//! The container/lobby pair an administrator picked with `/setup` lives in
//! two places: the database row is the durable copy, and the ownership
//! store carries `containerCached.<guild>` / `lobbyCached.<guild>` keys so
//! the voice-state hot path never touches SQL. Reads go cache-first and
//! re-prime the cache from the database on a miss. Cache failures are
//! logged and read as a miss; the configuration is never deleted
//! automatically, stale channel ids simply mean "reconfigure needed".

use std::sync::Arc;

use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};
use tracing::{debug, warn};

use super::lifecycle::GuildVoiceConfig;
use crate::entities::{GuildSettings, guild_settings};
use crate::errors::Result;
use crate::store::{KvStore, keys};

/// Cache-backed accessor for per-guild temp-voice configuration.
pub struct GuildConfigStore {
    db: DatabaseConnection,
    kv: Arc<dyn KvStore>,
}

impl GuildConfigStore {
    /// Creates a store over the given database and KV cache.
    #[must_use]
    pub fn new(db: DatabaseConnection, kv: Arc<dyn KvStore>) -> Self {
        Self { db, kv }
    }

    /// Returns the guild's configuration, or `None` when `/setup` has not
    /// run for it.
    pub async fn get(&self, guild_id: u64) -> Result<Option<GuildVoiceConfig>> {
        if let Some(cfg) = self.from_cache(guild_id).await {
            return Ok(Some(cfg));
        }

        let Some(row) = GuildSettings::find_by_id(guild_id.to_string())
            .one(&self.db)
            .await?
        else {
            return Ok(None);
        };

        let (Ok(container_id), Ok(lobby_id)) =
            (row.container_id.parse::<u64>(), row.lobby_id.parse::<u64>())
        else {
            warn!(guild_id, "Stored guild settings hold unparsable channel ids");
            return Ok(None);
        };

        self.prime_cache(guild_id, container_id, lobby_id).await;
        debug!(guild_id, "Guild configuration re-primed from database");
        Ok(Some(GuildVoiceConfig {
            container_id,
            lobby_id,
        }))
    }

    /// Writes (or overwrites) the guild's configuration and primes the cache.
    pub async fn set(
        &self,
        guild_id: u64,
        container_id: u64,
        lobby_id: u64,
        locale: &str,
    ) -> Result<()> {
        let existing = GuildSettings::find_by_id(guild_id.to_string())
            .one(&self.db)
            .await?;

        match existing {
            Some(row) => {
                let mut model: guild_settings::ActiveModel = row.into();
                model.container_id = Set(container_id.to_string());
                model.lobby_id = Set(lobby_id.to_string());
                model.locale = Set(locale.to_string());
                model.update(&self.db).await?;
            }
            None => {
                let model = guild_settings::ActiveModel {
                    guild_id: Set(guild_id.to_string()),
                    container_id: Set(container_id.to_string()),
                    lobby_id: Set(lobby_id.to_string()),
                    locale: Set(locale.to_string()),
                };
                model.insert(&self.db).await?;
            }
        }

        self.prime_cache(guild_id, container_id, lobby_id).await;
        Ok(())
    }

    /// Returns the locale recorded at `/setup` time, if any. Not on the
    /// voice hot path, so this reads the database directly.
    pub async fn locale(&self, guild_id: u64) -> Result<Option<String>> {
        Ok(GuildSettings::find_by_id(guild_id.to_string())
            .one(&self.db)
            .await?
            .map(|row| row.locale))
    }

    async fn from_cache(&self, guild_id: u64) -> Option<GuildVoiceConfig> {
        let container = self.cached_id(&keys::container(guild_id)).await?;
        let lobby = self.cached_id(&keys::lobby(guild_id)).await?;
        Some(GuildVoiceConfig {
            container_id: container,
            lobby_id: lobby,
        })
    }

    async fn cached_id(&self, key: &str) -> Option<u64> {
        match self.kv.get(key).await {
            Ok(value) => value.and_then(|v| v.parse::<u64>().ok()),
            Err(e) => {
                warn!(%key, error = %e, "Config cache read failed");
                None
            }
        }
    }

    async fn prime_cache(&self, guild_id: u64, container_id: u64, lobby_id: u64) {
        for (key, value) in [
            (keys::container(guild_id), container_id),
            (keys::lobby(guild_id), lobby_id),
        ] {
            if let Err(e) = self.kv.set(&key, &value.to_string()).await {
                warn!(%key, error = %e, "Config cache write failed");
            }
        }
    }
}
