//! Temp-channel lifecycle engine.
//!
//! Reacts to voice-presence transitions: joining the configured lobby
//! provisions a fresh channel for the member, and the last member leaving a
//! temp channel tears it down. The ownership store is the single source of
//! truth for "is this a temp channel and whose is it" - teardown releases
//! the record whether or not the platform delete succeeds, and creation
//! claims ownership only once the platform create has succeeded.
//!
//! Races between interleaved voice events are tolerated rather than locked
//! away: teardown is idempotent (a missing record means no-op), and a
//! rapid double lobby-join may still provision two channels; that gap exists
//! upstream too and is deliberately not papered over here.

use std::sync::Arc;

use tracing::{debug, warn};

use super::presence::{MemberProfile, derive_channel_name};
use crate::store::{KvStore, keys};

/// Safety net: ownership records expire on their own after a week in case a
/// teardown was missed entirely.
const CLAIM_TTL_SECS: u64 = 60 * 60 * 24 * 7;

/// Teardown grace window: the record is blanked with a short TTL instead of
/// deleted outright, so stragglers racing the delete still read "not a temp
/// channel" until the key disappears.
const RELEASE_TTL_SECS: u64 = 1;

/// Per-guild temp-voice configuration consumed on every voice transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuildVoiceConfig {
    /// Category channel under which temp channels live
    pub container_id: u64,
    /// Lobby channel whose join event triggers provisioning
    pub lobby_id: u64,
}

/// A voice channel as seen at event time. `occupants` must be read after
/// the triggering member's departure has been applied, never before.
#[derive(Debug, Clone)]
pub struct ChannelSnapshot {
    /// Channel id
    pub id: u64,
    /// Parent category, if any
    pub parent_id: Option<u64>,
    /// Members currently connected, post-departure
    pub occupants: usize,
}

/// A voice-state transition reduced to what the engine needs.
#[derive(Debug, Clone)]
pub struct VoiceUpdate {
    /// Guild the transition happened in
    pub guild_id: u64,
    /// Member that moved
    pub user_id: u64,
    /// Channel the member left, if any
    pub old_channel: Option<ChannelSnapshot>,
    /// Channel the member joined, if any
    pub new_channel_id: Option<u64>,
}

/// Platform work the caller has to carry out after evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Delete the now-empty temp channel.
    DeleteChannel {
        /// Channel to delete
        channel_id: u64,
    },
    /// Create a voice channel under the container, then claim it for the
    /// member and move them in.
    Provision {
        /// Display name for the new channel
        name: String,
    },
}

/// Whether an ownership-store value marks a live temp channel. An empty
/// string is the released-but-not-yet-expired state and counts as "no".
#[must_use]
pub fn is_temp_value(value: Option<&str>) -> bool {
    value.is_some_and(|v| !v.trim().is_empty())
}

/// The creation/deletion state machine over the ownership store.
pub struct LifecycleEngine {
    kv: Arc<dyn KvStore>,
}

impl LifecycleEngine {
    /// Creates an engine over the given ownership store.
    #[must_use]
    pub fn new(kv: Arc<dyn KvStore>) -> Self {
        Self { kv }
    }

    /// Evaluates one voice transition against the guild configuration and
    /// returns the platform work to perform. Teardown is decided before
    /// provisioning so a lobby-hop out of a dying channel settles both.
    pub async fn evaluate(
        &self,
        cfg: &GuildVoiceConfig,
        update: &VoiceUpdate,
        profile: &MemberProfile,
    ) -> Vec<Decision> {
        let mut decisions = Vec::new();

        if let Some(old) = &update.old_channel {
            if old.parent_id == Some(cfg.container_id) && self.try_release(update.guild_id, old).await {
                decisions.push(Decision::DeleteChannel { channel_id: old.id });
            }
        }

        if update.new_channel_id == Some(cfg.lobby_id) {
            decisions.push(Decision::Provision {
                name: derive_channel_name(profile),
            });
        }

        decisions
    }

    /// Records `owner_id` as the owner of a freshly created channel.
    pub async fn claim(&self, guild_id: u64, channel_id: u64, owner_id: u64) {
        let key = keys::tvc(guild_id, channel_id);
        if let Err(e) = self
            .kv
            .set_with_expiry(&key, &owner_id.to_string(), CLAIM_TTL_SECS)
            .await
        {
            warn!(%key, error = %e, "Failed to write ownership record");
        }
    }

    /// Returns the owner of a temp channel, or `None` when the channel has
    /// no live ownership record.
    pub async fn owner_of(&self, guild_id: u64, channel_id: u64) -> Option<String> {
        let key = keys::tvc(guild_id, channel_id);
        let value = self.kv.get(&key).await.ok().flatten();
        is_temp_value(value.as_deref()).then(|| value.unwrap_or_default())
    }

    /// Drops every key belonging to `guild_id`: ownership records, cached
    /// invites and the cached container/lobby configuration. Used when the
    /// bot leaves a guild.
    pub async fn purge_guild(&self, guild_id: u64) {
        for pattern in [keys::tvc_pattern(guild_id), keys::invite_pattern(guild_id)] {
            match self.kv.keys(&pattern).await {
                Ok(found) => {
                    for key in found {
                        if let Err(e) = self.kv.delete(&key).await {
                            warn!(%key, error = %e, "Failed to purge key");
                        }
                    }
                }
                Err(e) => warn!(%pattern, error = %e, "Failed to list keys for purge"),
            }
        }
        for key in [keys::container(guild_id), keys::lobby(guild_id)] {
            if let Err(e) = self.kv.delete(&key).await {
                warn!(%key, error = %e, "Failed to purge key");
            }
        }
    }

    /// Decides whether an emptied channel should be deleted, releasing its
    /// ownership record when so. The record is released first and stays
    /// released even if the platform delete later fails; it is the
    /// authority for "considered gone".
    async fn try_release(&self, guild_id: u64, old: &ChannelSnapshot) -> bool {
        let key = keys::tvc(guild_id, old.id);
        let record = match self.kv.get(&key).await {
            Ok(value) => value,
            Err(e) => {
                // Treated as "no record": the safe branch leaves the channel alone.
                warn!(%key, error = %e, "Ownership lookup failed");
                return false;
            }
        };

        if !is_temp_value(record.as_deref()) || old.occupants > 0 {
            return false;
        }

        if let Err(e) = self.kv.set_with_expiry(&key, "", RELEASE_TTL_SECS).await {
            warn!(%key, error = %e, "Failed to release ownership record");
        }
        debug!(guild_id, channel_id = old.id, "Temp channel emptied, releasing");
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use crate::test_utils::setup_memory_store;

    const GUILD: u64 = 42;
    const CONTAINER: u64 = 500;
    const LOBBY: u64 = 501;
    const USER: u64 = 7001;

    fn cfg() -> GuildVoiceConfig {
        GuildVoiceConfig {
            container_id: CONTAINER,
            lobby_id: LOBBY,
        }
    }

    fn lobby_join() -> VoiceUpdate {
        VoiceUpdate {
            guild_id: GUILD,
            user_id: USER,
            old_channel: None,
            new_channel_id: Some(LOBBY),
        }
    }

    fn departure(channel_id: u64, occupants: usize) -> VoiceUpdate {
        VoiceUpdate {
            guild_id: GUILD,
            user_id: USER,
            old_channel: Some(ChannelSnapshot {
                id: channel_id,
                parent_id: Some(CONTAINER),
                occupants,
            }),
            new_channel_id: None,
        }
    }

    async fn engine() -> (LifecycleEngine, Arc<MemoryStore>) {
        let store = setup_memory_store().await;
        let kv: Arc<dyn KvStore> = store.clone();
        (LifecycleEngine::new(kv), store)
    }

    #[tokio::test]
    async fn lobby_join_provisions_with_display_name() {
        let (engine, _) = engine().await;
        let decisions = engine
            .evaluate(&cfg(), &lobby_join(), &MemberProfile::named("Sam"))
            .await;
        assert_eq!(
            decisions,
            vec![Decision::Provision {
                name: "Sam".to_string()
            }]
        );
    }

    #[tokio::test]
    async fn join_elsewhere_is_ignored() {
        let (engine, _) = engine().await;
        let update = VoiceUpdate {
            new_channel_id: Some(999),
            ..lobby_join()
        };
        let decisions = engine
            .evaluate(&cfg(), &update, &MemberProfile::named("Sam"))
            .await;
        assert!(decisions.is_empty());
    }

    #[tokio::test]
    async fn claim_records_exactly_the_provisioning_member() {
        let (engine, store) = engine().await;
        engine.claim(GUILD, 1001, USER).await;
        assert_eq!(
            store.get("tvc.42.1001").await.unwrap().as_deref(),
            Some("7001")
        );
        assert_eq!(engine.owner_of(GUILD, 1001).await.as_deref(), Some("7001"));
    }

    #[tokio::test]
    async fn empty_owned_channel_is_deleted_and_released() {
        let (engine, store) = engine().await;
        engine.claim(GUILD, 1001, USER).await;

        let decisions = engine
            .evaluate(&cfg(), &departure(1001, 0), &MemberProfile::named("Sam"))
            .await;
        assert_eq!(decisions, vec![Decision::DeleteChannel { channel_id: 1001 }]);

        // record is blanked immediately; the 1s TTL removes it later
        assert_eq!(store.get("tvc.42.1001").await.unwrap().as_deref(), Some(""));
        assert_eq!(engine.owner_of(GUILD, 1001).await, None);
    }

    #[tokio::test]
    async fn occupied_channel_survives_a_departure() {
        let (engine, _) = engine().await;
        engine.claim(GUILD, 1001, USER).await;

        let decisions = engine
            .evaluate(&cfg(), &departure(1001, 2), &MemberProfile::named("Sam"))
            .await;
        assert!(decisions.is_empty());
        assert_eq!(engine.owner_of(GUILD, 1001).await.as_deref(), Some("7001"));
    }

    #[tokio::test]
    async fn unowned_channel_is_never_deleted() {
        let (engine, _) = engine().await;
        let decisions = engine
            .evaluate(&cfg(), &departure(1001, 0), &MemberProfile::named("Sam"))
            .await;
        assert!(decisions.is_empty());
    }

    #[tokio::test]
    async fn departure_outside_container_is_ignored() {
        let (engine, _) = engine().await;
        engine.claim(GUILD, 1001, USER).await;

        let update = VoiceUpdate {
            old_channel: Some(ChannelSnapshot {
                id: 1001,
                parent_id: Some(777),
                occupants: 0,
            }),
            ..departure(1001, 0)
        };
        let decisions = engine
            .evaluate(&cfg(), &update, &MemberProfile::named("Sam"))
            .await;
        assert!(decisions.is_empty());
    }

    #[tokio::test]
    async fn double_teardown_is_idempotent() {
        let (engine, store) = engine().await;
        engine.claim(GUILD, 1001, USER).await;

        let first = engine
            .evaluate(&cfg(), &departure(1001, 0), &MemberProfile::named("Sam"))
            .await;
        assert_eq!(first.len(), 1);

        // second event for the same channel: released record reads as
        // "not a temp channel", so nothing happens and nothing errors
        let second = engine
            .evaluate(&cfg(), &departure(1001, 0), &MemberProfile::named("Sam"))
            .await;
        assert!(second.is_empty());
        assert_eq!(store.get("tvc.42.1001").await.unwrap().as_deref(), Some(""));
    }

    #[tokio::test]
    async fn lobby_hop_out_of_dying_channel_settles_both() {
        let (engine, _) = engine().await;
        engine.claim(GUILD, 1001, USER).await;

        let update = VoiceUpdate {
            new_channel_id: Some(LOBBY),
            ..departure(1001, 0)
        };
        let decisions = engine
            .evaluate(&cfg(), &update, &MemberProfile::named("Sam"))
            .await;
        assert_eq!(
            decisions,
            vec![
                Decision::DeleteChannel { channel_id: 1001 },
                Decision::Provision {
                    name: "Sam".to_string()
                },
            ]
        );
    }

    #[tokio::test]
    async fn purge_guild_sweeps_every_key() {
        let (engine, store) = engine().await;
        engine.claim(GUILD, 1001, USER).await;
        engine.claim(GUILD, 1002, USER).await;
        store.set("invite.42.1001", "url").await.unwrap();
        store.set("containerCached.42", "500").await.unwrap();
        store.set("lobbyCached.42", "501").await.unwrap();
        store.set("tvc.43.2000", "keep").await.unwrap();

        engine.purge_guild(GUILD).await;

        assert!(store.keys("tvc.42.*").await.unwrap().is_empty());
        assert!(store.keys("invite.42.*").await.unwrap().is_empty());
        assert!(!store.exists("containerCached.42").await.unwrap());
        assert!(!store.exists("lobbyCached.42").await.unwrap());
        // other guilds untouched
        assert!(store.exists("tvc.43.2000").await.unwrap());
    }

    #[test]
    fn empty_or_missing_values_are_not_temp() {
        assert!(!is_temp_value(None));
        assert!(!is_temp_value(Some("")));
        assert!(!is_temp_value(Some("   ")));
        assert!(is_temp_value(Some("7001")));
    }
}
