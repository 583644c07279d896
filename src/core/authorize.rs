//! Authorization gate for temp-channel control actions.
//!
//! Every control action funnels through [`authorize`] before any platform
//! mutation. The checks run in a fixed order and short-circuit on the first
//! failure, each with its own denial reason so the reply can tell the user
//! exactly which gate closed. Success has no side effects.
//!
//! The bot-permission check requires the bot to hold Administrator *and*
//! the action-specific permission in the channel. That double requirement
//! is intentional and preserved as-is.

use tracing::warn;

use super::lifecycle::is_temp_value;
use crate::store::{KvStore, keys};

/// Facts about the acting member, resolved by the platform layer.
#[derive(Debug, Clone)]
pub struct MemberFacts {
    /// Member user id
    pub id: u64,
    /// Guild-wide Administrator
    pub is_admin: bool,
    /// Manage Channels within the target channel
    pub manages_channels: bool,
    /// Manage Guild within the target channel
    pub manages_guild: bool,
}

/// Facts about the bot's own member, when an action needs bot permissions.
#[derive(Debug, Clone)]
pub struct BotFacts {
    /// Guild-wide Administrator
    pub is_admin: bool,
    /// Whether the bot holds the action's required permissions in the channel
    pub has_channel_perms: bool,
}

/// Facts about a moderation target.
#[derive(Debug, Clone)]
pub struct TargetFacts {
    /// Target user id
    pub id: u64,
    /// Whether the target is a bot account
    pub is_bot: bool,
    /// Guild-wide Administrator
    pub is_admin: bool,
    /// Guild-wide Manage Guild
    pub manages_guild: bool,
    /// Voice channel the target currently sits in, if any
    pub voice_channel_id: Option<u64>,
}

/// One authorization request. Flags select which checks run; facts the
/// platform layer could not resolve stay `None` and fail their check.
#[derive(Debug, Clone, Default)]
pub struct GateRequest {
    /// Acting member, if resolvable
    pub member: Option<MemberFacts>,
    /// The acting member's current voice channel, if any
    pub channel_id: Option<u64>,
    /// Require a voice channel with a live ownership record
    pub check_channel: bool,
    /// Require owner/admin/manager standing
    pub check_management: bool,
    /// Restrict the action to the channel owner
    pub owner_only: bool,
    /// Require the bot permissions described by `bot`
    pub bot_perms_required: bool,
    /// Bot member facts; `None` with `bot_perms_required` fails the check
    pub bot: Option<BotFacts>,
    /// Moderation target, when the action has one
    pub target: Option<TargetFacts>,
    /// Enforce self/bot/privileged target rejections (production mode)
    pub enforce_target_policy: bool,
}

/// Why an authorization request was denied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Denial {
    /// The acting member could not be resolved
    FailedFetch,
    /// The acting member is not in a voice channel
    NoVoiceChannel,
    /// The channel has no live ownership record
    NotTempChannel,
    /// The bot is missing Administrator or the required channel permissions
    BotMissingPermissions,
    /// Owner-only action invoked by a non-owner
    NotYourChannel,
    /// Actor is none of owner, admin or manager
    NoPermission,
    /// Target is the actor themself
    TargetYourself,
    /// Target is a bot account
    TargetBot,
    /// Target holds Administrator or Manage Guild
    TargetPrivileged,
    /// Target is not in the actor's voice channel
    TargetOutside,
}

impl Denial {
    /// Locale key of the matching error message.
    #[must_use]
    pub const fn locale_key(self) -> &'static str {
        match self {
            Self::FailedFetch => "errors.failed-fetch",
            Self::NoVoiceChannel => "errors.no-vc",
            Self::NotTempChannel => "errors.no-tvc",
            Self::BotMissingPermissions => "errors.no-perm-bot",
            Self::NotYourChannel => "errors.not-your-tvc",
            Self::NoPermission => "errors.no-perm",
            Self::TargetYourself => "errors.target-yourself",
            Self::TargetBot => "errors.bots-ignored",
            Self::TargetPrivileged => "errors.target-power",
            Self::TargetOutside => "errors.target-outside",
        }
    }
}

/// What a successful authorization carries back to the handler.
#[derive(Debug, Clone, Default)]
pub struct Grant {
    /// Channel owner id, when an ownership record was consulted
    pub owner_id: Option<String>,
}

async fn owner_record(kv: &dyn KvStore, guild_id: u64, channel_id: u64) -> Option<String> {
    let key = keys::tvc(guild_id, channel_id);
    match kv.get(&key).await {
        Ok(value) => value,
        Err(e) => {
            // A store outage reads as "no record", the safe branch.
            warn!(%key, error = %e, "Ownership lookup failed");
            None
        }
    }
}

/// Runs the gate. Checks are ordered member → channel → bot permissions →
/// management → target, and the first failure wins.
pub async fn authorize(
    kv: &dyn KvStore,
    guild_id: u64,
    req: &GateRequest,
) -> Result<Grant, Denial> {
    let Some(member) = &req.member else {
        return Err(Denial::FailedFetch);
    };

    let mut grant = Grant::default();

    if req.check_channel {
        let Some(channel_id) = req.channel_id else {
            return Err(Denial::NoVoiceChannel);
        };
        let record = owner_record(kv, guild_id, channel_id).await;
        if !is_temp_value(record.as_deref()) {
            return Err(Denial::NotTempChannel);
        }
        grant.owner_id = record;
    }

    if req.bot_perms_required && req.channel_id.is_some() {
        let allowed = req
            .bot
            .as_ref()
            .is_some_and(|bot| bot.is_admin && bot.has_channel_perms);
        if !allowed {
            return Err(Denial::BotMissingPermissions);
        }
    }

    if req.check_management {
        if let Some(channel_id) = req.channel_id {
            let owner_id = match &grant.owner_id {
                Some(id) => Some(id.clone()),
                None => owner_record(kv, guild_id, channel_id).await,
            };
            let is_owner = owner_id
                .as_deref()
                .is_some_and(|id| id == member.id.to_string());

            if req.owner_only && !is_owner {
                return Err(Denial::NotYourChannel);
            }
            let is_manager = member.manages_channels || member.manages_guild;
            if !is_owner && !member.is_admin && !is_manager {
                return Err(Denial::NoPermission);
            }
            grant.owner_id = owner_id;
        }
    }

    if let (Some(target), Some(channel_id)) = (&req.target, req.channel_id) {
        if req.enforce_target_policy {
            if target.id == member.id {
                return Err(Denial::TargetYourself);
            }
            if target.is_bot {
                return Err(Denial::TargetBot);
            }
            if target.is_admin || target.manages_guild {
                return Err(Denial::TargetPrivileged);
            }
        }
        if target.voice_channel_id != Some(channel_id) {
            return Err(Denial::TargetOutside);
        }
    }

    Ok(grant)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use crate::test_utils::setup_memory_store;

    const GUILD: u64 = 42;
    const CHANNEL: u64 = 1001;
    const OWNER: u64 = 7001;
    const STRANGER: u64 = 7002;

    fn plain_member(id: u64) -> MemberFacts {
        MemberFacts {
            id,
            is_admin: false,
            manages_channels: false,
            manages_guild: false,
        }
    }

    fn capable_bot() -> BotFacts {
        BotFacts {
            is_admin: true,
            has_channel_perms: true,
        }
    }

    fn control_request(member_id: u64) -> GateRequest {
        GateRequest {
            member: Some(plain_member(member_id)),
            channel_id: Some(CHANNEL),
            check_channel: true,
            check_management: true,
            bot_perms_required: true,
            bot: Some(capable_bot()),
            ..GateRequest::default()
        }
    }

    async fn store_with_owner() -> std::sync::Arc<MemoryStore> {
        let store = setup_memory_store().await;
        store
            .set(&keys::tvc(GUILD, CHANNEL), &OWNER.to_string())
            .await
            .unwrap();
        store
    }

    #[tokio::test]
    async fn owner_passes_and_grant_carries_owner_id() {
        let store = store_with_owner().await;
        let grant = authorize(&*store, GUILD, &control_request(OWNER))
            .await
            .unwrap();
        assert_eq!(grant.owner_id.as_deref(), Some("7001"));
    }

    #[tokio::test]
    async fn stranger_is_denied_no_perm() {
        let store = store_with_owner().await;
        let denial = authorize(&*store, GUILD, &control_request(STRANGER))
            .await
            .unwrap_err();
        assert_eq!(denial, Denial::NoPermission);
        assert_eq!(denial.locale_key(), "errors.no-perm");
    }

    #[tokio::test]
    async fn admin_and_manager_pass_management() {
        let store = store_with_owner().await;

        let mut req = control_request(STRANGER);
        req.member.as_mut().unwrap().is_admin = true;
        assert!(authorize(&*store, GUILD, &req).await.is_ok());

        let mut req = control_request(STRANGER);
        req.member.as_mut().unwrap().manages_channels = true;
        assert!(authorize(&*store, GUILD, &req).await.is_ok());

        let mut req = control_request(STRANGER);
        req.member.as_mut().unwrap().manages_guild = true;
        assert!(authorize(&*store, GUILD, &req).await.is_ok());
    }

    #[tokio::test]
    async fn owner_only_rejects_even_admins() {
        let store = store_with_owner().await;
        let mut req = control_request(STRANGER);
        req.owner_only = true;
        req.member.as_mut().unwrap().is_admin = true;
        assert_eq!(
            authorize(&*store, GUILD, &req).await.unwrap_err(),
            Denial::NotYourChannel
        );
    }

    #[tokio::test]
    async fn unresolvable_member_wins_over_missing_channel() {
        let store = setup_memory_store().await;
        let mut req = control_request(OWNER);
        req.member = None;
        req.channel_id = None;
        assert_eq!(
            authorize(&*store, GUILD, &req).await.unwrap_err(),
            Denial::FailedFetch
        );
    }

    #[tokio::test]
    async fn denials_follow_the_check_order() {
        // no channel before everything channel-related
        let store = setup_memory_store().await;
        let mut req = control_request(OWNER);
        req.channel_id = None;
        req.bot = None;
        assert_eq!(
            authorize(&*store, GUILD, &req).await.unwrap_err(),
            Denial::NoVoiceChannel
        );

        // unknown channel record before bot permissions
        let mut req = control_request(OWNER);
        req.bot = None;
        assert_eq!(
            authorize(&*store, GUILD, &req).await.unwrap_err(),
            Denial::NotTempChannel
        );

        // bot permissions before management
        let store = store_with_owner().await;
        let mut req = control_request(STRANGER);
        req.bot = None;
        assert_eq!(
            authorize(&*store, GUILD, &req).await.unwrap_err(),
            Denial::BotMissingPermissions
        );

        // management before target validity
        let mut req = control_request(STRANGER);
        req.target = Some(TargetFacts {
            id: 9999,
            is_bot: false,
            is_admin: false,
            manages_guild: false,
            voice_channel_id: None,
        });
        assert_eq!(
            authorize(&*store, GUILD, &req).await.unwrap_err(),
            Denial::NoPermission
        );
    }

    #[tokio::test]
    async fn released_record_reads_as_not_temp() {
        let store = setup_memory_store().await;
        store.set(&keys::tvc(GUILD, CHANNEL), "").await.unwrap();
        assert_eq!(
            authorize(&*store, GUILD, &control_request(OWNER))
                .await
                .unwrap_err(),
            Denial::NotTempChannel
        );
    }

    #[tokio::test]
    async fn bot_needs_admin_and_channel_perms() {
        let store = store_with_owner().await;

        let mut req = control_request(OWNER);
        req.bot = Some(BotFacts {
            is_admin: false,
            has_channel_perms: true,
        });
        assert_eq!(
            authorize(&*store, GUILD, &req).await.unwrap_err(),
            Denial::BotMissingPermissions
        );

        let mut req = control_request(OWNER);
        req.bot = Some(BotFacts {
            is_admin: true,
            has_channel_perms: false,
        });
        assert_eq!(
            authorize(&*store, GUILD, &req).await.unwrap_err(),
            Denial::BotMissingPermissions
        );
    }

    fn target(id: u64) -> TargetFacts {
        TargetFacts {
            id,
            is_bot: false,
            is_admin: false,
            manages_guild: false,
            voice_channel_id: Some(CHANNEL),
        }
    }

    #[tokio::test]
    async fn production_target_policies() {
        let store = store_with_owner().await;

        let mut req = control_request(OWNER);
        req.enforce_target_policy = true;
        req.target = Some(target(OWNER));
        assert_eq!(
            authorize(&*store, GUILD, &req).await.unwrap_err(),
            Denial::TargetYourself
        );

        let mut req = control_request(OWNER);
        req.enforce_target_policy = true;
        req.target = Some(TargetFacts {
            is_bot: true,
            ..target(STRANGER)
        });
        assert_eq!(
            authorize(&*store, GUILD, &req).await.unwrap_err(),
            Denial::TargetBot
        );

        let mut req = control_request(OWNER);
        req.enforce_target_policy = true;
        req.target = Some(TargetFacts {
            manages_guild: true,
            ..target(STRANGER)
        });
        assert_eq!(
            authorize(&*store, GUILD, &req).await.unwrap_err(),
            Denial::TargetPrivileged
        );
    }

    #[tokio::test]
    async fn development_still_rejects_outside_targets() {
        let store = store_with_owner().await;

        // self-targeting passes outside production
        let mut req = control_request(OWNER);
        req.target = Some(target(OWNER));
        assert!(authorize(&*store, GUILD, &req).await.is_ok());

        // but a target outside the channel never does
        let mut req = control_request(OWNER);
        req.target = Some(TargetFacts {
            voice_channel_id: Some(2222),
            ..target(STRANGER)
        });
        assert_eq!(
            authorize(&*store, GUILD, &req).await.unwrap_err(),
            Denial::TargetOutside
        );
    }
}
