//! Gateway event handling.
//!
//! Voice-state transitions are reduced to snapshots inside a synchronous
//! cache scope (cache guards must never live across an await), then handed
//! to the lifecycle engine; the decisions that come back are executed here
//! against the Discord API.

use poise::serenity_prelude as serenity;
use tracing::{debug, info, warn};

use super::{Data, Error, actions};
use crate::core::lifecycle::{ChannelSnapshot, Decision, VoiceUpdate};
use crate::core::presence::{Activity, ActivityKind, MemberProfile};
use crate::errors::Result;
use crate::i18n::FALLBACK_LOCALE;
use crate::store::keys;

/// Framework event dispatcher.
pub async fn handle(
    ctx: &serenity::Context,
    event: &serenity::FullEvent,
    _framework: poise::FrameworkContext<'_, Data, Error>,
    data: &Data,
) -> Result<()> {
    match event {
        serenity::FullEvent::Ready { data_about_bot } => {
            info!("Connected as {}", data_about_bot.user.name);
            Ok(())
        }
        serenity::FullEvent::VoiceStateUpdate { old, new } => {
            voice_state_update(ctx, data, old.as_ref(), new).await
        }
        serenity::FullEvent::InteractionCreate {
            interaction: serenity::Interaction::Component(component),
        } => {
            if let Some(action) = data.controls.lookup(&component.data.custom_id) {
                actions::dispatch(ctx, data, component, action).await?;
            }
            Ok(())
        }
        serenity::FullEvent::GuildDelete { incomplete, .. } => {
            // an unavailable guild is an outage, not a removal
            if !incomplete.unavailable {
                info!(guild_id = incomplete.id.get(), "Removed from guild, purging state");
                data.engine.purge_guild(incomplete.id.get()).await;
            }
            Ok(())
        }
        _ => Ok(()),
    }
}

async fn voice_state_update(
    ctx: &serenity::Context,
    data: &Data,
    old: Option<&serenity::VoiceState>,
    new: &serenity::VoiceState,
) -> Result<()> {
    let Some(guild_id) = new.guild_id else {
        return Ok(());
    };
    let Some(cfg) = data.guild_configs.get(guild_id.get()).await? else {
        return Ok(());
    };
    let Some((update, profile)) = snapshot_transition(ctx, guild_id, old, new) else {
        debug!(guild_id = guild_id.get(), "Voice update skipped, bot cannot manage channels");
        return Ok(());
    };

    for decision in data.engine.evaluate(&cfg, &update, &profile).await {
        match decision {
            Decision::DeleteChannel { channel_id } => {
                let channel = serenity::ChannelId::new(channel_id);
                if let Err(e) = channel.delete(&ctx.http).await {
                    warn!(channel_id, error = %e, "Failed to delete emptied temp channel");
                }
                // the cached invite dies with the channel
                if let Err(e) = data
                    .store
                    .delete(&keys::invite(guild_id.get(), channel_id))
                    .await
                {
                    warn!(channel_id, error = %e, "Failed to drop cached invite");
                }
            }
            Decision::Provision { name } => {
                provision(ctx, data, &cfg, guild_id, new.user_id, name).await;
            }
        }
    }
    Ok(())
}

/// Reduces a voice-state pair to the engine's input, entirely from cache.
/// Returns `None` when the guild is not cached or the bot cannot manage
/// channels in it.
fn snapshot_transition(
    ctx: &serenity::Context,
    guild_id: serenity::GuildId,
    old: Option<&serenity::VoiceState>,
    new: &serenity::VoiceState,
) -> Option<(VoiceUpdate, MemberProfile)> {
    let bot_id = ctx.cache.current_user().id;
    let guild = ctx.cache.guild(guild_id)?;

    let bot_member = guild.members.get(&bot_id)?;
    if !guild
        .member_permissions(bot_member)
        .contains(serenity::Permissions::MANAGE_CHANNELS)
    {
        return None;
    }

    let old_channel = old.and_then(|state| state.channel_id).map(|channel_id| {
        let occupants = guild
            .voice_states
            .values()
            .filter(|vs| vs.channel_id == Some(channel_id))
            .count();
        ChannelSnapshot {
            id: channel_id.get(),
            parent_id: guild
                .channels
                .get(&channel_id)
                .and_then(|c| c.parent_id)
                .map(serenity::ChannelId::get),
            occupants,
        }
    });

    let display_name = new
        .member
        .as_ref()
        .map_or_else(|| new.user_id.to_string(), |m| m.display_name().to_string());
    let activities = guild
        .presences
        .get(&new.user_id)
        .map(|presence| {
            presence
                .activities
                .iter()
                .map(|activity| Activity {
                    kind: match activity.kind {
                        serenity::ActivityType::Playing => ActivityKind::Playing,
                        serenity::ActivityType::Listening => ActivityKind::Listening,
                        serenity::ActivityType::Watching => ActivityKind::Watching,
                        _ => ActivityKind::Other,
                    },
                    name: activity.name.clone(),
                })
                .collect()
        })
        .unwrap_or_default();

    Some((
        VoiceUpdate {
            guild_id: guild_id.get(),
            user_id: new.user_id.get(),
            old_channel,
            new_channel_id: new.channel_id.map(serenity::ChannelId::get),
        },
        MemberProfile {
            display_name,
            activities,
        },
    ))
}

/// Creates the temp channel, claims it for the member, moves them in and
/// posts the control panel.
async fn provision(
    ctx: &serenity::Context,
    data: &Data,
    cfg: &crate::core::lifecycle::GuildVoiceConfig,
    guild_id: serenity::GuildId,
    user_id: serenity::UserId,
    name: String,
) {
    let container = serenity::ChannelId::new(cfg.container_id);
    let container_cached = ctx
        .cache
        .guild(guild_id)
        .is_some_and(|guild| guild.channels.contains_key(&container));
    if !container_cached && ctx.http.get_channel(container).await.is_err() {
        warn!(
            guild_id = guild_id.get(),
            container_id = cfg.container_id,
            "Configured container is gone, reconfiguration needed"
        );
        return;
    }

    let builder = serenity::CreateChannel::new(&name)
        .kind(serenity::ChannelType::Voice)
        .category(container)
        .audit_log_reason("Temp voice channel requested via lobby");
    let channel = match guild_id.create_channel(&ctx.http, builder).await {
        Ok(channel) => channel,
        Err(e) => {
            warn!(guild_id = guild_id.get(), error = %e, "Failed to create temp channel");
            return;
        }
    };

    data.engine
        .claim(guild_id.get(), channel.id.get(), user_id.get())
        .await;
    debug!(
        guild_id = guild_id.get(),
        channel_id = channel.id.get(),
        owner_id = user_id.get(),
        "Provisioned temp channel"
    );

    if let Err(e) = guild_id
        .edit_member(
            &ctx.http,
            user_id,
            serenity::EditMember::new().voice_channel(channel.id),
        )
        .await
    {
        // the member likely disconnected mid-provision; the empty channel
        // falls to the week-long claim expiry
        warn!(channel_id = channel.id.get(), error = %e, "Failed to move member into temp channel");
    }

    // panel language: the locale recorded at /setup time wins, then the
    // guild's platform locale
    let locale = match data.guild_configs.locale(guild_id.get()).await {
        Ok(Some(locale)) => locale,
        _ => {
            ctx.cache
                .guild(guild_id)
                .map_or_else(|| FALLBACK_LOCALE.to_string(), |guild| {
                    guild.preferred_locale.to_lowercase()
                })
        }
    };
    if let Err(e) =
        super::controls::post_panel(&ctx.http, &data.translations, channel.id, &locale).await
    {
        warn!(channel_id = channel.id.get(), error = %e, "Failed to post control panel");
    }
}
