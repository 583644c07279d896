//! Control action handlers.
//!
//! Every panel button lands in [`dispatch`]: facts about the interaction are
//! snapshotted from the cache in a synchronous scope, the authorization gate
//! runs, and only then does the handler touch the Discord API. All replies
//! are ephemeral.

use std::time::Duration;

use poise::serenity_prelude as serenity;
use tracing::warn;

use super::controls::ControlAction;
use super::{Data, Feedback, feedback_embed};
use crate::core::authorize::{self, BotFacts, Denial, GateRequest, MemberFacts, TargetFacts};
use crate::errors::Result;
use crate::store::keys;

const MODAL_TIMEOUT: Duration = Duration::from_secs(60);
const SELECT_TIMEOUT: Duration = Duration::from_secs(60);
const MAX_SELECT_TARGETS: u8 = 10;

/// How many characters a channel name may have.
const NAME_RANGE: std::ops::RangeInclusive<usize> = 3..=32;
/// Allowed user limit, 0 meaning unlimited.
const LIMIT_RANGE: std::ops::RangeInclusive<u32> = 0..=99;
/// Allowed bitrate in kbps.
const BITRATE_RANGE: std::ops::RangeInclusive<u32> = 8..=96;

/// The target channel as seen at interaction time.
#[derive(Debug, Clone)]
struct ChannelFacts {
    name: String,
    bitrate_kbps: u32,
    user_limit: u32,
    nsfw: bool,
}

#[derive(Default)]
struct InteractionFacts {
    member: Option<MemberFacts>,
    bot: Option<BotFacts>,
    channel_id: Option<u64>,
    channel: Option<ChannelFacts>,
}

/// Everything a handler needs, resolved once in [`dispatch`].
struct Invocation<'a> {
    ctx: &'a serenity::Context,
    data: &'a Data,
    component: &'a serenity::ComponentInteraction,
    locale: String,
    guild_id: serenity::GuildId,
    channel_id: serenity::ChannelId,
    channel: ChannelFacts,
    member: MemberFacts,
    bot: Option<BotFacts>,
}

impl Invocation<'_> {
    fn t(&self, key: &str) -> String {
        self.data.translations.translate_to(&self.locale, key)
    }

    fn t_with(&self, key: &str, params: &[(&str, &str)]) -> String {
        self.data.translations.translate_with(&self.locale, key, params)
    }

    fn embed(&self, kind: Feedback, content: &str) -> serenity::CreateEmbed {
        feedback_embed(kind, &self.t(kind.locale_key()), content)
    }
}

/// Entry point for a panel button press.
pub async fn dispatch(
    ctx: &serenity::Context,
    data: &Data,
    component: &serenity::ComponentInteraction,
    action: ControlAction,
) -> Result<()> {
    let Some(guild_id) = component.guild_id else {
        return Ok(());
    };
    let locale = data
        .translations
        .resolve_locale(&component.locale, component.guild_locale.as_deref());

    let facts = snapshot_interaction(ctx, guild_id, component, action);
    let request = GateRequest {
        member: facts.member.clone(),
        channel_id: facts.channel_id,
        check_channel: true,
        check_management: true,
        bot_perms_required: true,
        bot: facts.bot.clone(),
        enforce_target_policy: data.app_config.is_production(),
        ..GateRequest::default()
    };
    if let Err(denial) = authorize::authorize(&*data.store, guild_id.get(), &request).await {
        return deny(ctx, data, component, &locale, denial).await;
    }

    // the gate guarantees channel_id; channel details can still be missing
    // when the cache lags behind
    let (Some(channel_id), Some(channel), Some(member)) =
        (facts.channel_id, facts.channel, facts.member)
    else {
        warn!(guild_id = guild_id.get(), "Temp channel passed the gate but is not cached");
        return deny(ctx, data, component, &locale, Denial::FailedFetch).await;
    };

    let inv = Invocation {
        ctx,
        data,
        component,
        locale,
        guild_id,
        channel_id: serenity::ChannelId::new(channel_id),
        channel,
        member,
        bot: facts.bot,
    };

    match action {
        ControlAction::Rename => rename(&inv).await,
        ControlAction::Limit => limit(&inv).await,
        ControlAction::Bitrate => bitrate(&inv).await,
        ControlAction::Lock => lock(&inv).await,
        ControlAction::Nsfw => nsfw(&inv).await,
        ControlAction::Kick => kick(&inv).await,
        ControlAction::Ban => ban(&inv).await,
        ControlAction::Invite => invite(&inv).await,
        ControlAction::Clear => clear(&inv).await,
        ControlAction::Status => status(&inv).await,
    }
}

async fn deny(
    ctx: &serenity::Context,
    data: &Data,
    component: &serenity::ComponentInteraction,
    locale: &str,
    denial: Denial,
) -> Result<()> {
    let reason = data.translations.translate_to(locale, denial.locale_key());
    let content = data
        .translations
        .translate_with(locale, "errors.tvc", &[("error", &reason)]);
    let title = data
        .translations
        .translate_to(locale, Feedback::Error.locale_key());
    component
        .create_response(
            &ctx.http,
            ephemeral_message(feedback_embed(Feedback::Error, &title, &content)),
        )
        .await?;
    Ok(())
}

fn ephemeral_message(embed: serenity::CreateEmbed) -> serenity::CreateInteractionResponse {
    serenity::CreateInteractionResponse::Message(
        serenity::CreateInteractionResponseMessage::new()
            .embed(embed)
            .ephemeral(true),
    )
}

/// Resolves member/bot/channel facts inside one cache scope.
fn snapshot_interaction(
    ctx: &serenity::Context,
    guild_id: serenity::GuildId,
    component: &serenity::ComponentInteraction,
    action: ControlAction,
) -> InteractionFacts {
    let bot_id = ctx.cache.current_user().id;
    let Some(guild) = ctx.cache.guild(guild_id) else {
        return InteractionFacts::default();
    };
    let Some(member) = component.member.as_ref() else {
        return InteractionFacts::default();
    };

    let channel_id = guild
        .voice_states
        .get(&member.user.id)
        .and_then(|vs| vs.channel_id);
    let channel = channel_id.and_then(|id| guild.channels.get(&id));

    let member_facts = {
        let guild_perms = guild.member_permissions(member);
        let channel_perms = channel.map(|c| guild.user_permissions_in(c, member));
        MemberFacts {
            id: member.user.id.get(),
            is_admin: guild_perms.administrator(),
            manages_channels: channel_perms
                .is_some_and(|p| p.contains(serenity::Permissions::MANAGE_CHANNELS)),
            manages_guild: channel_perms
                .is_some_and(|p| p.contains(serenity::Permissions::MANAGE_GUILD)),
        }
    };

    let bot_facts = guild.members.get(&bot_id).map(|bot| BotFacts {
        is_admin: guild.member_permissions(bot).administrator(),
        has_channel_perms: channel.is_some_and(|c| {
            guild
                .user_permissions_in(c, bot)
                .contains(action.required_bot_perms())
        }),
    });

    InteractionFacts {
        member: Some(member_facts),
        bot: bot_facts,
        channel_id: channel_id.map(serenity::ChannelId::get),
        channel: channel.map(|c| ChannelFacts {
            name: c.name.clone(),
            bitrate_kbps: c.bitrate.unwrap_or(64_000) / 1000,
            user_limit: c.user_limit.unwrap_or(0),
            nsfw: c.nsfw,
        }),
    }
}

/// Facts about selected moderation targets, also one cache scope. Members
/// missing from the cache are dropped here and reported as skipped.
fn snapshot_targets(
    ctx: &serenity::Context,
    guild_id: serenity::GuildId,
    user_ids: &[serenity::UserId],
) -> Vec<TargetFacts> {
    let Some(guild) = ctx.cache.guild(guild_id) else {
        return Vec::new();
    };
    user_ids
        .iter()
        .filter_map(|id| {
            let member = guild.members.get(id)?;
            let perms = guild.member_permissions(member);
            Some(TargetFacts {
                id: id.get(),
                is_bot: member.user.bot,
                is_admin: perms.administrator(),
                manages_guild: perms.contains(serenity::Permissions::MANAGE_GUILD),
                voice_channel_id: guild
                    .voice_states
                    .get(id)
                    .and_then(|vs| vs.channel_id)
                    .map(serenity::ChannelId::get),
            })
        })
        .collect()
}

/// Opens a single-field modal prefilled with `value` and waits for the
/// submission. `None` means the member let it time out.
async fn prompt_text(
    inv: &Invocation<'_>,
    slug: &str,
    value: &str,
) -> Result<Option<(serenity::ModalInteraction, String)>> {
    let modal = serenity::CreateQuickModal::new(inv.t(&format!("buttons.{slug}.modal.title")))
        .timeout(MODAL_TIMEOUT)
        .field(
            serenity::CreateInputText::new(
                serenity::InputTextStyle::Short,
                inv.t(&format!("buttons.{slug}.modal.input")),
                "value",
            )
            .placeholder(inv.t(&format!("buttons.{slug}.modal.placeholder")))
            .value(value)
            .required(true),
        );
    let Some(response) = inv.component.quick_modal(inv.ctx, modal).await? else {
        return Ok(None);
    };
    let input = response.inputs.into_iter().next().unwrap_or_default();
    Ok(Some((response.interaction, input)))
}

async fn respond_modal(
    inv: &Invocation<'_>,
    modal: &serenity::ModalInteraction,
    kind: Feedback,
    content: &str,
) -> Result<()> {
    modal
        .create_response(&inv.ctx.http, ephemeral_message(inv.embed(kind, content)))
        .await?;
    Ok(())
}

async fn rename(inv: &Invocation<'_>) -> Result<()> {
    let Some((modal, input)) = prompt_text(inv, "rename", &inv.channel.name).await? else {
        return Ok(());
    };
    let requested = input.trim();
    if !NAME_RANGE.contains(&requested.chars().count()) {
        let msg = inv.t_with("buttons.rename.wrong-input", &[("name", requested)]);
        return respond_modal(inv, &modal, Feedback::Warning, &msg).await;
    }
    if requested == inv.channel.name {
        let msg = inv.t_with("buttons.rename.already", &[("name", requested)]);
        return respond_modal(inv, &modal, Feedback::Warning, &msg).await;
    }

    inv.channel_id
        .edit(&inv.ctx.http, serenity::EditChannel::new().name(requested))
        .await?;
    let msg = inv.t_with("buttons.rename.success", &[("name", requested)]);
    respond_modal(inv, &modal, Feedback::Success, &msg).await
}

async fn limit(inv: &Invocation<'_>) -> Result<()> {
    let current = inv.channel.user_limit.to_string();
    let Some((modal, input)) = prompt_text(inv, "limit", &current).await? else {
        return Ok(());
    };
    let Some(limit) = parse_user_limit(&input) else {
        let msg = inv.t_with("buttons.limit.wrong-input", &[("limit", input.trim())]);
        return respond_modal(inv, &modal, Feedback::Warning, &msg).await;
    };
    if limit == inv.channel.user_limit {
        let msg = inv.t_with("buttons.limit.already", &[("limit", &limit.to_string())]);
        return respond_modal(inv, &modal, Feedback::Warning, &msg).await;
    }

    inv.channel_id
        .edit(&inv.ctx.http, serenity::EditChannel::new().user_limit(limit))
        .await?;
    let msg = inv.t_with("buttons.limit.success", &[("limit", &limit.to_string())]);
    respond_modal(inv, &modal, Feedback::Success, &msg).await
}

async fn bitrate(inv: &Invocation<'_>) -> Result<()> {
    let current = inv.channel.bitrate_kbps.to_string();
    let Some((modal, input)) = prompt_text(inv, "bitrate", &current).await? else {
        return Ok(());
    };
    let Some(kbps) = parse_bitrate_kbps(&input) else {
        let msg = inv.t_with("buttons.bitrate.wrong-input", &[("bitrate", input.trim())]);
        return respond_modal(inv, &modal, Feedback::Warning, &msg).await;
    };
    if kbps == inv.channel.bitrate_kbps {
        let msg = inv.t_with("buttons.bitrate.already", &[("bitrate", &kbps.to_string())]);
        return respond_modal(inv, &modal, Feedback::Warning, &msg).await;
    }

    inv.channel_id
        .edit(
            &inv.ctx.http,
            serenity::EditChannel::new().bitrate(kbps * 1000),
        )
        .await?;
    let msg = inv.t_with("buttons.bitrate.success", &[("bitrate", &kbps.to_string())]);
    respond_modal(inv, &modal, Feedback::Success, &msg).await
}

async fn lock(inv: &Invocation<'_>) -> Result<()> {
    let everyone = serenity::RoleId::new(inv.guild_id.get());
    inv.channel_id
        .create_permission(
            &inv.ctx.http,
            serenity::PermissionOverwrite {
                allow: serenity::Permissions::empty(),
                deny: serenity::Permissions::CONNECT,
                kind: serenity::PermissionOverwriteType::Role(everyone),
            },
        )
        .await?;
    let msg = inv.t("buttons.lock.success");
    inv.component
        .create_response(&inv.ctx.http, ephemeral_message(inv.embed(Feedback::Success, &msg)))
        .await?;
    Ok(())
}

async fn nsfw(inv: &Invocation<'_>) -> Result<()> {
    let enable = !inv.channel.nsfw;
    inv.channel_id
        .edit(&inv.ctx.http, serenity::EditChannel::new().nsfw(enable))
        .await?;
    let key = if enable {
        "buttons.nsfw.activated"
    } else {
        "buttons.nsfw.deactivated"
    };
    let msg = inv.t(key);
    inv.component
        .create_response(&inv.ctx.http, ephemeral_message(inv.embed(Feedback::Success, &msg)))
        .await?;
    Ok(())
}

/// Replies with a user select menu and waits for the pick. `None` means the
/// menu timed out.
async fn select_members(
    inv: &Invocation<'_>,
    slug: &str,
) -> Result<Option<(serenity::ComponentInteraction, Vec<serenity::UserId>)>> {
    // unique per interaction so concurrent menus never cross wires
    let custom_id = format!("select-{slug}-{}", inv.component.id.get());
    let menu = serenity::CreateSelectMenu::new(
        custom_id.clone(),
        serenity::CreateSelectMenuKind::User {
            default_users: None,
        },
    )
    .min_values(1)
    .max_values(MAX_SELECT_TARGETS);

    inv.component
        .create_response(
            &inv.ctx.http,
            serenity::CreateInteractionResponse::Message(
                serenity::CreateInteractionResponseMessage::new()
                    .content(inv.t(&format!("buttons.{slug}.prompt")))
                    .components(vec![serenity::CreateActionRow::SelectMenu(menu)])
                    .ephemeral(true),
            ),
        )
        .await?;

    let selection = serenity::ComponentInteractionCollector::new(&inv.ctx.shard)
        .timeout(SELECT_TIMEOUT)
        .filter(move |i| i.data.custom_id == custom_id)
        .await;
    let Some(selection) = selection else {
        return Ok(None);
    };
    let users = match &selection.data.kind {
        serenity::ComponentInteractionDataKind::UserSelect { values } => values.clone(),
        _ => Vec::new(),
    };
    Ok(Some((selection, users)))
}

/// Replaces the select menu with the outcome embed.
async fn respond_selection(
    inv: &Invocation<'_>,
    selection: &serenity::ComponentInteraction,
    kind: Feedback,
    content: &str,
) -> Result<()> {
    selection
        .create_response(
            &inv.ctx.http,
            serenity::CreateInteractionResponse::UpdateMessage(
                serenity::CreateInteractionResponseMessage::new()
                    .content("")
                    .embed(inv.embed(kind, content))
                    .components(Vec::new()),
            ),
        )
        .await?;
    Ok(())
}

fn mention_list(ids: &[u64]) -> String {
    ids.iter()
        .map(|id| format!("<@{id}>"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Runs the target-policy gate for one selected member.
async fn target_allowed(inv: &Invocation<'_>, target: &TargetFacts) -> bool {
    let request = GateRequest {
        member: Some(inv.member.clone()),
        channel_id: Some(inv.channel_id.get()),
        check_channel: true,
        check_management: true,
        bot_perms_required: true,
        bot: inv.bot.clone(),
        target: Some(target.clone()),
        enforce_target_policy: inv.data.app_config.is_production(),
        ..GateRequest::default()
    };
    authorize::authorize(&*inv.data.store, inv.guild_id.get(), &request)
        .await
        .is_ok()
}

/// Shared kick/ban skeleton: select targets, gate each, apply `op`.
/// `done_param` names the success-line placeholder of the action's catalog
/// entry (`kicked` / `banned`).
async fn moderate<F, Fut>(inv: &Invocation<'_>, slug: &str, done_param: &str, op: F) -> Result<()>
where
    F: Fn(serenity::UserId) -> Fut,
    Fut: std::future::Future<Output = std::result::Result<(), serenity::Error>>,
{
    let Some((selection, picked)) = select_members(inv, slug).await? else {
        return Ok(());
    };

    let targets = snapshot_targets(inv.ctx, inv.guild_id, &picked);
    let mut done = Vec::new();
    let mut skipped: Vec<u64> = picked
        .iter()
        .map(|id| id.get())
        .filter(|id| !targets.iter().any(|t| t.id == *id))
        .collect();

    for target in &targets {
        if !target_allowed(inv, target).await {
            skipped.push(target.id);
            continue;
        }
        match op(serenity::UserId::new(target.id)).await {
            Ok(()) => done.push(target.id),
            Err(e) => {
                warn!(target_id = target.id, error = %e, "Moderation call failed");
                skipped.push(target.id);
            }
        }
    }

    let mut lines = Vec::new();
    if done.is_empty() {
        lines.push(inv.t(&format!("buttons.{slug}.none")));
    } else {
        lines.push(inv.t_with(
            &format!("buttons.{slug}.success"),
            &[(done_param, &mention_list(&done))],
        ));
    }
    if !skipped.is_empty() {
        lines.push(inv.t_with(
            &format!("buttons.{slug}.skipped"),
            &[("skipped", &mention_list(&skipped))],
        ));
    }
    let kind = if done.is_empty() {
        Feedback::Warning
    } else {
        Feedback::Success
    };
    respond_selection(inv, &selection, kind, &lines.join("\n")).await
}

async fn kick(inv: &Invocation<'_>) -> Result<()> {
    moderate(inv, "kick", "kicked", |user_id| async move {
        inv.guild_id
            .disconnect_member(&inv.ctx.http, user_id)
            .await
            .map(|_| ())
    })
    .await
}

async fn ban(inv: &Invocation<'_>) -> Result<()> {
    moderate(inv, "ban", "banned", |user_id| async move {
        inv.channel_id
            .create_permission(
                &inv.ctx.http,
                serenity::PermissionOverwrite {
                    allow: serenity::Permissions::empty(),
                    deny: serenity::Permissions::CONNECT,
                    kind: serenity::PermissionOverwriteType::Member(user_id),
                },
            )
            .await?;
        // throw them out too when they currently sit in the channel
        let in_channel = inv.ctx.cache.guild(inv.guild_id).is_some_and(|guild| {
            guild
                .voice_states
                .get(&user_id)
                .and_then(|vs| vs.channel_id)
                == Some(inv.channel_id)
        });
        if in_channel {
            inv.guild_id.disconnect_member(&inv.ctx.http, user_id).await?;
        }
        Ok(())
    })
    .await
}

async fn invite(inv: &Invocation<'_>) -> Result<()> {
    let Some((selection, picked)) = select_members(inv, "invite").await? else {
        return Ok(());
    };

    let Some(url) = invite_url(inv).await else {
        let msg = inv.t("buttons.invite.failed");
        return respond_selection(inv, &selection, Feedback::Error, &msg).await;
    };

    let mut delivered = Vec::new();
    let mut skipped = Vec::new();
    for user_id in picked {
        let sent = async {
            let dm = user_id.create_dm_channel(&inv.ctx.http).await?;
            dm.id
                .send_message(&inv.ctx.http, serenity::CreateMessage::new().content(&url))
                .await?;
            Ok::<(), serenity::Error>(())
        }
        .await;
        match sent {
            Ok(()) => delivered.push(user_id.get()),
            Err(e) => {
                warn!(target_id = user_id.get(), error = %e, "Invite DM failed");
                skipped.push(user_id.get());
            }
        }
    }

    let mut lines = vec![inv.t_with(
        "buttons.invite.success",
        &[("invited", &mention_list(&delivered))],
    )];
    if !skipped.is_empty() {
        lines.push(inv.t_with(
            "buttons.invite.skipped",
            &[("skipped", &mention_list(&skipped))],
        ));
    }
    let kind = if delivered.is_empty() {
        Feedback::Warning
    } else {
        Feedback::Success
    };
    respond_selection(inv, &selection, kind, &lines.join("\n")).await
}

/// The channel's invite URL, created once and cached until the channel dies.
async fn invite_url(inv: &Invocation<'_>) -> Option<String> {
    let key = keys::invite(inv.guild_id.get(), inv.channel_id.get());
    match inv.data.store.get(&key).await {
        Ok(Some(url)) if !url.is_empty() => return Some(url),
        Ok(_) => {}
        Err(e) => warn!(%key, error = %e, "Invite cache read failed"),
    }

    let invite = inv
        .channel_id
        .create_invite(&inv.ctx.http, serenity::CreateInvite::new())
        .await
        .ok()?;
    let url = invite.url();
    if let Err(e) = inv.data.store.set(&key, &url).await {
        warn!(%key, error = %e, "Invite cache write failed");
    }
    Some(url)
}

async fn clear(inv: &Invocation<'_>) -> Result<()> {
    let messages = inv
        .channel_id
        .messages(&inv.ctx.http, serenity::GetMessages::new().limit(100))
        .await?;
    match messages.len() {
        0 => {}
        1 => {
            inv.channel_id
                .delete_message(&inv.ctx.http, messages[0].id)
                .await?;
        }
        _ => {
            inv.channel_id
                .delete_messages(&inv.ctx.http, messages.iter().map(|m| m.id))
                .await?;
        }
    }

    let msg = inv.t_with("buttons.clear.success", &[("count", &messages.len().to_string())]);
    inv.component
        .create_response(
            &inv.ctx.http,
            ephemeral_message(inv.embed(clear_feedback(messages.len()), &msg)),
        )
        .await?;
    Ok(())
}

/// Reply tone for a clear run: deleting nothing is only a warning.
const fn clear_feedback(count: usize) -> Feedback {
    if count == 0 {
        Feedback::Warning
    } else {
        Feedback::Success
    }
}

async fn status(inv: &Invocation<'_>) -> Result<()> {
    let Some((modal, input)) = prompt_text(inv, "status", "").await? else {
        return Ok(());
    };
    // voice channel status has no API support yet, acknowledge the input
    let msg = inv.t_with("buttons.status.success", &[("status", input.trim())]);
    respond_modal(inv, &modal, Feedback::Warning, &msg).await
}

/// Parses a user limit: 0 removes the limit, 99 is the platform maximum.
fn parse_user_limit(input: &str) -> Option<u32> {
    let value: u32 = input.trim().parse().ok()?;
    LIMIT_RANGE.contains(&value).then_some(value)
}

/// Parses a bitrate in kbps within the platform bounds.
fn parse_bitrate_kbps(input: &str) -> Option<u32> {
    let value: u32 = input.trim().parse().ok()?;
    BITRATE_RANGE.contains(&value).then_some(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_limit_bounds() {
        assert_eq!(parse_user_limit("0"), Some(0));
        assert_eq!(parse_user_limit("99"), Some(99));
        assert_eq!(parse_user_limit(" 42 "), Some(42));
        assert_eq!(parse_user_limit("100"), None);
        assert_eq!(parse_user_limit("-1"), None);
        assert_eq!(parse_user_limit("many"), None);
        assert_eq!(parse_user_limit(""), None);
    }

    #[test]
    fn bitrate_bounds() {
        assert_eq!(parse_bitrate_kbps("8"), Some(8));
        assert_eq!(parse_bitrate_kbps("96"), Some(96));
        assert_eq!(parse_bitrate_kbps("64"), Some(64));
        assert_eq!(parse_bitrate_kbps("7"), None);
        assert_eq!(parse_bitrate_kbps("97"), None);
        assert_eq!(parse_bitrate_kbps("8000"), None);
    }

    #[test]
    fn channel_name_length_is_counted_in_chars() {
        assert!(NAME_RANGE.contains(&"abc".chars().count()));
        assert!(!NAME_RANGE.contains(&"ab".chars().count()));
        assert!(NAME_RANGE.contains(&"äöü".chars().count()));
        assert!(!NAME_RANGE.contains(&"a".repeat(33).chars().count()));
    }

    #[test]
    fn mentions_join_with_commas() {
        assert_eq!(mention_list(&[1, 2]), "<@1>, <@2>");
        assert_eq!(mention_list(&[]), "");
    }

    #[test]
    fn clearing_nothing_is_only_a_warning() {
        assert_eq!(clear_feedback(0), Feedback::Warning);
        assert_eq!(clear_feedback(1), Feedback::Success);
        assert_eq!(clear_feedback(100), Feedback::Success);
    }

    #[test]
    fn moderation_success_lines_each_use_their_own_param() {
        let translations = crate::i18n::Translations::load().unwrap();
        let kick = translations.translate_with("en-us", "buttons.kick.success", &[("kicked", "<@1>")]);
        assert!(kick.contains("<@1>"));
        let ban = translations.translate_with("en-us", "buttons.ban.success", &[("banned", "<@1>")]);
        assert!(ban.contains("<@1>"));
    }
}
