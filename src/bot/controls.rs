//! Control panel rendering and the button dispatch table.

use std::collections::HashMap;

use poise::serenity_prelude as serenity;

use crate::i18n::Translations;

/// One owner-facing control action, triggered by a panel button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlAction {
    /// Rename the channel
    Rename,
    /// Set the user limit
    Limit,
    /// Set the audio bitrate
    Bitrate,
    /// Deny Connect for everyone
    Lock,
    /// Toggle the NSFW flag
    Nsfw,
    /// Disconnect selected members
    Kick,
    /// Deny Connect for selected members
    Ban,
    /// DM selected members an invite
    Invite,
    /// Clear the channel chat
    Clear,
    /// Set a channel status
    Status,
}

impl ControlAction {
    /// Every action, in panel order.
    pub const ALL: [Self; 10] = [
        Self::Rename,
        Self::Limit,
        Self::Bitrate,
        Self::Lock,
        Self::Nsfw,
        Self::Kick,
        Self::Ban,
        Self::Invite,
        Self::Clear,
        Self::Status,
    ];

    /// Component custom id the panel button carries.
    #[must_use]
    pub const fn custom_id(self) -> &'static str {
        match self {
            Self::Rename => "control-rename",
            Self::Limit => "control-limit",
            Self::Bitrate => "control-bitrate",
            Self::Lock => "control-lock",
            Self::Nsfw => "control-nsfw",
            Self::Kick => "control-kick",
            Self::Ban => "control-ban",
            Self::Invite => "control-invite",
            Self::Clear => "control-clear",
            Self::Status => "control-status",
        }
    }

    /// Segment under `buttons.` in the locale catalogs.
    #[must_use]
    pub const fn locale_slug(self) -> &'static str {
        match self {
            Self::Rename => "rename",
            Self::Limit => "limit",
            Self::Bitrate => "bitrate",
            Self::Lock => "lock",
            Self::Nsfw => "nsfw",
            Self::Kick => "kick",
            Self::Ban => "ban",
            Self::Invite => "invite",
            Self::Clear => "clear",
            Self::Status => "status",
        }
    }

    /// Channel permissions the bot itself needs before the action may run.
    #[must_use]
    pub fn required_bot_perms(self) -> serenity::Permissions {
        match self {
            Self::Rename | Self::Limit | Self::Bitrate | Self::Nsfw | Self::Status => {
                serenity::Permissions::MANAGE_CHANNELS
            }
            Self::Lock => serenity::Permissions::MANAGE_CHANNELS | serenity::Permissions::MANAGE_ROLES,
            Self::Kick | Self::Ban => serenity::Permissions::MOVE_MEMBERS,
            Self::Invite => serenity::Permissions::CREATE_INSTANT_INVITE,
            Self::Clear => serenity::Permissions::MANAGE_MESSAGES,
        }
    }
}

/// Custom-id to action table, built once at startup.
pub struct ControlRegistry {
    by_custom_id: HashMap<&'static str, ControlAction>,
}

impl ControlRegistry {
    /// Builds the table over every known action.
    #[must_use]
    pub fn new() -> Self {
        let by_custom_id = ControlAction::ALL
            .into_iter()
            .map(|action| (action.custom_id(), action))
            .collect();
        Self { by_custom_id }
    }

    /// Resolves a component custom id, `None` for ids the panel never emits.
    #[must_use]
    pub fn lookup(&self, custom_id: &str) -> Option<ControlAction> {
        self.by_custom_id.get(custom_id).copied()
    }
}

impl Default for ControlRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Builds the panel embed: one inline field per action, in panel order.
#[must_use]
pub fn panel_embed(translations: &Translations, locale: &str) -> serenity::CreateEmbed {
    let mut embed = serenity::CreateEmbed::new()
        .colour(serenity::Colour::new(0x0000_FF))
        .title(translations.translate_to(locale, "controls.name"))
        .description(translations.translate_to(locale, "controls.description"))
        .timestamp(serenity::Timestamp::now());
    for action in ControlAction::ALL {
        let slug = action.locale_slug();
        let emoji = translations.translate_to(locale, &format!("buttons.{slug}.emoji"));
        let name = translations.translate_to(locale, &format!("buttons.{slug}.name"));
        let description = translations.translate_to(locale, &format!("buttons.{slug}.description"));
        embed = embed.field(format!("{emoji} {name}"), description, true);
    }
    embed
}

/// Builds the panel button rows, five buttons per row.
#[must_use]
pub fn panel_components(translations: &Translations, locale: &str) -> Vec<serenity::CreateActionRow> {
    let buttons: Vec<serenity::CreateButton> = ControlAction::ALL
        .into_iter()
        .map(|action| {
            let emoji = translations
                .translate_to(locale, &format!("buttons.{}.emoji", action.locale_slug()));
            serenity::CreateButton::new(action.custom_id())
                .style(serenity::ButtonStyle::Secondary)
                .emoji(serenity::ReactionType::Unicode(emoji))
        })
        .collect();
    buttons
        .chunks(5)
        .map(|row| serenity::CreateActionRow::Buttons(row.to_vec()))
        .collect()
}

/// Posts the control panel into a channel.
pub async fn post_panel(
    http: &serenity::Http,
    translations: &Translations,
    channel_id: serenity::ChannelId,
    locale: &str,
) -> Result<serenity::Message, serenity::Error> {
    let message = serenity::CreateMessage::new()
        .embed(panel_embed(translations, locale))
        .components(panel_components(translations, locale));
    channel_id.send_message(http, message).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_resolves_every_panel_id() {
        let registry = ControlRegistry::new();
        for action in ControlAction::ALL {
            assert_eq!(registry.lookup(action.custom_id()), Some(action));
        }
        assert_eq!(registry.lookup("control-unknown"), None);
        assert_eq!(registry.lookup(""), None);
    }

    #[test]
    fn custom_ids_are_distinct() {
        let mut ids: Vec<&str> = ControlAction::ALL.iter().map(|a| a.custom_id()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), ControlAction::ALL.len());
    }

    #[test]
    fn moderation_actions_need_move_members() {
        assert!(
            ControlAction::Kick
                .required_bot_perms()
                .contains(serenity::Permissions::MOVE_MEMBERS)
        );
        assert!(
            ControlAction::Ban
                .required_bot_perms()
                .contains(serenity::Permissions::MOVE_MEMBERS)
        );
        assert!(
            ControlAction::Lock
                .required_bot_perms()
                .contains(serenity::Permissions::MANAGE_ROLES)
        );
    }

    #[test]
    fn panel_rows_hold_at_most_five_buttons() {
        let translations = Translations::load().unwrap();
        let rows = panel_components(&translations, "en-us");
        assert_eq!(rows.len(), 2);
    }
}
