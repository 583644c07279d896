//! Guild configuration command.
//!
//! `/setup` points the bot at a container category and a lobby voice channel.
//! The pair is written to the database and the cache keys the voice hot path
//! reads are primed in the same call.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use poise::serenity_prelude as serenity;
    use tracing::info;

    use crate::bot::{Context, Feedback, feedback_embed};
    use crate::errors::Result;
    use crate::store::keys;

    /// Configure temp voice channels for this guild.
    #[poise::command(
        slash_command,
        guild_only,
        default_member_permissions = "MANAGE_CHANNELS"
    )]
    pub async fn setup(
        ctx: Context<'_>,
        #[description = "Category under which temp channels are created"]
        #[channel_types("Category")]
        container: serenity::Channel,
        #[description = "Voice channel that hands out temp channels"]
        #[channel_types("Voice")]
        lobby: serenity::Channel,
    ) -> Result<()> {
        let data = ctx.data();
        let Some(guild_id) = ctx.guild_id() else {
            return Ok(());
        };
        let guild_locale = { ctx.guild().map(|g| g.preferred_locale.to_lowercase()) };
        let locale = data
            .translations
            .resolve_locale(ctx.locale().unwrap_or(""), guild_locale.as_deref());

        let bot_can_manage = {
            let bot_id = ctx.serenity_context().cache.current_user().id;
            ctx.guild().is_some_and(|guild| {
                guild.members.get(&bot_id).is_some_and(|bot| {
                    guild
                        .member_permissions(bot)
                        .contains(serenity::Permissions::MANAGE_CHANNELS)
                })
            })
        };
        if !bot_can_manage {
            let msg = data
                .translations
                .translate_to(&locale, "commands.setup.errors.no-perm");
            let title = data
                .translations
                .translate_to(&locale, Feedback::Warning.locale_key());
            ctx.send(
                poise::CreateReply::default()
                    .embed(feedback_embed(Feedback::Warning, &title, &msg))
                    .ephemeral(true),
            )
            .await?;
            return Ok(());
        }

        data.guild_configs
            .set(guild_id.get(), container.id().get(), lobby.id().get(), &locale)
            .await?;
        info!(
            guild_id = guild_id.get(),
            container_id = container.id().get(),
            lobby_id = lobby.id().get(),
            "Guild temp-voice configuration updated"
        );

        let mut msg = data.translations.translate_with(
            &locale,
            "commands.setup.result.success",
            &[
                ("channel", &format!(" <#{}>", lobby.id().get())),
                ("container", &format!(" <#{}>", container.id().get())),
            ],
        );
        if !data.app_config.is_production() {
            // echo the primed cache keys so a dev deployment is inspectable
            msg.push_str(&format!(
                "\n`{}` `{}`",
                keys::container(guild_id.get()),
                keys::lobby(guild_id.get())
            ));
        }
        let title = data
            .translations
            .translate_to(&locale, Feedback::Success.locale_key());
        ctx.send(
            poise::CreateReply::default()
                .embed(feedback_embed(Feedback::Success, &title, &msg))
                .ephemeral(true),
        )
        .await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
