//! Temp-voice commands: reposting the control panel and bug reports.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use poise::serenity_prelude as serenity;
    use tracing::warn;

    use crate::bot::{Context, Feedback, controls, feedback_embed};
    use crate::core::authorize::{self, GateRequest, MemberFacts};
    use crate::errors::Result;
    use crate::store::keys;

    /// Post the temp channel control panel.
    #[poise::command(slash_command, guild_only)]
    pub async fn controls(ctx: Context<'_>) -> Result<()> {
        let data = ctx.data();
        let Some(guild_id) = ctx.guild_id() else {
            return Ok(());
        };
        // the locale recorded at /setup time beats the platform guild locale
        let guild_locale = match data.guild_configs.locale(guild_id.get()).await {
            Ok(Some(locale)) => Some(locale),
            _ => ctx.guild().map(|g| g.preferred_locale.to_lowercase()),
        };
        let locale = data
            .translations
            .resolve_locale(ctx.locale().unwrap_or(""), guild_locale.as_deref());

        let author_id = ctx.author().id;
        let (member, channel_id) = {
            match ctx.guild() {
                Some(guild) => {
                    let channel_id = guild
                        .voice_states
                        .get(&author_id)
                        .and_then(|vs| vs.channel_id);
                    let member = guild.members.get(&author_id).map(|m| {
                        let perms = guild.member_permissions(m);
                        MemberFacts {
                            id: author_id.get(),
                            is_admin: perms.administrator(),
                            manages_channels: perms
                                .contains(serenity::Permissions::MANAGE_CHANNELS),
                            manages_guild: perms.contains(serenity::Permissions::MANAGE_GUILD),
                        }
                    });
                    (member, channel_id)
                }
                None => (None, None),
            }
        };

        let request = GateRequest {
            member,
            channel_id: channel_id.map(serenity::ChannelId::get),
            check_channel: true,
            ..GateRequest::default()
        };
        if let Err(denial) =
            authorize::authorize(&*data.store, guild_id.get(), &request).await
        {
            let reason = data.translations.translate_to(&locale, denial.locale_key());
            let msg =
                data.translations
                    .translate_with(&locale, "errors.tvc", &[("error", &reason)]);
            let title = data
                .translations
                .translate_to(&locale, Feedback::Error.locale_key());
            ctx.send(
                poise::CreateReply::default()
                    .embed(feedback_embed(Feedback::Error, &title, &msg))
                    .ephemeral(true),
            )
            .await?;
            return Ok(());
        }

        // the gate guarantees the author sits in a live temp channel
        let Some(channel_id) = channel_id else {
            return Ok(());
        };
        let panel_locale = guild_locale.unwrap_or_else(|| locale.clone());
        let (kind, key) = match controls::post_panel(
            &ctx.serenity_context().http,
            &data.translations,
            channel_id,
            &panel_locale,
        )
        .await
        {
            Ok(_) => (Feedback::Success, "controls.success-message"),
            Err(e) => {
                warn!(channel_id = channel_id.get(), error = %e, "Failed to post control panel");
                (Feedback::Error, "controls.error-message")
            }
        };
        let msg = data.translations.translate_to(&locale, key);
        let title = data.translations.translate_to(&locale, kind.locale_key());
        ctx.send(
            poise::CreateReply::default()
                .embed(feedback_embed(kind, &title, &msg))
                .ephemeral(true),
        )
        .await?;
        Ok(())
    }

    /// Send a bug report to the maintainers.
    #[poise::command(slash_command)]
    pub async fn bugreport(
        ctx: Context<'_>,
        #[description = "What went wrong?"] message: String,
    ) -> Result<()> {
        let data = ctx.data();
        let stored_locale = match ctx.guild_id() {
            Some(guild_id) => data
                .guild_configs
                .locale(guild_id.get())
                .await
                .ok()
                .flatten(),
            None => None,
        };
        let guild_locale =
            stored_locale.or_else(|| ctx.guild().map(|g| g.preferred_locale.to_lowercase()));
        let locale = data
            .translations
            .resolve_locale(ctx.locale().unwrap_or(""), guild_locale.as_deref());

        let Some(report_channel) = data.app_config.bug_report_channel_id else {
            let msg = data
                .translations
                .translate_to(&locale, "commands.bugreport.failed");
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
        };

        let number = data.store.increment(keys::REPORT_COUNTER).await?;
        let report = serenity::CreateEmbed::new()
            .colour(serenity::Colour::new(0x0000_FF))
            .title(format!("Bug report #{number}"))
            .description(message)
            .field("Reporter", format!("<@{}>", ctx.author().id.get()), true)
            .field(
                "Guild",
                ctx.guild_id()
                    .map_or_else(|| "DM".to_string(), |id| id.get().to_string()),
                true,
            )
            .timestamp(serenity::Timestamp::now());
        serenity::ChannelId::new(report_channel)
            .send_message(
                &ctx.serenity_context().http,
                serenity::CreateMessage::new().embed(report),
            )
            .await?;

        let msg = data.translations.translate_with(
            &locale,
            "commands.bugreport.success",
            &[("number", &number.to_string())],
        );
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
