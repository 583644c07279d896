//! Bot layer - Discord-specific interface over the core logic.
//!
//! Builds the poise framework, owns the shared [`Data`] handed to every
//! command and event handler, and provides the embed helpers all replies
//! share.

/// Control-action handlers (rename, limit, kick, ...)
pub mod actions;
/// Slash command implementations
pub mod commands;
/// Control panel rendering and the action dispatch table
pub mod controls;
/// Gateway event handling (voice states, components, guild removal)
pub mod events;

use std::sync::Arc;

use poise::serenity_prelude as serenity;
use sea_orm::DatabaseConnection;
use tracing::info;

use crate::config::AppConfig;
use crate::core::guild_config::GuildConfigStore;
use crate::core::lifecycle::LifecycleEngine;
use crate::errors;
use crate::i18n::Translations;
use crate::store::KvStore;
use controls::ControlRegistry;

/// Shared data available to all commands and event handlers.
pub struct Data {
    /// Runtime configuration
    pub app_config: Arc<AppConfig>,
    /// Ownership store
    pub store: Arc<dyn KvStore>,
    /// Temp-channel lifecycle engine
    pub engine: LifecycleEngine,
    /// Per-guild container/lobby configuration
    pub guild_configs: GuildConfigStore,
    /// Locale catalogs
    pub translations: Translations,
    /// Button custom-id to action dispatch table, built once at startup
    pub controls: ControlRegistry,
}

pub(crate) type Error = errors::Error;
/// Poise context alias used by every command.
pub type Context<'a> = poise::Context<'a, Data, Error>;

/// Colour/tone of a feedback embed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feedback {
    /// Green - the action went through
    Success,
    /// Orange - nothing happened, input problem or no-op
    Warning,
    /// Red - the action was denied or failed
    Error,
}

impl Feedback {
    const fn colour(self) -> serenity::Colour {
        match self {
            Self::Success => serenity::Colour::new(0x0080_00),
            Self::Warning => serenity::Colour::new(0xFFA5_00),
            Self::Error => serenity::Colour::new(0xFF00_00),
        }
    }

    /// Locale key of the matching feedback prefix.
    #[must_use]
    pub const fn locale_key(self) -> &'static str {
        match self {
            Self::Success => "feedback.success",
            Self::Warning => "feedback.warning",
            Self::Error => "feedback.error",
        }
    }
}

/// Builds the embed every reply uses: coloured, titled, timestamped.
#[must_use]
pub fn feedback_embed(kind: Feedback, title: &str, content: &str) -> serenity::CreateEmbed {
    serenity::CreateEmbed::new()
        .colour(kind.colour())
        .title(title)
        .description(content)
        .timestamp(serenity::Timestamp::now())
}

async fn on_error(error: poise::FrameworkError<'_, Data, Error>) {
    match error {
        poise::FrameworkError::Setup { error, .. } => {
            panic!("Failed to start bot: {error:?}");
        }
        poise::FrameworkError::Command { error, ctx, .. } => {
            tracing::error!("Error in command `{}`: {:?}", ctx.command().name, error);
            if let Err(e) = ctx.say(format!("An error occurred: {error}")).await {
                tracing::error!("Failed to send error message: {e}");
            }
        }
        error => {
            if let Err(e) = poise::builtins::on_error(error).await {
                tracing::error!("Error while handling error: {e}");
            }
        }
    }
}

/// Connects to Discord and runs the bot until the gateway closes.
pub async fn run_bot(
    token: String,
    app_config: Arc<AppConfig>,
    db: DatabaseConnection,
    store: Arc<dyn KvStore>,
) -> crate::errors::Result<()> {
    let translations = Translations::load()?;
    let data = Data {
        app_config,
        store: Arc::clone(&store),
        engine: LifecycleEngine::new(Arc::clone(&store)),
        guild_configs: GuildConfigStore::new(db, store),
        translations,
        controls: ControlRegistry::new(),
    };

    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: vec![
                commands::ping(),
                commands::setup(),
                commands::controls(),
                commands::bugreport(),
            ],
            event_handler: |ctx, event, framework, data| {
                Box::pin(events::handle(ctx, event, framework, data))
            },
            on_error: |error| Box::pin(on_error(error)),
            ..Default::default()
        })
        .setup(|ctx, ready, framework| {
            Box::pin(async move {
                info!("Logged in as {}", ready.user.name);
                info!("Registering commands globally...");
                poise::builtins::register_globally(ctx, &framework.options().commands).await?;
                Ok(data)
            })
        })
        .build();

    let intents = serenity::GatewayIntents::GUILDS
        | serenity::GatewayIntents::GUILD_VOICE_STATES
        | serenity::GatewayIntents::GUILD_PRESENCES;

    info!("Setting up Serenity client for Poise framework...");
    let mut client = serenity::Client::builder(&token, intents)
        .framework(framework)
        .await?;

    info!("Starting bot client...");
    client.start().await?;
    Ok(())
}
