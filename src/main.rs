//! `TempVox` entry point: configuration, storage and the bot itself.

use std::{env, sync::Arc};

use dotenvy::dotenv;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use tempvox::bot;
use tempvox::config::{self, AppConfig};
use tempvox::errors::{Error, Result};
use tempvox::store;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file (as early as possible)
    dotenv().ok(); // Non-fatal, env vars can be set externally
    info!("Attempted to load .env file.");

    // 3. Load the main application configuration
    let app_config = Arc::new(AppConfig::from_env()?);
    info!(mode = ?app_config.mode, "Successfully processed application configuration.");

    // 4. Initialize the guild-settings database
    let db = config::database::create_connection(&app_config.database_url)
        .await
        .inspect(|_| info!("Database initialized successfully."))
        .inspect_err(|e| error!("Failed to initialize database: {e}"))?;
    config::database::create_tables(&db).await?;

    // 5. Connect the ownership store (Redis, or the in-memory fallback)
    let kv = store::connect(&app_config)
        .await
        .inspect_err(|e| error!("Failed to connect ownership store: {e}"))?;

    // 6. Run the bot
    // DISCORD_BOT_TOKEN is loaded here, directly before use, not stored in AppConfig
    let token = env::var("DISCORD_BOT_TOKEN")
        .inspect_err(|e| error!("DISCORD_BOT_TOKEN not found: {e}"))
        .map_err(Error::EnvVar)?;

    let result = bot::run_bot(token, Arc::clone(&app_config), db, Arc::clone(&kv)).await;
    if let Err(e) = kv.close().await {
        error!("Failed to close ownership store: {e}");
    }
    result
}
