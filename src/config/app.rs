//! Application configuration from environment variables.
//!
//! Everything the bot needs besides the Discord token lives in one explicit
//! `AppConfig` built once in `main` and passed by reference from there; no
//! module hides lazily-initialized global state.

use crate::errors::Result;

/// Deployment mode. Development relaxes the moderation-target policies so a
/// single account can exercise every control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunMode {
    /// Full policy enforcement
    Production,
    /// Local testing; target policies relaxed
    #[default]
    Development,
}

impl RunMode {
    fn from_env() -> Self {
        match std::env::var("NODE_ENV").or_else(|_| std::env::var("RUN_MODE")) {
            Ok(v) if v.eq_ignore_ascii_case("production") => Self::Production,
            _ => Self::Development,
        }
    }
}

/// Runtime configuration resolved at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Production vs. development behavior switches
    pub mode: RunMode,
    /// Redis connection string; absent means the in-memory store fallback
    pub redis_url: Option<String>,
    /// SeaORM database URL for guild settings
    pub database_url: String,
    /// Channel that receives forwarded bug reports, if configured
    pub bug_report_channel_id: Option<u64>,
}

impl AppConfig {
    /// Reads the configuration from the process environment.
    ///
    /// Only `DATABASE_URL` has a default; everything else is optional and
    /// degrades to a feature being disabled.
    pub fn from_env() -> Result<Self> {
        let bug_report_channel_id = match std::env::var("BUG_REPORT_CHANNEL_ID") {
            Ok(raw) => match raw.parse::<u64>() {
                Ok(id) => Some(id),
                Err(_) => {
                    tracing::warn!(value = %raw, "BUG_REPORT_CHANNEL_ID is not a channel id, ignoring");
                    None
                }
            },
            Err(_) => None,
        };

        Ok(Self {
            mode: RunMode::from_env(),
            redis_url: std::env::var("REDIS_CONNECTION").ok(),
            database_url: std::env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://data/tempvox.sqlite?mode=rwc".to_string()),
            bug_report_channel_id,
        })
    }

    /// Whether moderation-target policies are enforced.
    #[must_use]
    pub const fn is_production(&self) -> bool {
        matches!(self.mode, RunMode::Production)
    }
}
