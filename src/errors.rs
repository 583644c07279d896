//! Unified error types and result handling.

use thiserror::Error;

/// Crate-wide error type. Everything that can fail inside the bot funnels
/// into this enum; handler boundaries log and degrade rather than crash.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration loading or validation failure
    #[error("Configuration error: {message}")]
    Config {
        /// What went wrong
        message: String,
    },

    /// Ownership-store failure (memory fallback lifecycle misuse, etc.)
    #[error("Store error: {message}")]
    Store {
        /// What went wrong
        message: String,
    },

    /// SeaORM database error
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// Redis backend error
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Environment variable error
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    /// Serenity/Poise framework error
    #[error("Serenity/Poise framework error: {0}")]
    Framework(Box<poise::serenity_prelude::Error>),
}

impl From<poise::serenity_prelude::Error> for Error {
    fn from(value: poise::serenity_prelude::Error) -> Self {
        Self::Framework(Box::new(value))
    }
}

impl Error {
    /// Shorthand for a configuration error from any displayable cause.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Shorthand for an ownership-store error.
    pub fn store(message: impl Into<String>) -> Self {
        Self::Store {
            message: message.into(),
        }
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
