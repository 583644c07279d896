/// Application settings loaded from the environment
pub mod app;

/// Database configuration and connection management
pub mod database;

pub use app::{AppConfig, RunMode};
