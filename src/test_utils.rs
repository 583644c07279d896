//! Shared test utilities for `TempVox`.
//!
//! This module provides common helper functions for setting up test databases
//! and an in-memory ownership store.

use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::errors::Result;
use crate::store::MemoryStore;

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Creates a connected in-memory ownership store.
pub async fn setup_memory_store() -> Arc<MemoryStore> {
    let store = Arc::new(MemoryStore::new());
    store
        .connect()
        .await
        .expect("fresh memory store must connect");
    store
}
