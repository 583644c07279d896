//! Database configuration module.
//!
//! Handles the `SQLite` connection and table creation using `SeaORM`. Table
//! creation uses `Schema::create_table_from_entity` so the database schema
//! always matches the entity definitions without hand-written SQL.

use crate::entities::GuildSettings;
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema};

/// Establishes a connection to the database at `url`.
pub async fn create_connection(url: &str) -> Result<DatabaseConnection> {
    Database::connect(url).await.map_err(Into::into)
}

/// Creates all necessary database tables from the entity definitions.
/// Existing tables are left untouched.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let mut guild_settings_table = schema.create_table_from_entity(GuildSettings);
    guild_settings_table.if_not_exists();

    db.execute(builder.build(&guild_settings_table)).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::GuildSettingsModel;
    use sea_orm::{EntityTrait, QuerySelect};

    #[tokio::test]
    async fn test_create_tables() -> Result<()> {
        let db = Database::connect("sqlite::memory:").await?;
        create_tables(&db).await?;

        // Table exists and is queryable
        let _: Vec<GuildSettingsModel> = GuildSettings::find().limit(1).all(&db).await?;
        Ok(())
    }

    #[tokio::test]
    async fn test_create_tables_is_idempotent() -> Result<()> {
        let db = Database::connect("sqlite::memory:").await?;
        create_tables(&db).await?;
        create_tables(&db).await?;
        Ok(())
    }
}
