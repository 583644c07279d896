//! Guild settings entity - per-guild temp-voice configuration.
//!
//! Stores the container category and lobby channel an administrator picked
//! with `/setup`, plus the guild's preferred locale. Rows are written by the
//! setup command and read to re-prime the ownership-store cache after a
//! restart; they are never deleted automatically.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Guild settings database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "guild_settings")]
pub struct Model {
    /// Discord guild id, stored as a string token
    #[sea_orm(primary_key, auto_increment = false)]
    pub guild_id: String,
    /// Category channel under which temp channels are created
    pub container_id: String,
    /// Lobby voice channel whose join event triggers provisioning
    pub lobby_id: String,
    /// Preferred locale for guild-facing messages
    pub locale: String,
}

/// Guild settings have no relations to other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
