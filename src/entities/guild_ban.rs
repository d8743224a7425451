//! Bot-side guild ban entity.
//!
//! Same expiry semantics as [`super::user_ban`], applied to an entire guild.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Guild ban database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "bot_guild_bans")]
pub struct Model {
    /// Banned guild's snowflake
    #[sea_orm(primary_key, auto_increment = false)]
    pub guild_id: i64,
    /// Why the guild was banned
    pub reason: String,
    /// When the ban lapses, None for a permanent ban
    pub expires_at: Option<DateTimeUtc>,
}

/// Defines relationships between `GuildBan` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
