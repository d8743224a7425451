//! Bot-side user ban entity.
//!
//! A row means the user is banned from interacting with the bot. Expiry is
//! judged against `expires_at` at read time; a row past its expiry is inert
//! even before opportunistic cleanup removes it.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// User ban database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "bot_user_bans")]
pub struct Model {
    /// Banned user's snowflake
    #[sea_orm(primary_key, auto_increment = false)]
    pub user_id: i64,
    /// Why the user was banned
    pub reason: String,
    /// When the ban lapses, None for a permanent ban
    pub expires_at: Option<DateTimeUtc>,
}

/// Defines relationships between `UserBan` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
