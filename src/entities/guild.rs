//! Guild entity - Per-guild bot configuration.
//!
//! One row per Discord guild, created on the first configuration command.
//! Rows are never hard-deleted; a guild that turns the bot off is soft-disabled
//! so its starboard history and settings survive a re-enable.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Guild configuration database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "guilds")]
pub struct Model {
    /// Discord guild snowflake
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i64,
    /// Channel starboard posts are sent to, None until configured
    pub starboard_channel_id: Option<i64>,
    /// Star count at which a message is promoted to the starboard
    pub star_threshold: i32,
    /// Whether member join/leave logging is enabled
    pub log_members: bool,
    /// Channel member join/leave events are logged to
    pub member_join_log: Option<i64>,
    /// Whether the message spam detection system is enabled
    pub message_spam_system: bool,
    /// Soft-disable flag - configuration is kept but the bot ignores the guild
    pub is_disabled: bool,
}

/// Defines relationships between Guild and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One guild has many tags
    #[sea_orm(has_many = "super::tag::Entity")]
    Tags,
}

impl Related<super::tag::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Tags.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
