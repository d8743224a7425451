//! Starred message entity - Snapshot of a message that received its first star.
//!
//! The content and author avatar hash are captured once, at first-star time,
//! so the starboard entry survives the source message being edited or deleted.
//! The snapshot is intentionally never refreshed from the gateway.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Lifecycle status of the source message.
#[derive(Copy, Clone, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "i16", db_type = "SmallInteger")]
pub enum MessageStatus {
    /// Source message is intact
    #[sea_orm(num_value = 0)]
    Normal,
    /// Source message was edited after being starred (snapshot kept as-is)
    #[sea_orm(num_value = 1)]
    Edited,
    /// Source message was deleted; new star events are rejected
    #[sea_orm(num_value = 2)]
    Deleted,
}

/// Starred message database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "starred_messages")]
pub struct Model {
    /// Source message snowflake - doubles as the primary key
    #[sea_orm(primary_key, auto_increment = false)]
    pub message_id: i64,
    /// Channel the source message was posted in
    pub channel_id: i64,
    /// Author of the source message
    pub author_id: i64,
    /// Author's avatar hash at star time, None for default avatars
    pub author_avatar_hash: Option<String>,
    /// Message content snapshot taken when the first star arrived
    #[sea_orm(column_type = "Text")]
    pub content: String,
    /// Lifecycle status of the source message
    pub status: MessageStatus,
    /// Starboard post this message was promoted to, None until promoted.
    /// Set at most once unless explicitly cleared - this column is what keeps
    /// racing promotions from double-posting.
    pub starboard_message_id: Option<i64>,
}

/// Defines relationships between `StarredMessage` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One starred message has many stars
    #[sea_orm(has_many = "super::star::Entity")]
    Stars,
}

impl Related<super::star::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Stars.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
