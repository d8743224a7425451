//! Star entity - One row per (message, starrer) pair.
//!
//! The composite primary key is the invariant: a user can star a message at
//! most once, and the database arbitrates racing duplicate star events.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Star database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "stars")]
pub struct Model {
    /// Message that was starred
    #[sea_orm(primary_key, auto_increment = false)]
    pub message_id: i64,
    /// User who starred it
    #[sea_orm(primary_key, auto_increment = false)]
    pub starrer_id: i64,
}

/// Defines relationships between Star and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Every star belongs to exactly one starred message
    #[sea_orm(
        belongs_to = "super::starred_message::Entity",
        from = "Column::MessageId",
        to = "super::starred_message::Column::MessageId"
    )]
    StarredMessage,
}

impl Related<super::starred_message::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::StarredMessage.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
