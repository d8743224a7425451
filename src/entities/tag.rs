//! Tag entity - Guild-scoped named content snippets.
//!
//! Tag names are unique per guild; the unique index over `(guild_id, name)` is
//! created alongside the table in [`crate::config::database::create_tables`]
//! and is what gives racing `create_tag` calls exactly one winner.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Tag database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "tags")]
pub struct Model {
    /// Unique identifier for the tag
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Guild the tag belongs to
    pub guild_id: i64,
    /// Tag name, unique within its guild
    pub name: String,
    /// Content sent when the tag is invoked
    #[sea_orm(column_type = "Text")]
    pub content: String,
    /// User who created the tag
    pub author_id: i64,
    /// When the tag was created
    pub created_at: DateTimeUtc,
    /// How many times the tag has been invoked. Monotonically increasing,
    /// only ever reset to zero, never decremented.
    pub uses: i64,
}

/// Defines relationships between Tag and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Every tag belongs to exactly one guild
    #[sea_orm(
        belongs_to = "super::guild::Entity",
        from = "Column::GuildId",
        to = "super::guild::Column::Id"
    )]
    Guild,
}

impl Related<super::guild::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Guild.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
