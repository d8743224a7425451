//! Filter entity - Generic moderation state independent of explicit bans.
//!
//! A filter flags a user, guild, or channel with a status and an optional
//! timeout. Like bans, an elapsed timeout makes the row inert at read time.
//! Snowflakes identify their object on their own, so the target id is the key
//! and the target type is descriptive.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// What kind of Discord object a filter targets.
#[derive(Copy, Clone, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "i16", db_type = "SmallInteger")]
pub enum TargetType {
    /// Filter applies to a user
    #[sea_orm(num_value = 0)]
    User,
    /// Filter applies to a whole guild
    #[sea_orm(num_value = 1)]
    Guild,
    /// Filter applies to a channel
    #[sea_orm(num_value = 2)]
    Channel,
}

/// Moderation status recorded by a filter.
#[derive(Copy, Clone, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "i16", db_type = "SmallInteger")]
pub enum FilterStatus {
    /// No restriction - an explicit all-clear record
    #[sea_orm(num_value = 0)]
    Cleared,
    /// Target is filtered
    #[sea_orm(num_value = 1)]
    Filtered,
}

/// Filter database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "filters")]
pub struct Model {
    /// Snowflake of the filtered object
    #[sea_orm(primary_key, auto_increment = false)]
    pub target_id: i64,
    /// What kind of object the target is
    pub target_type: TargetType,
    /// Current moderation status
    pub status: FilterStatus,
    /// When the filter lapses, None for an indefinite filter
    pub timeout: Option<DateTimeUtc>,
}

/// Defines relationships between Filter and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
