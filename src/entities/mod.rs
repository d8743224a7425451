//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod filter;
pub mod guild;
pub mod guild_ban;
pub mod star;
pub mod starred_message;
pub mod tag;
pub mod user_ban;

// Re-export specific types to avoid conflicts
pub use filter::{
    Column as FilterColumn, Entity as Filter, FilterStatus, Model as FilterModel, TargetType,
};
pub use guild::{Column as GuildColumn, Entity as Guild, Model as GuildModel};
pub use guild_ban::{Column as GuildBanColumn, Entity as GuildBan, Model as GuildBanModel};
pub use star::{Column as StarColumn, Entity as Star, Model as StarModel};
pub use starred_message::{
    Column as StarredMessageColumn, Entity as StarredMessage, MessageStatus,
    Model as StarredMessageModel,
};
pub use tag::{Column as TagColumn, Entity as Tag, Model as TagModel};
pub use user_ban::{Column as UserBanColumn, Entity as UserBan, Model as UserBanModel};
