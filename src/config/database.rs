//! Database configuration module for `Stargazer`.
//!
//! This module handles `SQLite` database connection and table creation using `SeaORM`.
//! Tables are generated from the entity definitions via `Schema::create_table_from_entity`,
//! so the stored schema always matches the Rust structs without hand-written SQL.
//! The one statement that cannot be derived from an entity - the unique index over
//! `(guild_id, name)` on tags - is created explicitly alongside the tables.

use crate::entities::{Filter, Guild, GuildBan, Star, StarredMessage, Tag, UserBan, tag};
use crate::errors::Result;
use sea_orm::sea_query::Index;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema};

/// Gets the database URL from environment variable or returns default `SQLite` path.
pub fn get_database_url() -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://data/stargazer.sqlite".to_string())
}

/// Establishes a connection to the `SQLite` database using the `DATABASE_URL`
/// environment variable, falling back to a default local `SQLite` file.
pub async fn create_connection() -> Result<DatabaseConnection> {
    Database::connect(get_database_url()).await.map_err(Into::into)
}

/// Creates all necessary database tables using `SeaORM`'s schema generation
/// from entity definitions.
///
/// Parent tables come first so the generated foreign keys (stars referencing
/// starred messages, tags referencing guilds) resolve.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let guild_table = schema.create_table_from_entity(Guild);
    let starred_message_table = schema.create_table_from_entity(StarredMessage);
    let star_table = schema.create_table_from_entity(Star);
    let user_ban_table = schema.create_table_from_entity(UserBan);
    let guild_ban_table = schema.create_table_from_entity(GuildBan);
    let tag_table = schema.create_table_from_entity(Tag);
    let filter_table = schema.create_table_from_entity(Filter);

    db.execute(builder.build(&guild_table)).await?;
    db.execute(builder.build(&starred_message_table)).await?;
    db.execute(builder.build(&star_table)).await?;
    db.execute(builder.build(&user_ban_table)).await?;
    db.execute(builder.build(&guild_ban_table)).await?;
    db.execute(builder.build(&tag_table)).await?;
    db.execute(builder.build(&filter_table)).await?;

    // Tag names are unique per guild; this index is the arbiter for racing creates.
    let tag_name_index = Index::create()
        .name("idx_tags_guild_id_name")
        .table(Tag)
        .col(tag::Column::GuildId)
        .col(tag::Column::Name)
        .unique()
        .to_owned();
    db.execute(builder.build(&tag_name_index)).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{
        filter::Model as FilterModel, guild::Model as GuildModel,
        guild_ban::Model as GuildBanModel, star::Model as StarModel,
        starred_message::Model as StarredMessageModel, tag::Model as TagModel,
        user_ban::Model as UserBanModel,
    };
    use sea_orm::{EntityTrait, QuerySelect};

    #[tokio::test]
    async fn test_create_tables() -> Result<()> {
        let db = Database::connect("sqlite::memory:").await?;
        create_tables(&db).await?;

        // Test that tables exist by querying them
        let _: Vec<GuildModel> = Guild::find().limit(1).all(&db).await?;
        let _: Vec<StarredMessageModel> = StarredMessage::find().limit(1).all(&db).await?;
        let _: Vec<StarModel> = Star::find().limit(1).all(&db).await?;
        let _: Vec<UserBanModel> = UserBan::find().limit(1).all(&db).await?;
        let _: Vec<GuildBanModel> = GuildBan::find().limit(1).all(&db).await?;
        let _: Vec<TagModel> = Tag::find().limit(1).all(&db).await?;
        let _: Vec<FilterModel> = Filter::find().limit(1).all(&db).await?;

        Ok(())
    }

    #[tokio::test]
    async fn test_default_database_url_fallback() {
        // Only assert the fallback shape; CI may or may not set DATABASE_URL
        let url = get_database_url();
        assert!(url.starts_with("sqlite:"));
    }
}
