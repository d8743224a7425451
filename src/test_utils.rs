//! Shared test utilities for `Stargazer`.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test entities with sensible defaults.

use crate::{
    core::{guilds, starboard, tags},
    entities,
    errors::Result,
};
use sea_orm::DatabaseConnection;

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Creates a guild configuration row with default settings.
///
/// Tags carry a foreign key to guilds, so tag tests need this first.
pub async fn setup_test_guild(
    db: &DatabaseConnection,
    guild_id: i64,
) -> Result<entities::guild::Model> {
    guilds::ensure_guild(db, guild_id, 3).await
}

/// Stars a message with snapshot defaults, creating the starred-message row
/// on first use.
///
/// # Defaults
/// * `channel_id`: 555
/// * `author_id`: 42
/// * `author_avatar_hash`: `Some("a_avatar")`
/// * `content`: `"Test message content"`
pub async fn star_message(
    db: &DatabaseConnection,
    message_id: i64,
    starrer_id: i64,
) -> Result<starboard::StarState> {
    starboard::record_star(
        db,
        message_id,
        555,
        42,
        Some("a_avatar".to_string()),
        "Test message content".to_string(),
        starrer_id,
    )
    .await
}

/// Creates a test tag with sensible defaults.
///
/// # Defaults
/// * `content`: `"Test tag content"`
/// * `author_id`: 7
pub async fn create_test_tag(
    db: &DatabaseConnection,
    guild_id: i64,
    name: &str,
) -> Result<entities::tag::Model> {
    tags::create_tag(db, guild_id, name, "Test tag content".to_string(), 7).await
}

/// Sets up a complete test environment with a configured guild.
/// Returns (db, guild) for common test scenarios.
pub async fn setup_with_guild() -> Result<(DatabaseConnection, entities::guild::Model)> {
    let db = setup_test_db().await?;
    let guild = setup_test_guild(&db, 1).await?;
    Ok((db, guild))
}
