//! Guild configuration business logic.
//!
//! One row per guild, created lazily on the first configuration command.
//! Thresholds and channel ids are per-guild rows rather than process globals,
//! so the repositories stay stateless and testable in isolation. Guild rows
//! are never hard-deleted; turning the bot off soft-disables the row.

use crate::{
    entities::{Guild, guild},
    errors::{Error, Result},
};
use sea_orm::{Set, prelude::*};

/// Finds a guild's configuration row.
pub async fn get_guild(db: &DatabaseConnection, guild_id: i64) -> Result<Option<guild::Model>> {
    Guild::find_by_id(guild_id).one(db).await.map_err(Into::into)
}

/// Fetches a guild's configuration row, creating it with defaults when this
/// is the first time the guild is configured. Idempotent.
pub async fn ensure_guild(
    db: &DatabaseConnection,
    guild_id: i64,
    default_threshold: i32,
) -> Result<guild::Model> {
    if let Some(existing) = get_guild(db, guild_id).await? {
        return Ok(existing);
    }

    let model = guild::ActiveModel {
        id: Set(guild_id),
        starboard_channel_id: Set(None),
        star_threshold: Set(default_threshold.max(1)),
        log_members: Set(false),
        member_join_log: Set(None),
        message_spam_system: Set(false),
        is_disabled: Set(false),
    };
    model.insert(db).await.map_err(Into::into)
}

async fn update_guild(
    db: &DatabaseConnection,
    guild_id: i64,
    default_threshold: i32,
    apply: impl FnOnce(&mut guild::ActiveModel),
) -> Result<guild::Model> {
    let mut active: guild::ActiveModel = ensure_guild(db, guild_id, default_threshold)
        .await?
        .into();
    apply(&mut active);
    active.update(db).await.map_err(Into::into)
}

/// Sets the channel starboard posts are sent to.
pub async fn set_starboard_channel(
    db: &DatabaseConnection,
    guild_id: i64,
    channel_id: i64,
    default_threshold: i32,
) -> Result<guild::Model> {
    update_guild(db, guild_id, default_threshold, |g| {
        g.starboard_channel_id = Set(Some(channel_id));
    })
    .await
}

/// Sets the star count at which messages get promoted.
/// Thresholds below 1 are rejected.
pub async fn set_star_threshold(
    db: &DatabaseConnection,
    guild_id: i64,
    threshold: i32,
    default_threshold: i32,
) -> Result<guild::Model> {
    if threshold < 1 {
        return Err(Error::Config {
            message: format!("Star threshold must be at least 1, got {threshold}"),
        });
    }

    update_guild(db, guild_id, default_threshold, |g| {
        g.star_threshold = Set(threshold);
    })
    .await
}

/// Toggles member join/leave logging and sets its log channel.
pub async fn set_member_logging(
    db: &DatabaseConnection,
    guild_id: i64,
    enabled: bool,
    log_channel: Option<i64>,
    default_threshold: i32,
) -> Result<guild::Model> {
    update_guild(db, guild_id, default_threshold, |g| {
        g.log_members = Set(enabled);
        g.member_join_log = Set(log_channel);
    })
    .await
}

/// Toggles the message spam detection system.
pub async fn set_spam_system(
    db: &DatabaseConnection,
    guild_id: i64,
    enabled: bool,
    default_threshold: i32,
) -> Result<guild::Model> {
    update_guild(db, guild_id, default_threshold, |g| {
        g.message_spam_system = Set(enabled);
    })
    .await
}

/// Soft-disables the bot for a guild. The row and its settings survive.
pub async fn disable_guild(
    db: &DatabaseConnection,
    guild_id: i64,
    default_threshold: i32,
) -> Result<guild::Model> {
    update_guild(db, guild_id, default_threshold, |g| {
        g.is_disabled = Set(true);
    })
    .await
}

/// Re-enables the bot for a previously disabled guild.
pub async fn enable_guild(
    db: &DatabaseConnection,
    guild_id: i64,
    default_threshold: i32,
) -> Result<guild::Model> {
    update_guild(db, guild_id, default_threshold, |g| {
        g.is_disabled = Set(false);
    })
    .await
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::setup_test_db;

    #[tokio::test]
    async fn test_ensure_guild_idempotent() -> Result<()> {
        let db = setup_test_db().await?;

        let first = ensure_guild(&db, 1, 3).await?;
        assert_eq!(first.star_threshold, 3);
        assert!(first.starboard_channel_id.is_none());
        assert!(!first.is_disabled);

        // Second call returns the existing row, defaults do not reapply
        set_star_threshold(&db, 1, 5, 3).await?;
        let again = ensure_guild(&db, 1, 3).await?;
        assert_eq!(again.star_threshold, 5);

        Ok(())
    }

    #[tokio::test]
    async fn test_set_starboard_channel_creates_row() -> Result<()> {
        let db = setup_test_db().await?;

        let updated = set_starboard_channel(&db, 1, 555, 3).await?;
        assert_eq!(updated.starboard_channel_id, Some(555));
        assert_eq!(updated.star_threshold, 3);

        // Reconfiguring moves the starboard
        let moved = set_starboard_channel(&db, 1, 556, 3).await?;
        assert_eq!(moved.starboard_channel_id, Some(556));

        Ok(())
    }

    #[tokio::test]
    async fn test_threshold_validation() -> Result<()> {
        let db = setup_test_db().await?;

        let result = set_star_threshold(&db, 1, 0, 3).await;
        assert!(matches!(result.unwrap_err(), Error::Config { .. }));

        let updated = set_star_threshold(&db, 1, 7, 3).await?;
        assert_eq!(updated.star_threshold, 7);

        Ok(())
    }

    #[tokio::test]
    async fn test_moderation_toggles() -> Result<()> {
        let db = setup_test_db().await?;

        let updated = set_member_logging(&db, 1, true, Some(777), 3).await?;
        assert!(updated.log_members);
        assert_eq!(updated.member_join_log, Some(777));

        let updated = set_spam_system(&db, 1, true, 3).await?;
        assert!(updated.message_spam_system);

        Ok(())
    }

    #[tokio::test]
    async fn test_disable_is_soft() -> Result<()> {
        let db = setup_test_db().await?;

        set_starboard_channel(&db, 1, 555, 3).await?;
        let disabled = disable_guild(&db, 1, 3).await?;
        assert!(disabled.is_disabled);
        // Settings survive the disable
        assert_eq!(disabled.starboard_channel_id, Some(555));

        let enabled = enable_guild(&db, 1, 3).await?;
        assert!(!enabled.is_disabled);

        Ok(())
    }
}
