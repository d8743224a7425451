//! Moderation business logic - bot-side bans and filters.
//!
//! Bans and filters are authoritative by their expiry timestamp, evaluated at
//! read time. A row whose `expires_at`/`timeout` has passed reads as inactive
//! immediately; [`purge_expired`] MAY be called opportunistically to delete
//! such rows but nothing depends on it.

use crate::{
    entities::{Filter, FilterStatus, GuildBan, TargetType, UserBan, filter, guild_ban, user_ban},
    errors::Result,
};
use chrono::Utc;
use sea_orm::sea_query::OnConflict;
use sea_orm::{Set, prelude::*};

fn is_active(expires_at: Option<DateTimeUtc>, now: DateTimeUtc) -> bool {
    expires_at.is_none_or(|at| at > now)
}

/// Bans a user from interacting with the bot.
///
/// Upsert semantics: banning an already-banned user overwrites the stored
/// reason and expiry.
pub async fn ban_user(
    db: &DatabaseConnection,
    user_id: i64,
    reason: String,
    expires_at: Option<DateTimeUtc>,
) -> Result<user_ban::Model> {
    let ban = user_ban::ActiveModel {
        user_id: Set(user_id),
        reason: Set(reason),
        expires_at: Set(expires_at),
    };

    UserBan::insert(ban)
        .on_conflict(
            OnConflict::column(user_ban::Column::UserId)
                .update_columns([user_ban::Column::Reason, user_ban::Column::ExpiresAt])
                .to_owned(),
        )
        .exec_with_returning(db)
        .await
        .map_err(Into::into)
}

/// Bans a whole guild from interacting with the bot. Upsert semantics.
pub async fn ban_guild(
    db: &DatabaseConnection,
    guild_id: i64,
    reason: String,
    expires_at: Option<DateTimeUtc>,
) -> Result<guild_ban::Model> {
    let ban = guild_ban::ActiveModel {
        guild_id: Set(guild_id),
        reason: Set(reason),
        expires_at: Set(expires_at),
    };

    GuildBan::insert(ban)
        .on_conflict(
            OnConflict::column(guild_ban::Column::GuildId)
                .update_columns([guild_ban::Column::Reason, guild_ban::Column::ExpiresAt])
                .to_owned(),
        )
        .exec_with_returning(db)
        .await
        .map_err(Into::into)
}

/// Whether a user is banned at the given instant.
/// An expired row reads as not banned even before cleanup removes it.
pub async fn is_user_banned_at(
    db: &DatabaseConnection,
    user_id: i64,
    now: DateTimeUtc,
) -> Result<bool> {
    let ban = UserBan::find_by_id(user_id).one(db).await?;
    Ok(ban.is_some_and(|b| is_active(b.expires_at, now)))
}

/// Whether a user is currently banned from the bot.
pub async fn is_user_banned(db: &DatabaseConnection, user_id: i64) -> Result<bool> {
    is_user_banned_at(db, user_id, Utc::now()).await
}

/// Whether a guild is banned at the given instant.
pub async fn is_guild_banned_at(
    db: &DatabaseConnection,
    guild_id: i64,
    now: DateTimeUtc,
) -> Result<bool> {
    let ban = GuildBan::find_by_id(guild_id).one(db).await?;
    Ok(ban.is_some_and(|b| is_active(b.expires_at, now)))
}

/// Whether a guild is currently banned from the bot.
pub async fn is_guild_banned(db: &DatabaseConnection, guild_id: i64) -> Result<bool> {
    is_guild_banned_at(db, guild_id, Utc::now()).await
}

/// Lifts a user ban. Returns `false` (not an error) when no ban existed.
pub async fn unban_user(db: &DatabaseConnection, user_id: i64) -> Result<bool> {
    let result = UserBan::delete_by_id(user_id).exec(db).await?;
    Ok(result.rows_affected > 0)
}

/// Lifts a guild ban. Returns `false` (not an error) when no ban existed.
pub async fn unban_guild(db: &DatabaseConnection, guild_id: i64) -> Result<bool> {
    let result = GuildBan::delete_by_id(guild_id).exec(db).await?;
    Ok(result.rows_affected > 0)
}

/// Opportunistically deletes ban rows whose expiry has passed.
/// Returns the number of rows removed. Correctness never depends on this.
pub async fn purge_expired(db: &DatabaseConnection, now: DateTimeUtc) -> Result<u64> {
    let users = UserBan::delete_many()
        .filter(user_ban::Column::ExpiresAt.is_not_null())
        .filter(user_ban::Column::ExpiresAt.lte(now))
        .exec(db)
        .await?;
    let guilds = GuildBan::delete_many()
        .filter(guild_ban::Column::ExpiresAt.is_not_null())
        .filter(guild_ban::Column::ExpiresAt.lte(now))
        .exec(db)
        .await?;

    Ok(users.rows_affected + guilds.rows_affected)
}

/// Sets (or overwrites) the filter record for a target.
pub async fn set_filter(
    db: &DatabaseConnection,
    target_id: i64,
    target_type: TargetType,
    status: FilterStatus,
    timeout: Option<DateTimeUtc>,
) -> Result<filter::Model> {
    let record = filter::ActiveModel {
        target_id: Set(target_id),
        target_type: Set(target_type),
        status: Set(status),
        timeout: Set(timeout),
    };

    Filter::insert(record)
        .on_conflict(
            OnConflict::column(filter::Column::TargetId)
                .update_columns([
                    filter::Column::TargetType,
                    filter::Column::Status,
                    filter::Column::Timeout,
                ])
                .to_owned(),
        )
        .exec_with_returning(db)
        .await
        .map_err(Into::into)
}

/// Retrieves the filter record for a target, if one is in effect.
/// A filter whose timeout has passed reads as absent.
pub async fn get_filter(db: &DatabaseConnection, target_id: i64) -> Result<Option<filter::Model>> {
    let record = Filter::find_by_id(target_id).one(db).await?;
    Ok(record.filter(|f| is_active(f.timeout, Utc::now())))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::setup_test_db;
    use chrono::Duration;

    #[tokio::test]
    async fn test_ban_and_unban_user() -> Result<()> {
        let db = setup_test_db().await?;

        ban_user(&db, 42, "spam".to_string(), None).await?;
        assert!(is_user_banned(&db, 42).await?);
        assert!(!is_user_banned(&db, 43).await?);

        assert!(unban_user(&db, 42).await?);
        assert!(!is_user_banned(&db, 42).await?);

        // Unban of an absent row is a no-op, not an error
        assert!(!unban_user(&db, 42).await?);

        Ok(())
    }

    #[tokio::test]
    async fn test_ban_upsert_overwrites() -> Result<()> {
        let db = setup_test_db().await?;

        ban_user(&db, 42, "spam".to_string(), None).await?;
        let expiry = Utc::now() + Duration::days(7);
        let updated = ban_user(&db, 42, "spam again".to_string(), Some(expiry)).await?;

        assert_eq!(updated.reason, "spam again");
        assert_eq!(updated.expires_at, Some(expiry));

        Ok(())
    }

    #[tokio::test]
    async fn test_expired_ban_reads_inactive() -> Result<()> {
        let db = setup_test_db().await?;

        let past = Utc::now() - Duration::hours(1);
        ban_user(&db, 42, "timeout".to_string(), Some(past)).await?;

        // No cleanup pass has run, but the ban already reads as inactive
        assert!(!is_user_banned(&db, 42).await?);

        let future = Utc::now() + Duration::hours(1);
        ban_user(&db, 42, "timeout".to_string(), Some(future)).await?;
        assert!(is_user_banned(&db, 42).await?);

        Ok(())
    }

    #[tokio::test]
    async fn test_guild_ban_expiry() -> Result<()> {
        let db = setup_test_db().await?;

        ban_guild(&db, 9, "raid hub".to_string(), None).await?;
        assert!(is_guild_banned(&db, 9).await?);

        let past = Utc::now() - Duration::minutes(5);
        ban_guild(&db, 9, "raid hub".to_string(), Some(past)).await?;
        assert!(!is_guild_banned(&db, 9).await?);

        assert!(unban_guild(&db, 9).await?);
        assert!(!unban_guild(&db, 9).await?);

        Ok(())
    }

    #[tokio::test]
    async fn test_purge_expired_removes_only_lapsed_rows() -> Result<()> {
        let db = setup_test_db().await?;
        let now = Utc::now();

        ban_user(&db, 1, "permanent".to_string(), None).await?;
        ban_user(&db, 2, "lapsed".to_string(), Some(now - Duration::hours(1))).await?;
        ban_guild(&db, 3, "lapsed".to_string(), Some(now - Duration::hours(2))).await?;

        assert_eq!(purge_expired(&db, now).await?, 2);
        assert!(is_user_banned(&db, 1).await?);
        assert!(UserBan::find_by_id(2).one(&db).await?.is_none());

        Ok(())
    }

    #[tokio::test]
    async fn test_filter_set_get_and_timeout() -> Result<()> {
        let db = setup_test_db().await?;

        set_filter(&db, 77, TargetType::Channel, FilterStatus::Filtered, None).await?;
        let record = get_filter(&db, 77).await?.unwrap();
        assert_eq!(record.status, FilterStatus::Filtered);
        assert_eq!(record.target_type, TargetType::Channel);

        assert!(get_filter(&db, 78).await?.is_none());

        // Upsert overwrites status in place
        set_filter(&db, 77, TargetType::Channel, FilterStatus::Cleared, None).await?;
        let record = get_filter(&db, 77).await?.unwrap();
        assert_eq!(record.status, FilterStatus::Cleared);

        // A lapsed timeout reads as no filter at all
        let past = Utc::now() - Duration::minutes(1);
        set_filter(&db, 77, TargetType::Channel, FilterStatus::Filtered, Some(past)).await?;
        assert!(get_filter(&db, 77).await?.is_none());

        Ok(())
    }
}
