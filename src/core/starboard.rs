//! Starboard business logic - star tracking, snapshots, and promotion state.
//!
//! Star and unstar events arrive from the gateway out of order and sometimes
//! duplicated, so every mutation here runs inside a single database
//! transaction and lets the schema's unique constraints arbitrate races: the
//! composite primary key on stars rejects duplicate star events, and the
//! conditional update in [`promote`] guarantees a message is linked to at most
//! one starboard post no matter how many handlers race the threshold.

use crate::{
    entities::{MessageStatus, Star, StarredMessage, star, starred_message},
    errors::{Error, Result, is_unique_violation},
};
use sea_orm::sea_query::Expr;
use sea_orm::{Condition, PaginatorTrait, Set, TransactionTrait, prelude::*};

/// Consistent snapshot of a message's star standing, computed inside the same
/// transaction as the mutation that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StarState {
    /// Source message id
    pub message_id: i64,
    /// Star count after the mutation
    pub count: u64,
    /// Lifecycle status of the source message
    pub status: MessageStatus,
    /// Linked starboard post, if the message has been promoted
    pub starboard_message_id: Option<i64>,
}

/// A starred message snapshot together with its live star count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StarEntry {
    /// The stored snapshot
    pub message: starred_message::Model,
    /// Current number of stars
    pub star_count: u64,
}

/// What the caller should do with the starboard post after a star mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromotionAction {
    /// Nothing to do
    None,
    /// Post a new starboard entry, then link it via [`promote`]
    Promote,
    /// The message is already promoted; refresh the posted star count
    Refresh,
}

/// Decides the starboard action for a star count against a guild's threshold.
///
/// Promotion is terminal: once a message is linked to a starboard post, the
/// count dropping back below the threshold only refreshes the post, it never
/// un-promotes. Deleted messages are never newly promoted.
pub fn promotion_action(state: &StarState, threshold: i32) -> PromotionAction {
    if state.starboard_message_id.is_some() {
        return PromotionAction::Refresh;
    }
    if state.status == MessageStatus::Deleted {
        return PromotionAction::None;
    }

    let threshold = u64::try_from(threshold).map_or(1, |t| t.max(1));
    if state.count >= threshold {
        PromotionAction::Promote
    } else {
        PromotionAction::None
    }
}

fn state_from_model(model: &starred_message::Model, count: u64) -> StarState {
    StarState {
        message_id: model.message_id,
        count,
        status: model.status,
        starboard_message_id: model.starboard_message_id,
    }
}

async fn count_stars<C: ConnectionTrait>(db: &C, message_id: i64) -> Result<u64> {
    Star::find()
        .filter(star::Column::MessageId.eq(message_id))
        .count(db)
        .await
        .map_err(Into::into)
}

/// Records a star on a message, creating the content snapshot if this is the
/// first star it has received.
///
/// The snapshot row and the star row are inserted in one transaction, so a
/// starred message can never exist without at least its triggering star.
/// Returns the new [`StarState`]; fails with [`Error::DuplicateStar`] when
/// this starrer has already starred the message (callers treat that as a
/// no-op) and [`Error::NotFound`] when the source message is marked deleted.
#[allow(clippy::too_many_arguments)]
pub async fn record_star(
    db: &DatabaseConnection,
    message_id: i64,
    channel_id: i64,
    author_id: i64,
    author_avatar_hash: Option<String>,
    content: String,
    starrer_id: i64,
) -> Result<StarState> {
    let txn = db.begin().await?;

    let existing = StarredMessage::find_by_id(message_id).one(&txn).await?;
    let message = match existing {
        Some(message) if message.status == MessageStatus::Deleted => {
            return Err(Error::NotFound {
                entity: "starred message",
                id: message_id.to_string(),
            });
        }
        Some(message) => message,
        None => {
            let snapshot = starred_message::ActiveModel {
                message_id: Set(message_id),
                channel_id: Set(channel_id),
                author_id: Set(author_id),
                author_avatar_hash: Set(author_avatar_hash),
                content: Set(content),
                status: Set(MessageStatus::Normal),
                starboard_message_id: Set(None),
            };
            snapshot.insert(&txn).await?
        }
    };

    let star_row = star::ActiveModel {
        message_id: Set(message_id),
        starrer_id: Set(starrer_id),
    };
    if let Err(err) = star_row.insert(&txn).await {
        // The composite primary key arbitrates duplicate star events
        if is_unique_violation(&err) {
            return Err(Error::DuplicateStar {
                message_id,
                starrer_id,
            });
        }
        return Err(err.into());
    }

    let count = count_stars(&txn, message_id).await?;
    txn.commit().await?;

    Ok(state_from_model(&message, count))
}

/// Removes a user's star from a message.
///
/// Reaction-removal events race with message deletion and with each other, so
/// an absent star row is tolerated silently: the returned state simply
/// reflects the unchanged count. Returns `None` when the message was never
/// starred at all.
pub async fn remove_star(
    db: &DatabaseConnection,
    message_id: i64,
    starrer_id: i64,
) -> Result<Option<StarState>> {
    let txn = db.begin().await?;

    let Some(message) = StarredMessage::find_by_id(message_id).one(&txn).await? else {
        return Ok(None);
    };

    Star::delete_many()
        .filter(star::Column::MessageId.eq(message_id))
        .filter(star::Column::StarrerId.eq(starrer_id))
        .exec(&txn)
        .await?;

    let count = count_stars(&txn, message_id).await?;
    txn.commit().await?;

    Ok(Some(state_from_model(&message, count)))
}

/// Retrieves a starred message snapshot with its current star count.
pub async fn get_entry(db: &DatabaseConnection, message_id: i64) -> Result<Option<StarEntry>> {
    let Some(message) = StarredMessage::find_by_id(message_id).one(db).await? else {
        return Ok(None);
    };

    let star_count = count_stars(db, message_id).await?;
    Ok(Some(StarEntry {
        message,
        star_count,
    }))
}

/// Links a message to its starboard post.
///
/// The link is applied with a single conditional UPDATE that only matches when
/// the column is unset or already holds the same post id, so of any number of
/// racing promotions exactly one wins. Returns `false` when the message is
/// already linked to a *different* post - the caller lost the race and should
/// discard the duplicate post it just made. Re-linking the same post id is an
/// idempotent no-op that returns `true`.
pub async fn promote(
    db: &DatabaseConnection,
    message_id: i64,
    starboard_message_id: i64,
) -> Result<bool> {
    let result = StarredMessage::update_many()
        .col_expr(
            starred_message::Column::StarboardMessageId,
            Expr::value(starboard_message_id),
        )
        .filter(starred_message::Column::MessageId.eq(message_id))
        .filter(
            Condition::any()
                .add(starred_message::Column::StarboardMessageId.is_null())
                .add(starred_message::Column::StarboardMessageId.eq(starboard_message_id)),
        )
        .exec(db)
        .await?;

    if result.rows_affected > 0 {
        return Ok(true);
    }

    // No row matched: either the message is unknown or it is already linked
    // to some other starboard post.
    if StarredMessage::find_by_id(message_id).one(db).await?.is_none() {
        return Err(Error::NotFound {
            entity: "starred message",
            id: message_id.to_string(),
        });
    }
    Ok(false)
}

/// Explicitly clears a message's starboard link, allowing re-promotion.
/// Returns whether a link was actually cleared.
pub async fn clear_promotion(db: &DatabaseConnection, message_id: i64) -> Result<bool> {
    let result = StarredMessage::update_many()
        .col_expr(
            starred_message::Column::StarboardMessageId,
            Expr::value(None::<i64>),
        )
        .filter(starred_message::Column::MessageId.eq(message_id))
        .filter(starred_message::Column::StarboardMessageId.is_not_null())
        .exec(db)
        .await?;

    Ok(result.rows_affected > 0)
}

/// Marks a starred message's source as deleted.
///
/// The starboard post (if any) is left in place as a historical record, but
/// future star events on the message are rejected. Returns `false` when the
/// message was never starred - delete events fire for every message.
pub async fn mark_deleted(db: &DatabaseConnection, message_id: i64) -> Result<bool> {
    let result = StarredMessage::update_many()
        .col_expr(
            starred_message::Column::Status,
            Expr::value(MessageStatus::Deleted),
        )
        .filter(starred_message::Column::MessageId.eq(message_id))
        .exec(db)
        .await?;

    Ok(result.rows_affected > 0)
}

/// Marks a starred message's source as edited.
///
/// The content snapshot is deliberately left at its first-star value. A
/// Deleted status is never downgraded - edit events can arrive after the
/// delete event for the same message.
pub async fn mark_edited(db: &DatabaseConnection, message_id: i64) -> Result<bool> {
    let result = StarredMessage::update_many()
        .col_expr(
            starred_message::Column::Status,
            Expr::value(MessageStatus::Edited),
        )
        .filter(starred_message::Column::MessageId.eq(message_id))
        .filter(starred_message::Column::Status.eq(MessageStatus::Normal))
        .exec(db)
        .await?;

    Ok(result.rows_affected > 0)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::{setup_test_db, star_message};

    #[tokio::test]
    async fn test_first_star_creates_snapshot() -> Result<()> {
        let db = setup_test_db().await?;

        let state = star_message(&db, 100, 7).await?;
        assert_eq!(state.count, 1);
        assert_eq!(state.status, MessageStatus::Normal);
        assert!(state.starboard_message_id.is_none());

        let entry = get_entry(&db, 100).await?.unwrap();
        assert_eq!(entry.message.content, "Test message content");
        assert_eq!(entry.star_count, 1);

        Ok(())
    }

    #[tokio::test]
    async fn test_duplicate_star_rejected() -> Result<()> {
        let db = setup_test_db().await?;

        star_message(&db, 100, 7).await?;
        let result = star_message(&db, 100, 7).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::DuplicateStar {
                message_id: 100,
                starrer_id: 7
            }
        ));

        // Exactly one star row survives
        let entry = get_entry(&db, 100).await?.unwrap();
        assert_eq!(entry.star_count, 1);

        Ok(())
    }

    #[tokio::test]
    async fn test_star_then_unstar_restores_count() -> Result<()> {
        let db = setup_test_db().await?;

        star_message(&db, 100, 7).await?;
        let after_second = star_message(&db, 100, 8).await?;
        assert_eq!(after_second.count, 2);

        let after_removal = remove_star(&db, 100, 8).await?.unwrap();
        assert_eq!(after_removal.count, 1);

        Ok(())
    }

    #[tokio::test]
    async fn test_remove_star_tolerates_missing_row() -> Result<()> {
        let db = setup_test_db().await?;

        star_message(&db, 100, 7).await?;

        // User 9 never starred this message
        let state = remove_star(&db, 100, 9).await?.unwrap();
        assert_eq!(state.count, 1);

        // Message 200 was never starred at all
        assert!(remove_star(&db, 200, 7).await?.is_none());

        Ok(())
    }

    #[tokio::test]
    async fn test_promote_applies_once() -> Result<()> {
        let db = setup_test_db().await?;

        star_message(&db, 100, 7).await?;

        assert!(promote(&db, 100, 9000).await?);
        // Same post id is an idempotent no-op
        assert!(promote(&db, 100, 9000).await?);
        // A different post id means the caller lost the race
        assert!(!promote(&db, 100, 9001).await?);

        let entry = get_entry(&db, 100).await?.unwrap();
        assert_eq!(entry.message.starboard_message_id, Some(9000));

        Ok(())
    }

    #[tokio::test]
    async fn test_promote_unknown_message() -> Result<()> {
        let db = setup_test_db().await?;

        let result = promote(&db, 999, 9000).await;
        assert!(matches!(result.unwrap_err(), Error::NotFound { .. }));

        Ok(())
    }

    #[tokio::test]
    async fn test_clear_promotion_allows_relink() -> Result<()> {
        let db = setup_test_db().await?;

        star_message(&db, 100, 7).await?;
        assert!(promote(&db, 100, 9000).await?);

        assert!(clear_promotion(&db, 100).await?);
        assert!(!clear_promotion(&db, 100).await?);

        assert!(promote(&db, 100, 9001).await?);

        Ok(())
    }

    #[tokio::test]
    async fn test_deleted_message_rejects_new_stars() -> Result<()> {
        let db = setup_test_db().await?;

        star_message(&db, 100, 7).await?;
        assert!(mark_deleted(&db, 100).await?);

        let result = star_message(&db, 100, 8).await;
        assert!(matches!(result.unwrap_err(), Error::NotFound { .. }));

        // Removing an existing star still works after deletion
        let state = remove_star(&db, 100, 7).await?.unwrap();
        assert_eq!(state.count, 0);

        Ok(())
    }

    #[tokio::test]
    async fn test_mark_deleted_unknown_message() -> Result<()> {
        let db = setup_test_db().await?;
        assert!(!mark_deleted(&db, 999).await?);
        Ok(())
    }

    #[tokio::test]
    async fn test_mark_edited_does_not_downgrade_deleted() -> Result<()> {
        let db = setup_test_db().await?;

        star_message(&db, 100, 7).await?;
        assert!(mark_edited(&db, 100).await?);
        let entry = get_entry(&db, 100).await?.unwrap();
        assert_eq!(entry.message.status, MessageStatus::Edited);
        // Snapshot content is untouched
        assert_eq!(entry.message.content, "Test message content");

        assert!(mark_deleted(&db, 100).await?);
        assert!(!mark_edited(&db, 100).await?);
        let entry = get_entry(&db, 100).await?.unwrap();
        assert_eq!(entry.message.status, MessageStatus::Deleted);

        Ok(())
    }

    #[test]
    fn test_promotion_action_threshold_crossing() {
        let mut state = StarState {
            message_id: 100,
            count: 2,
            status: MessageStatus::Normal,
            starboard_message_id: None,
        };
        assert_eq!(promotion_action(&state, 3), PromotionAction::None);

        state.count = 3;
        assert_eq!(promotion_action(&state, 3), PromotionAction::Promote);

        state.count = 10;
        assert_eq!(promotion_action(&state, 3), PromotionAction::Promote);
    }

    #[test]
    fn test_promotion_is_terminal() {
        // Already-promoted messages only ever refresh, even below threshold
        let state = StarState {
            message_id: 100,
            count: 1,
            status: MessageStatus::Normal,
            starboard_message_id: Some(9000),
        };
        assert_eq!(promotion_action(&state, 3), PromotionAction::Refresh);
    }

    #[test]
    fn test_promotion_action_skips_deleted() {
        let state = StarState {
            message_id: 100,
            count: 10,
            status: MessageStatus::Deleted,
            starboard_message_id: None,
        };
        assert_eq!(promotion_action(&state, 3), PromotionAction::None);
    }

    #[test]
    fn test_promotion_action_clamps_bad_threshold() {
        let state = StarState {
            message_id: 100,
            count: 1,
            status: MessageStatus::Normal,
            starboard_message_id: None,
        };
        // A nonsensical threshold behaves like 1, never promote-on-zero
        assert_eq!(promotion_action(&state, 0), PromotionAction::Promote);
        assert_eq!(promotion_action(&state, -5), PromotionAction::Promote);
    }
}
