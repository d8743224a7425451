//! Tag business logic - guild-scoped named content snippets.
//!
//! Uniqueness of `(guild_id, name)` is enforced by the database index, so
//! racing creates (or renames onto the same name) get exactly one winner and
//! the loser surfaces [`Error::DuplicateTag`]. Ownership checks live here;
//! whether a requester holds elevated Discord privilege is the caller's
//! concern, exposed through the `force_` variants and [`is_author`].

use crate::{
    entities::{Tag, tag},
    errors::{Error, Result, is_unique_violation},
};
use sea_orm::sea_query::Expr;
use sea_orm::{QueryOrder, Set, prelude::*};

fn normalize_name(name: &str) -> Result<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(Error::Config {
            message: "Tag name cannot be empty".to_string(),
        });
    }
    Ok(trimmed.to_string())
}

async fn find_tag<C: ConnectionTrait>(
    db: &C,
    guild_id: i64,
    name: &str,
) -> Result<Option<tag::Model>> {
    Tag::find()
        .filter(tag::Column::GuildId.eq(guild_id))
        .filter(tag::Column::Name.eq(name))
        .one(db)
        .await
        .map_err(Into::into)
}

fn require_author(model: &tag::Model, requester_id: i64, action: &'static str) -> Result<()> {
    if model.author_id == requester_id {
        Ok(())
    } else {
        Err(Error::Forbidden {
            user_id: requester_id,
            action,
        })
    }
}

/// Creates a new tag in a guild.
///
/// Fails with [`Error::DuplicateTag`] when the name is already taken in this
/// guild; the same name in a different guild is fine.
pub async fn create_tag(
    db: &DatabaseConnection,
    guild_id: i64,
    name: &str,
    content: String,
    author_id: i64,
) -> Result<tag::Model> {
    let name = normalize_name(name)?;

    let model = tag::ActiveModel {
        guild_id: Set(guild_id),
        name: Set(name.clone()),
        content: Set(content),
        author_id: Set(author_id),
        created_at: Set(chrono::Utc::now()),
        uses: Set(0),
        ..Default::default()
    };

    match model.insert(db).await {
        Ok(created) => Ok(created),
        Err(err) if is_unique_violation(&err) => Err(Error::DuplicateTag { guild_id, name }),
        Err(err) => Err(err.into()),
    }
}

/// Finds a tag by name within a guild.
pub async fn get_tag(
    db: &DatabaseConnection,
    guild_id: i64,
    name: &str,
) -> Result<Option<tag::Model>> {
    find_tag(db, guild_id, name.trim()).await
}

/// Retrieves all tags in a guild, ordered alphabetically by name.
pub async fn list_tags(db: &DatabaseConnection, guild_id: i64) -> Result<Vec<tag::Model>> {
    Tag::find()
        .filter(tag::Column::GuildId.eq(guild_id))
        .order_by_asc(tag::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Whether `user_id` authored the named tag. Absent tags read as not-author.
pub async fn is_author(
    db: &DatabaseConnection,
    guild_id: i64,
    name: &str,
    user_id: i64,
) -> Result<bool> {
    let found = find_tag(db, guild_id, name.trim()).await?;
    Ok(found.is_some_and(|t| t.author_id == user_id))
}

/// Invokes a tag, incrementing its usage counter atomically.
///
/// The increment is a single `uses = uses + 1` UPDATE at the store, never a
/// read-modify-write in process, so concurrent invocations all count.
pub async fn use_tag(db: &DatabaseConnection, guild_id: i64, name: &str) -> Result<tag::Model> {
    let name = name.trim();

    let updated = Tag::update_many()
        .col_expr(tag::Column::Uses, Expr::col(tag::Column::Uses).add(1))
        .filter(tag::Column::GuildId.eq(guild_id))
        .filter(tag::Column::Name.eq(name))
        .exec(db)
        .await?;

    if updated.rows_affected == 0 {
        return Err(Error::NotFound {
            entity: "tag",
            id: name.to_string(),
        });
    }

    find_tag(db, guild_id, name).await?.ok_or(Error::NotFound {
        entity: "tag",
        id: name.to_string(),
    })
}

/// Deletes a tag. Fails with [`Error::Forbidden`] unless the requester is the
/// tag's author; callers that verified elevated privilege use
/// [`force_delete_tag`] instead.
pub async fn delete_tag(
    db: &DatabaseConnection,
    guild_id: i64,
    name: &str,
    requester_id: i64,
) -> Result<()> {
    let name = name.trim();
    let model = find_tag(db, guild_id, name).await?.ok_or(Error::NotFound {
        entity: "tag",
        id: name.to_string(),
    })?;
    require_author(&model, requester_id, "delete this tag")?;

    Tag::delete_by_id(model.id).exec(db).await?;
    Ok(())
}

/// Deletes a tag without an authorship check. The caller has already verified
/// elevated privilege with Discord.
pub async fn force_delete_tag(db: &DatabaseConnection, guild_id: i64, name: &str) -> Result<()> {
    let name = name.trim();
    let model = find_tag(db, guild_id, name).await?.ok_or(Error::NotFound {
        entity: "tag",
        id: name.to_string(),
    })?;

    Tag::delete_by_id(model.id).exec(db).await?;
    Ok(())
}

/// Renames a tag. Same ownership rule as delete, same uniqueness rule as create.
pub async fn rename_tag(
    db: &DatabaseConnection,
    guild_id: i64,
    name: &str,
    new_name: &str,
    requester_id: i64,
) -> Result<tag::Model> {
    let new_name = normalize_name(new_name)?;
    let name = name.trim();

    let model = find_tag(db, guild_id, name).await?.ok_or(Error::NotFound {
        entity: "tag",
        id: name.to_string(),
    })?;
    require_author(&model, requester_id, "rename this tag")?;

    let mut active: tag::ActiveModel = model.into();
    active.name = Set(new_name.clone());
    match active.update(db).await {
        Ok(updated) => Ok(updated),
        Err(err) if is_unique_violation(&err) => Err(Error::DuplicateTag {
            guild_id,
            name: new_name,
        }),
        Err(err) => Err(err.into()),
    }
}

/// Replaces a tag's content. Author-only, like delete and rename.
pub async fn edit_tag_content(
    db: &DatabaseConnection,
    guild_id: i64,
    name: &str,
    new_content: String,
    requester_id: i64,
) -> Result<tag::Model> {
    let name = name.trim();

    let model = find_tag(db, guild_id, name).await?.ok_or(Error::NotFound {
        entity: "tag",
        id: name.to_string(),
    })?;
    require_author(&model, requester_id, "edit this tag")?;

    let mut active: tag::ActiveModel = model.into();
    active.content = Set(new_content);
    active.update(db).await.map_err(Into::into)
}

/// Resets a tag's usage counter to zero - the only sanctioned decrement.
pub async fn reset_tag_uses(
    db: &DatabaseConnection,
    guild_id: i64,
    name: &str,
    requester_id: i64,
) -> Result<tag::Model> {
    let name = name.trim();

    let model = find_tag(db, guild_id, name).await?.ok_or(Error::NotFound {
        entity: "tag",
        id: name.to_string(),
    })?;
    require_author(&model, requester_id, "reset this tag")?;

    let mut active: tag::ActiveModel = model.into();
    active.uses = Set(0);
    active.update(db).await.map_err(Into::into)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::{create_test_tag, setup_test_guild, setup_with_guild};

    #[tokio::test]
    async fn test_create_tag_validation() -> Result<()> {
        let (db, _guild) = setup_with_guild().await?;

        let result = create_tag(&db, 1, "", "content".to_string(), 7).await;
        assert!(matches!(result.unwrap_err(), Error::Config { .. }));

        let result = create_tag(&db, 1, "   ", "content".to_string(), 7).await;
        assert!(matches!(result.unwrap_err(), Error::Config { .. }));

        // Names are stored trimmed
        let created = create_tag(&db, 1, "  foo  ", "content".to_string(), 7).await?;
        assert_eq!(created.name, "foo");

        Ok(())
    }

    #[tokio::test]
    async fn test_tag_names_scope_per_guild() -> Result<()> {
        let (db, _guild) = setup_with_guild().await?;
        setup_test_guild(&db, 2).await?;

        create_tag(&db, 1, "foo", "first".to_string(), 7).await?;

        // Same name in another guild is fine
        create_tag(&db, 2, "foo", "second".to_string(), 7).await?;

        // Same name in the same guild is not
        let result = create_tag(&db, 1, "foo", "third".to_string(), 8).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::DuplicateTag { guild_id: 1, .. }
        ));

        Ok(())
    }

    #[tokio::test]
    async fn test_use_tag_increments() -> Result<()> {
        let (db, _guild) = setup_with_guild().await?;
        create_test_tag(&db, 1, "foo").await?;

        let used = use_tag(&db, 1, "foo").await?;
        assert_eq!(used.uses, 1);
        let used = use_tag(&db, 1, "foo").await?;
        assert_eq!(used.uses, 2);

        let result = use_tag(&db, 1, "missing").await;
        assert!(matches!(result.unwrap_err(), Error::NotFound { .. }));

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_requires_authorship() -> Result<()> {
        let (db, _guild) = setup_with_guild().await?;
        create_test_tag(&db, 1, "foo").await?;

        // test_utils tags are authored by user 7
        let result = delete_tag(&db, 1, "foo", 99).await;
        assert!(matches!(result.unwrap_err(), Error::Forbidden { .. }));
        assert!(get_tag(&db, 1, "foo").await?.is_some());

        delete_tag(&db, 1, "foo", 7).await?;
        assert!(get_tag(&db, 1, "foo").await?.is_none());

        Ok(())
    }

    #[tokio::test]
    async fn test_force_delete_skips_authorship() -> Result<()> {
        let (db, _guild) = setup_with_guild().await?;
        create_test_tag(&db, 1, "foo").await?;

        force_delete_tag(&db, 1, "foo").await?;
        assert!(get_tag(&db, 1, "foo").await?.is_none());

        let result = force_delete_tag(&db, 1, "foo").await;
        assert!(matches!(result.unwrap_err(), Error::NotFound { .. }));

        Ok(())
    }

    #[tokio::test]
    async fn test_rename_respects_uniqueness_and_ownership() -> Result<()> {
        let (db, _guild) = setup_with_guild().await?;
        create_test_tag(&db, 1, "foo").await?;
        create_test_tag(&db, 1, "bar").await?;

        let result = rename_tag(&db, 1, "foo", "bar", 7).await;
        assert!(matches!(result.unwrap_err(), Error::DuplicateTag { .. }));

        let result = rename_tag(&db, 1, "foo", "baz", 99).await;
        assert!(matches!(result.unwrap_err(), Error::Forbidden { .. }));

        let renamed = rename_tag(&db, 1, "foo", "baz", 7).await?;
        assert_eq!(renamed.name, "baz");
        assert!(get_tag(&db, 1, "foo").await?.is_none());

        Ok(())
    }

    #[tokio::test]
    async fn test_edit_content_and_reset_uses() -> Result<()> {
        let (db, _guild) = setup_with_guild().await?;
        create_test_tag(&db, 1, "foo").await?;

        use_tag(&db, 1, "foo").await?;
        use_tag(&db, 1, "foo").await?;

        let edited = edit_tag_content(&db, 1, "foo", "new content".to_string(), 7).await?;
        assert_eq!(edited.content, "new content");
        // Editing does not touch the counter
        assert_eq!(edited.uses, 2);

        let reset = reset_tag_uses(&db, 1, "foo", 7).await?;
        assert_eq!(reset.uses, 0);

        Ok(())
    }

    #[tokio::test]
    async fn test_list_tags_ordered() -> Result<()> {
        let (db, _guild) = setup_with_guild().await?;
        create_test_tag(&db, 1, "zeta").await?;
        create_test_tag(&db, 1, "alpha").await?;

        let tags = list_tags(&db, 1).await?;
        assert_eq!(tags.len(), 2);
        assert_eq!(tags[0].name, "alpha");
        assert_eq!(tags[1].name, "zeta");

        Ok(())
    }

    #[tokio::test]
    async fn test_is_author() -> Result<()> {
        let (db, _guild) = setup_with_guild().await?;
        create_test_tag(&db, 1, "foo").await?;

        assert!(is_author(&db, 1, "foo", 7).await?);
        assert!(!is_author(&db, 1, "foo", 8).await?);
        assert!(!is_author(&db, 1, "missing", 7).await?);

        Ok(())
    }
}
