//! Tag Discord commands - guild-scoped content snippets.
//!
//! Authorship checks live in the repository; the only Discord-side privilege
//! decision made here is whether a non-author may delete a tag, which is
//! granted to members with Manage Messages via the force variant.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{Context, handlers::autocomplete, to_db_id},
        core::{guilds, tags},
        errors::{Error, Result},
    };

    fn guild_db_id(ctx: &Context<'_>) -> i64 {
        ctx.guild_id().map_or(0, |id| to_db_id(id.get()))
    }

    async fn can_manage_messages(ctx: &Context<'_>) -> bool {
        match ctx.author_member().await {
            Some(member) => member.permissions.is_some_and(|p| p.manage_messages()),
            None => false,
        }
    }

    /// Guild tags. Use the subcommands.
    #[poise::command(
        slash_command,
        prefix_command,
        guild_only,
        subcommands("show", "create", "delete", "rename", "edit", "reset", "info", "list"),
        subcommand_required
    )]
    pub async fn tag(_ctx: Context<'_>) -> Result<()> {
        Ok(())
    }

    /// Sends a tag's content and counts the use.
    #[poise::command(slash_command, prefix_command, guild_only)]
    pub async fn show(
        ctx: Context<'_>,
        #[description = "Name of the tag"]
        #[autocomplete = "autocomplete::autocomplete_tag_name"]
        name: String,
    ) -> Result<()> {
        match tags::use_tag(&ctx.data().database, guild_db_id(&ctx), &name).await {
            Ok(tag) => {
                ctx.say(tag.content).await?;
            }
            Err(Error::NotFound { .. }) => {
                ctx.say(format!("❌ No tag named '{name}' in this guild."))
                    .await?;
            }
            Err(err) => return Err(err),
        }
        Ok(())
    }

    /// Creates a tag in this guild.
    #[poise::command(slash_command, prefix_command, guild_only)]
    pub async fn create(
        ctx: Context<'_>,
        #[description = "Name for the new tag"] name: String,
        #[description = "Content the tag will send"] content: String,
    ) -> Result<()> {
        let db = &ctx.data().database;
        let guild_id = guild_db_id(&ctx);

        // Tag rows reference the guild row, so make sure one exists
        guilds::ensure_guild(db, guild_id, ctx.data().settings.default_star_threshold).await?;

        match tags::create_tag(
            db,
            guild_id,
            &name,
            content,
            to_db_id(ctx.author().id.get()),
        )
        .await
        {
            Ok(tag) => {
                ctx.say(format!("✅ Created tag '{}'.", tag.name)).await?;
            }
            Err(Error::DuplicateTag { name, .. }) => {
                ctx.say(format!("❌ A tag named '{name}' already exists here."))
                    .await?;
            }
            Err(Error::Config { message }) => {
                ctx.say(format!("❌ {message}")).await?;
            }
            Err(err) => return Err(err),
        }
        Ok(())
    }

    /// Deletes a tag. Authors always may; others need Manage Messages.
    #[poise::command(slash_command, prefix_command, guild_only)]
    pub async fn delete(
        ctx: Context<'_>,
        #[description = "Name of the tag to delete"]
        #[autocomplete = "autocomplete::autocomplete_tag_name"]
        name: String,
    ) -> Result<()> {
        let db = &ctx.data().database;
        let guild_id = guild_db_id(&ctx);
        let requester_id = to_db_id(ctx.author().id.get());

        let result = tags::delete_tag(db, guild_id, &name, requester_id).await;
        match result {
            Ok(()) => {
                ctx.say(format!("✅ Deleted tag '{name}'.")).await?;
            }
            Err(Error::Forbidden { .. }) => {
                if can_manage_messages(&ctx).await {
                    tags::force_delete_tag(db, guild_id, &name).await?;
                    ctx.say(format!("✅ Deleted tag '{name}'.")).await?;
                } else {
                    ctx.say("❌ Only the tag's author (or a moderator) can delete it.")
                        .await?;
                }
            }
            Err(Error::NotFound { .. }) => {
                ctx.say(format!("❌ No tag named '{name}' in this guild."))
                    .await?;
            }
            Err(err) => return Err(err),
        }
        Ok(())
    }

    /// Renames one of your tags.
    #[poise::command(slash_command, prefix_command, guild_only)]
    pub async fn rename(
        ctx: Context<'_>,
        #[description = "Current name of the tag"]
        #[autocomplete = "autocomplete::autocomplete_tag_name"]
        name: String,
        #[description = "New name for the tag"] new_name: String,
    ) -> Result<()> {
        let result = tags::rename_tag(
            &ctx.data().database,
            guild_db_id(&ctx),
            &name,
            &new_name,
            to_db_id(ctx.author().id.get()),
        )
        .await;

        match result {
            Ok(tag) => {
                ctx.say(format!("✅ Renamed '{name}' to '{}'.", tag.name))
                    .await?;
            }
            Err(Error::DuplicateTag { name, .. }) => {
                ctx.say(format!("❌ A tag named '{name}' already exists here."))
                    .await?;
            }
            Err(Error::Forbidden { .. }) => {
                ctx.say("❌ Only the tag's author can rename it.").await?;
            }
            Err(Error::NotFound { .. }) => {
                ctx.say(format!("❌ No tag named '{name}' in this guild."))
                    .await?;
            }
            Err(Error::Config { message }) => {
                ctx.say(format!("❌ {message}")).await?;
            }
            Err(err) => return Err(err),
        }
        Ok(())
    }

    /// Replaces the content of one of your tags.
    #[poise::command(slash_command, prefix_command, guild_only)]
    pub async fn edit(
        ctx: Context<'_>,
        #[description = "Name of the tag to edit"]
        #[autocomplete = "autocomplete::autocomplete_tag_name"]
        name: String,
        #[description = "New content for the tag"] content: String,
    ) -> Result<()> {
        let result = tags::edit_tag_content(
            &ctx.data().database,
            guild_db_id(&ctx),
            &name,
            content,
            to_db_id(ctx.author().id.get()),
        )
        .await;

        match result {
            Ok(tag) => {
                ctx.say(format!("✅ Updated tag '{}'.", tag.name)).await?;
            }
            Err(Error::Forbidden { .. }) => {
                ctx.say("❌ Only the tag's author can edit it.").await?;
            }
            Err(Error::NotFound { .. }) => {
                ctx.say(format!("❌ No tag named '{name}' in this guild."))
                    .await?;
            }
            Err(err) => return Err(err),
        }
        Ok(())
    }

    /// Resets a tag's usage counter to zero.
    #[poise::command(slash_command, prefix_command, guild_only)]
    pub async fn reset(
        ctx: Context<'_>,
        #[description = "Name of the tag to reset"]
        #[autocomplete = "autocomplete::autocomplete_tag_name"]
        name: String,
    ) -> Result<()> {
        let result = tags::reset_tag_uses(
            &ctx.data().database,
            guild_db_id(&ctx),
            &name,
            to_db_id(ctx.author().id.get()),
        )
        .await;

        match result {
            Ok(tag) => {
                ctx.say(format!("✅ Reset usage counter for '{}'.", tag.name))
                    .await?;
            }
            Err(Error::Forbidden { .. }) => {
                ctx.say("❌ Only the tag's author can reset it.").await?;
            }
            Err(Error::NotFound { .. }) => {
                ctx.say(format!("❌ No tag named '{name}' in this guild."))
                    .await?;
            }
            Err(err) => return Err(err),
        }
        Ok(())
    }

    /// Shows a tag's author, creation time, and usage count.
    #[poise::command(slash_command, prefix_command, guild_only)]
    pub async fn info(
        ctx: Context<'_>,
        #[description = "Name of the tag"]
        #[autocomplete = "autocomplete::autocomplete_tag_name"]
        name: String,
    ) -> Result<()> {
        match tags::get_tag(&ctx.data().database, guild_db_id(&ctx), &name).await? {
            Some(tag) => {
                ctx.say(format!(
                    "**{}** - created by <@{}> on <t:{}:D>, used {} time(s).",
                    tag.name,
                    tag.author_id,
                    tag.created_at.timestamp(),
                    tag.uses
                ))
                .await?;
            }
            None => {
                ctx.say(format!("❌ No tag named '{name}' in this guild."))
                    .await?;
            }
        }
        Ok(())
    }

    /// Lists all tags in this guild.
    #[poise::command(slash_command, prefix_command, guild_only)]
    pub async fn list(ctx: Context<'_>) -> Result<()> {
        let tags = tags::list_tags(&ctx.data().database, guild_db_id(&ctx)).await?;
        if tags.is_empty() {
            ctx.say("This guild has no tags yet.").await?;
        } else {
            let names: Vec<&str> = tags.iter().map(|t| t.name.as_str()).collect();
            ctx.say(format!("**Tags:** {}", names.join(", "))).await?;
        }
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
