//! Starboard Discord commands - configuration plus manual starring.
//!
//! Configuration writes go through the guild repository; `/star` and
//! `/starred` are the command-driven versions of the reaction handlers,
//! useful where reactions are disabled or a message id is all you have.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{Context, handlers::reactions, to_db_id},
        core::{guilds, starboard},
        errors::{Error, Result},
    };
    use poise::serenity_prelude as serenity;

    /// Starboard configuration. Use the subcommands.
    #[poise::command(
        slash_command,
        prefix_command,
        guild_only,
        subcommands("set", "threshold", "disable", "enable"),
        subcommand_required
    )]
    pub async fn starboard(_ctx: Context<'_>) -> Result<()> {
        Ok(())
    }

    /// Sets the starboard channel for this guild.
    ///
    /// With no argument the current channel becomes the starboard.
    #[poise::command(slash_command, prefix_command, guild_only)]
    pub async fn set(
        ctx: Context<'_>,
        #[description = "Channel to post starred messages to (defaults to here)"]
        channel: Option<serenity::ChannelId>,
    ) -> Result<()> {
        let guild_id = ctx.guild_id().map_or(0, |id| to_db_id(id.get()));
        let channel_id = channel.unwrap_or_else(|| ctx.channel_id());

        guilds::set_starboard_channel(
            &ctx.data().database,
            guild_id,
            to_db_id(channel_id.get()),
            ctx.data().settings.default_star_threshold,
        )
        .await?;

        ctx.say(format!("✅ Set starboard channel to <#{channel_id}>."))
            .await?;
        Ok(())
    }

    /// Sets how many stars a message needs to reach the starboard.
    #[poise::command(slash_command, prefix_command, guild_only)]
    pub async fn threshold(
        ctx: Context<'_>,
        #[description = "Star count needed for promotion"] count: i32,
    ) -> Result<()> {
        let guild_id = ctx.guild_id().map_or(0, |id| to_db_id(id.get()));

        match guilds::set_star_threshold(
            &ctx.data().database,
            guild_id,
            count,
            ctx.data().settings.default_star_threshold,
        )
        .await
        {
            Ok(guild) => {
                ctx.say(format!(
                    "✅ Messages now need {} star(s) to reach the starboard.",
                    guild.star_threshold
                ))
                .await?;
            }
            Err(Error::Config { message }) => {
                ctx.say(format!("❌ {message}")).await?;
            }
            Err(err) => return Err(err),
        }
        Ok(())
    }

    /// Turns the starboard off for this guild. Settings are kept.
    #[poise::command(slash_command, prefix_command, guild_only)]
    pub async fn disable(ctx: Context<'_>) -> Result<()> {
        let guild_id = ctx.guild_id().map_or(0, |id| to_db_id(id.get()));
        guilds::disable_guild(
            &ctx.data().database,
            guild_id,
            ctx.data().settings.default_star_threshold,
        )
        .await?;
        ctx.say("✅ Starboard disabled. Settings are kept.").await?;
        Ok(())
    }

    /// Turns the starboard back on for this guild.
    #[poise::command(slash_command, prefix_command, guild_only)]
    pub async fn enable(ctx: Context<'_>) -> Result<()> {
        let guild_id = ctx.guild_id().map_or(0, |id| to_db_id(id.get()));
        guilds::enable_guild(
            &ctx.data().database,
            guild_id,
            ctx.data().settings.default_star_threshold,
        )
        .await?;
        ctx.say("✅ Starboard enabled.").await?;
        Ok(())
    }

    /// Stars a message by id, like reacting to it with the star emoji.
    #[poise::command(slash_command, prefix_command, guild_only)]
    pub async fn star(
        ctx: Context<'_>,
        #[description = "Id of the message to star (must be in this channel)"] message_id: String,
    ) -> Result<()> {
        let Ok(message_id) = message_id.trim().parse::<u64>() else {
            ctx.say("❌ Invalid message id.").await?;
            return Ok(());
        };

        // Same gate as the reaction path: no row or soft-disabled means no stars
        let Some(guild) = reactions::starred_guild(ctx.data(), ctx.guild_id()).await? else {
            ctx.say("❌ The starboard is not enabled in this guild.")
                .await?;
            return Ok(());
        };

        let message = match ctx
            .http()
            .get_message(ctx.channel_id(), serenity::MessageId::new(message_id))
            .await
        {
            Ok(message) => message,
            Err(_) => {
                ctx.say("❌ No such message in this channel.").await?;
                return Ok(());
            }
        };

        if message.author.id == ctx.author().id {
            ctx.say("You cannot star your own message.").await?;
            return Ok(());
        }

        let result = starboard::record_star(
            &ctx.data().database,
            to_db_id(message.id.get()),
            to_db_id(message.channel_id.get()),
            to_db_id(message.author.id.get()),
            message.author.avatar.map(|hash| hash.to_string()),
            message.content.clone(),
            to_db_id(ctx.author().id.get()),
        )
        .await;

        match result {
            Ok(state) => {
                ctx.say(format!(
                    "⭐ Added star to message. It now has {} star(s).",
                    state.count
                ))
                .await?;
                // Threshold crossing is re-evaluated after every recorded star,
                // manual ones included
                reactions::apply_promotion(ctx.serenity_context(), ctx.data(), &guild, &state)
                    .await?;
            }
            Err(Error::DuplicateStar { .. }) => {
                ctx.say("You've already starred that message.").await?;
            }
            Err(Error::NotFound { .. }) => {
                ctx.say("❌ That message was deleted and can no longer be starred.")
                    .await?;
            }
            Err(err) => return Err(err),
        }
        Ok(())
    }

    /// Shows a message's starboard entry.
    #[poise::command(slash_command, prefix_command, guild_only)]
    pub async fn starred(
        ctx: Context<'_>,
        #[description = "Id of the starred message"] message_id: String,
    ) -> Result<()> {
        let Ok(message_id) = message_id.trim().parse::<i64>() else {
            ctx.say("❌ Invalid message id.").await?;
            return Ok(());
        };

        let Some(entry) = starboard::get_entry(&ctx.data().database, message_id).await? else {
            ctx.say("❌ That message has never been starred.").await?;
            return Ok(());
        };

        ctx.say(format!(
            "⭐ **{}** star(s) | status: {:?} | promoted: {}\n> {}",
            entry.star_count,
            entry.message.status,
            entry
                .message
                .starboard_message_id
                .map_or_else(|| "no".to_string(), |id| format!("yes ({id})")),
            entry.message.content
        ))
        .await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
