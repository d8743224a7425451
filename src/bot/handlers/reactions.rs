//! Gateway event handlers driving the starboard.
//!
//! Each event maps to exactly one repository call: reaction-add to
//! `record_star`, reaction-remove to `remove_star`, message-delete to
//! `mark_deleted`, message-edit to `mark_edited`. The promotion decision is
//! re-evaluated after every star mutation from the state the repository
//! returned, and the `promote` link is what guarantees a single starboard
//! post per message even when handlers race the threshold.

use crate::{
    bot::{BotData, Error, to_db_id},
    core::{guilds, starboard},
    entities::guild,
    errors,
};
use poise::serenity_prelude as serenity;
use tracing::{debug, warn};

/// Dispatches gateway events to their repository calls.
pub async fn handle_event(
    ctx: &serenity::Context,
    event: &serenity::FullEvent,
    _framework: poise::FrameworkContext<'_, BotData, Error>,
    data: &BotData,
) -> Result<(), Error> {
    match event {
        serenity::FullEvent::ReactionAdd { add_reaction } => {
            reaction_added(ctx, add_reaction, data).await
        }
        serenity::FullEvent::ReactionRemove { removed_reaction } => {
            reaction_removed(ctx, removed_reaction, data).await
        }
        serenity::FullEvent::MessageDelete {
            deleted_message_id, ..
        } => {
            let marked =
                starboard::mark_deleted(&data.database, to_db_id(deleted_message_id.get())).await?;
            if marked {
                debug!("Marked starred message {deleted_message_id} as deleted");
            }
            Ok(())
        }
        serenity::FullEvent::MessageUpdate { event, .. } => {
            // The snapshot content is intentionally left at its first-star value
            starboard::mark_edited(&data.database, to_db_id(event.id.get())).await?;
            Ok(())
        }
        _ => Ok(()),
    }
}

/// Loads the guild row a star event belongs to. `None` outside guilds, for
/// unconfigured guilds, and for guilds that soft-disabled the bot.
pub(crate) async fn starred_guild(
    data: &BotData,
    guild_id: Option<serenity::GuildId>,
) -> Result<Option<guild::Model>, Error> {
    let Some(guild_id) = guild_id else {
        return Ok(None);
    };
    let guild = guilds::get_guild(&data.database, to_db_id(guild_id.get())).await?;
    Ok(guild.filter(|g| !g.is_disabled))
}

async fn reaction_added(
    ctx: &serenity::Context,
    reaction: &serenity::Reaction,
    data: &BotData,
) -> Result<(), Error> {
    if reaction.emoji.to_string() != data.settings.star_emoji {
        return Ok(());
    }
    let Some(guild) = starred_guild(data, reaction.guild_id).await? else {
        return Ok(());
    };
    let Some(user_id) = reaction.user_id else {
        return Ok(());
    };

    let message = reaction.message(&ctx.http).await?;
    if message.author.id == user_id {
        debug!("Ignoring self-star on message {}", message.id);
        return Ok(());
    }

    let state = starboard::record_star(
        &data.database,
        to_db_id(message.id.get()),
        to_db_id(message.channel_id.get()),
        to_db_id(message.author.id.get()),
        message.author.avatar.map(|hash| hash.to_string()),
        message.content.clone(),
        to_db_id(user_id.get()),
    )
    .await;

    let state = match state {
        Ok(state) => state,
        // Duplicate star events and stars on deleted messages are no-ops
        Err(errors::Error::DuplicateStar { .. } | errors::Error::NotFound { .. }) => {
            return Ok(());
        }
        Err(err) => return Err(err),
    };

    apply_promotion(ctx, data, &guild, &state).await
}

async fn reaction_removed(
    ctx: &serenity::Context,
    reaction: &serenity::Reaction,
    data: &BotData,
) -> Result<(), Error> {
    if reaction.emoji.to_string() != data.settings.star_emoji {
        return Ok(());
    }
    let Some(guild) = starred_guild(data, reaction.guild_id).await? else {
        return Ok(());
    };
    let Some(user_id) = reaction.user_id else {
        return Ok(());
    };

    let Some(state) = starboard::remove_star(
        &data.database,
        to_db_id(reaction.message_id.get()),
        to_db_id(user_id.get()),
    )
    .await?
    else {
        return Ok(());
    };

    apply_promotion(ctx, data, &guild, &state).await
}

fn star_line(emoji: &str, count: u64) -> String {
    format!("{emoji} **{count}**")
}

fn starboard_embed(guild_id: i64, entry: &starboard::StarEntry) -> serenity::CreateEmbed {
    let message = &entry.message;
    let jump_link = format!(
        "https://discord.com/channels/{}/{}/{}",
        guild_id, message.channel_id, message.message_id
    );

    let mut embed = serenity::CreateEmbed::default()
        .description(message.content.clone())
        .field("Original", format!("[Jump to message]({jump_link})"), false);

    if let Some(hash) = &message.author_avatar_hash {
        embed = embed.thumbnail(format!(
            "https://cdn.discordapp.com/avatars/{}/{hash}.png",
            message.author_id
        ));
    }

    embed
}

/// Posts, links, or refreshes the starboard post for a star state.
///
/// Runs after every star mutation, whether it arrived as a reaction or via the
/// `/star` command. Promotion is terminal: below-threshold states on an
/// already-promoted message only refresh the posted count.
pub(crate) async fn apply_promotion(
    ctx: &serenity::Context,
    data: &BotData,
    guild: &guild::Model,
    state: &starboard::StarState,
) -> Result<(), Error> {
    let emoji = &data.settings.star_emoji;

    match starboard::promotion_action(state, guild.star_threshold) {
        starboard::PromotionAction::None => Ok(()),
        starboard::PromotionAction::Promote => {
            let Some(channel_id) = guild.starboard_channel_id else {
                return Ok(());
            };
            let Some(entry) = starboard::get_entry(&data.database, state.message_id).await? else {
                return Ok(());
            };

            let channel = serenity::ChannelId::new(channel_id.unsigned_abs());
            let post = channel
                .send_message(
                    &ctx.http,
                    serenity::CreateMessage::new()
                        .content(star_line(emoji, state.count))
                        .embed(starboard_embed(guild.id, &entry)),
                )
                .await?;

            let linked =
                starboard::promote(&data.database, state.message_id, to_db_id(post.id.get()))
                    .await?;
            if !linked {
                // Another handler won the promotion race; discard our duplicate
                warn!(
                    "Lost promotion race for message {}, deleting duplicate post",
                    state.message_id
                );
                channel.delete_message(&ctx.http, post.id).await?;
            }
            Ok(())
        }
        starboard::PromotionAction::Refresh => {
            let (Some(channel_id), Some(post_id)) =
                (guild.starboard_channel_id, state.starboard_message_id)
            else {
                return Ok(());
            };

            serenity::ChannelId::new(channel_id.unsigned_abs())
                .edit_message(
                    &ctx.http,
                    serenity::MessageId::new(post_id.unsigned_abs()),
                    serenity::EditMessage::new().content(star_line(emoji, state.count)),
                )
                .await?;
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::config::settings::Settings;
    use crate::test_utils::{setup_test_db, star_message};

    async fn test_data() -> Result<BotData, Error> {
        let db = setup_test_db().await?;
        Ok(BotData::new(db, Settings::default()))
    }

    #[tokio::test]
    async fn test_starred_guild_gates_disabled_and_unknown() -> Result<(), Error> {
        let data = test_data().await?;
        guilds::ensure_guild(&data.database, 1, 3).await?;

        let guild_id = Some(serenity::GuildId::new(1));
        assert!(starred_guild(&data, guild_id).await?.is_some());

        // Outside a guild, or in a guild with no row, there is no starboard
        assert!(starred_guild(&data, None).await?.is_none());
        assert!(
            starred_guild(&data, Some(serenity::GuildId::new(2)))
                .await?
                .is_none()
        );

        // Soft-disabling the guild closes the gate for both star paths
        guilds::disable_guild(&data.database, 1, 3).await?;
        assert!(starred_guild(&data, guild_id).await?.is_none());

        Ok(())
    }

    #[tokio::test]
    async fn test_recorded_star_crossing_threshold_promotes() -> Result<(), Error> {
        let data = test_data().await?;
        let guild = guilds::ensure_guild(&data.database, 1, 2).await?;

        // First star is below the threshold, the second crosses it; the same
        // decision runs whether the star arrived as a reaction or a command
        let state = star_message(&data.database, 100, 7).await?;
        assert_eq!(
            starboard::promotion_action(&state, guild.star_threshold),
            starboard::PromotionAction::None
        );

        let state = star_message(&data.database, 100, 8).await?;
        assert_eq!(
            starboard::promotion_action(&state, guild.star_threshold),
            starboard::PromotionAction::Promote
        );

        Ok(())
    }
}
