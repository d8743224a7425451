//! Autocomplete handlers for Discord slash command parameters.

use crate::{
    bot::{BotData, to_db_id},
    core::tags,
    errors::Error,
};

/// Provides autocomplete suggestions for tag names in the current guild.
///
/// Queries the guild's tags and returns up to 25 names matching the partial
/// input, sorted alphabetically. Outside a guild there are no tags to suggest.
pub async fn autocomplete_tag_name(
    ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<String> {
    let Some(guild_id) = ctx.guild_id() else {
        return Vec::new();
    };

    let db = &ctx.data().database;
    let Ok(tags) = tags::list_tags(db, to_db_id(guild_id.get())).await else {
        return Vec::new();
    };

    let partial_lower = partial.to_lowercase();
    tags.into_iter()
        .map(|tag| tag.name)
        .filter(|name| name.to_lowercase().contains(&partial_lower))
        .take(25) // Discord autocomplete limit
        .collect()
}
