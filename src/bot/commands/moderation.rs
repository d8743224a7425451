//! Bot-side moderation commands - bans and filters.
//!
//! These bans keep a user or guild from interacting with the bot itself;
//! they are unrelated to Discord's own guild bans. Enforcement happens in the
//! global command check, against the expiry timestamp, so a lifted or lapsed
//! ban takes effect immediately.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{Context, to_db_id},
        core::moderation,
        entities::{FilterStatus, TargetType},
        errors::Result,
    };
    use chrono::{Duration, Utc};
    use poise::ChoiceParameter;
    use poise::serenity_prelude as serenity;

    /// Argument wrapper so slash commands can pick a filter target type.
    #[derive(Debug, Clone, Copy, poise::ChoiceParameter)]
    pub enum TargetTypeChoice {
        #[name = "user"]
        User,
        #[name = "guild"]
        Guild,
        #[name = "channel"]
        Channel,
    }

    impl From<TargetTypeChoice> for TargetType {
        fn from(value: TargetTypeChoice) -> Self {
            match value {
                TargetTypeChoice::User => Self::User,
                TargetTypeChoice::Guild => Self::Guild,
                TargetTypeChoice::Channel => Self::Channel,
            }
        }
    }

    /// Argument wrapper for picking a filter status.
    #[derive(Debug, Clone, Copy, poise::ChoiceParameter)]
    pub enum FilterStatusChoice {
        #[name = "filtered"]
        Filtered,
        #[name = "cleared"]
        Cleared,
    }

    impl From<FilterStatusChoice> for FilterStatus {
        fn from(value: FilterStatusChoice) -> Self {
            match value {
                FilterStatusChoice::Filtered => Self::Filtered,
                FilterStatusChoice::Cleared => Self::Cleared,
            }
        }
    }

    fn expiry_from_days(days: Option<i64>) -> Option<chrono::DateTime<Utc>> {
        days.map(|d| Utc::now() + Duration::days(d))
    }

    /// Bans a user or guild from interacting with the bot. Use the subcommands.
    #[poise::command(
        slash_command,
        prefix_command,
        owners_only,
        subcommands("ban_user", "ban_guild"),
        subcommand_required
    )]
    pub async fn botban(_ctx: Context<'_>) -> Result<()> {
        Ok(())
    }

    /// Bans a user from the bot. Banning again overwrites reason and expiry.
    #[poise::command(slash_command, prefix_command, owners_only, rename = "user")]
    pub async fn ban_user(
        ctx: Context<'_>,
        #[description = "User to ban from the bot"] user: serenity::User,
        #[description = "Reason for the ban"] reason: String,
        #[description = "Days until the ban lapses (omit for permanent)"] days: Option<i64>,
    ) -> Result<()> {
        let ban = moderation::ban_user(
            &ctx.data().database,
            to_db_id(user.id.get()),
            reason,
            expiry_from_days(days),
        )
        .await?;

        ctx.say(format!(
            "✅ Banned {} from the bot{}.",
            user.name,
            ban.expires_at
                .map_or_else(String::new, |at| format!(" until <t:{}>", at.timestamp()))
        ))
        .await?;
        Ok(())
    }

    /// Bans an entire guild from the bot.
    #[poise::command(slash_command, prefix_command, owners_only, rename = "guild")]
    pub async fn ban_guild(
        ctx: Context<'_>,
        #[description = "Id of the guild to ban"] guild_id: String,
        #[description = "Reason for the ban"] reason: String,
        #[description = "Days until the ban lapses (omit for permanent)"] days: Option<i64>,
    ) -> Result<()> {
        let Ok(guild_id) = guild_id.trim().parse::<i64>() else {
            ctx.say("❌ Invalid guild id.").await?;
            return Ok(());
        };

        moderation::ban_guild(
            &ctx.data().database,
            guild_id,
            reason,
            expiry_from_days(days),
        )
        .await?;

        ctx.say(format!("✅ Banned guild {guild_id} from the bot."))
            .await?;
        Ok(())
    }

    /// Lifts a bot ban. Use the subcommands.
    #[poise::command(
        slash_command,
        prefix_command,
        owners_only,
        subcommands("unban_user", "unban_guild"),
        subcommand_required
    )]
    pub async fn botunban(_ctx: Context<'_>) -> Result<()> {
        Ok(())
    }

    /// Lifts a user's bot ban.
    #[poise::command(slash_command, prefix_command, owners_only, rename = "user")]
    pub async fn unban_user(
        ctx: Context<'_>,
        #[description = "User to unban"] user: serenity::User,
    ) -> Result<()> {
        let removed = moderation::unban_user(&ctx.data().database, to_db_id(user.id.get())).await?;
        if removed {
            ctx.say(format!("✅ Unbanned {}.", user.name)).await?;
        } else {
            ctx.say(format!("{} was not banned.", user.name)).await?;
        }
        Ok(())
    }

    /// Lifts a guild's bot ban.
    #[poise::command(slash_command, prefix_command, owners_only, rename = "guild")]
    pub async fn unban_guild(
        ctx: Context<'_>,
        #[description = "Id of the guild to unban"] guild_id: String,
    ) -> Result<()> {
        let Ok(guild_id) = guild_id.trim().parse::<i64>() else {
            ctx.say("❌ Invalid guild id.").await?;
            return Ok(());
        };

        let removed = moderation::unban_guild(&ctx.data().database, guild_id).await?;
        if removed {
            ctx.say(format!("✅ Unbanned guild {guild_id}.")).await?;
        } else {
            ctx.say(format!("Guild {guild_id} was not banned.")).await?;
        }
        Ok(())
    }

    /// Moderation filter records. Use the subcommands.
    #[poise::command(
        slash_command,
        prefix_command,
        owners_only,
        subcommands("filter_set", "filter_show"),
        subcommand_required
    )]
    pub async fn filter(_ctx: Context<'_>) -> Result<()> {
        Ok(())
    }

    /// Sets (or overwrites) the filter record for a target.
    #[poise::command(slash_command, prefix_command, owners_only, rename = "set")]
    pub async fn filter_set(
        ctx: Context<'_>,
        #[description = "Id of the user, guild, or channel to filter"] target_id: String,
        #[description = "What kind of object the target is"] target_type: TargetTypeChoice,
        #[description = "Filter status to record"] status: FilterStatusChoice,
        #[description = "Hours until the filter lapses (omit for indefinite)"] hours: Option<i64>,
    ) -> Result<()> {
        let Ok(target_id) = target_id.trim().parse::<i64>() else {
            ctx.say("❌ Invalid target id.").await?;
            return Ok(());
        };

        let record = moderation::set_filter(
            &ctx.data().database,
            target_id,
            target_type.into(),
            status.into(),
            hours.map(|h| Utc::now() + Duration::hours(h)),
        )
        .await?;

        ctx.say(format!(
            "✅ Filter for {} {target_id} set to {:?}.",
            target_type.name(),
            record.status
        ))
        .await?;
        Ok(())
    }

    /// Shows the filter record in effect for a target, if any.
    #[poise::command(slash_command, prefix_command, owners_only, rename = "show")]
    pub async fn filter_show(
        ctx: Context<'_>,
        #[description = "Id of the target to look up"] target_id: String,
    ) -> Result<()> {
        let Ok(target_id) = target_id.trim().parse::<i64>() else {
            ctx.say("❌ Invalid target id.").await?;
            return Ok(());
        };

        match moderation::get_filter(&ctx.data().database, target_id).await? {
            Some(record) => {
                ctx.say(format!(
                    "Filter for {:?} {target_id}: {:?}{}",
                    record.target_type,
                    record.status,
                    record
                        .timeout
                        .map_or_else(String::new, |at| format!(", lapses <t:{}>", at.timestamp()))
                ))
                .await?;
            }
            None => {
                ctx.say(format!("No filter in effect for {target_id}."))
                    .await?;
            }
        }
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
