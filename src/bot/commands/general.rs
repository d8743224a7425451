//! General Discord commands - ping, help, and other utility commands.
//! This module contains simple commands that don't require database operations
//! and provide basic bot functionality and user assistance.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::BotData,
        errors::{Error, Result},
    };

    /// Responds with "Pong!" to test bot connectivity.
    ///
    /// This is a simple health check command that doesn't require any database operations.
    #[poise::command(slash_command, prefix_command)]
    pub async fn ping(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        ctx.say("Pong!").await?;
        Ok(())
    }

    /// Displays help information about available commands.
    #[poise::command(slash_command, prefix_command)]
    pub async fn help(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let help_text = "**Stargazer Help**\n\
        Here is a summary of all available commands for Stargazer.\n\n\
        **Starboard**\n\
        • `/starboard set [channel]` - Sets the starboard channel.\n\
        • `/starboard threshold <count>` - Sets the star count needed for promotion.\n\
        • `/starboard disable` / `/starboard enable` - Turns the starboard off/on.\n\
        • `/star <message_id>` - Stars a message by id.\n\
        • `/starred <message_id>` - Shows a message's starboard entry.\n\n\
        **Tags**\n\
        • `/tag show <name>` - Sends a tag's content.\n\
        • `/tag create <name> <content>` - Creates a tag.\n\
        • `/tag delete | rename | edit | reset` - Manages your tags.\n\
        • `/tag info <name>` / `/tag list` - Tag details and listing.\n\n\
        **Moderation**\n\
        • `/botban user|guild` - Bans a user or guild from the bot.\n\
        • `/botunban user|guild` - Lifts a bot ban.\n\
        • `/filter set|show` - Manages moderation filters.\n\n\
        **Utility**\n\
        • `/ping` - Checks if the bot is responsive.\n\
        • `/help` - Shows this help message.";

        ctx.say(help_text).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
