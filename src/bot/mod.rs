//! Bot layer - Discord-specific interface and command handlers
//!
//! This module provides the Discord interface for the `Stargazer` application:
//! slash commands, gateway event handlers for star reactions, and bot context
//! management. All user-facing text lives here; the repositories in
//! [`crate::core`] only ever return typed results.

/// Discord command implementations (starboard, moderation, tag, general)
pub mod commands;
/// Discord gateway handlers (reactions, autocomplete)
pub mod handlers;

use crate::config::settings::Settings;
use crate::core::moderation;
use crate::errors;
use poise::serenity_prelude as serenity;
use sea_orm::DatabaseConnection;
use tracing::{error, info, instrument, warn};

/// Shared data available to all bot commands.
/// This structure holds the database connection and the process-level
/// settings that commands and event handlers need to access.
pub struct BotData {
    /// Database connection for all repository operations
    pub database: DatabaseConnection,
    /// Process defaults (star emoji, default threshold for new guilds)
    pub settings: Settings,
}

impl BotData {
    /// Creates a new `BotData` instance with the given database connection
    /// and settings.
    #[must_use]
    pub const fn new(database: DatabaseConnection, settings: Settings) -> Self {
        Self { database, settings }
    }
}

/// Type alias for the error type Poise will use
pub(crate) type Error = errors::Error;
/// Type alias for the poise context used by every command
pub(crate) type Context<'a> = poise::Context<'a, BotData, Error>;

/// Converts a Discord snowflake into the signed form stored in the database.
pub(crate) fn to_db_id(id: u64) -> i64 {
    i64::try_from(id).unwrap_or_default()
}

async fn on_error(error: poise::FrameworkError<'_, BotData, Error>) {
    match error {
        poise::FrameworkError::Setup { error, .. } => {
            error!("Failed to start bot: {error:?}");
        }
        poise::FrameworkError::Command { error, ctx, .. } => {
            error!("Error in command `{}`: {:?}", ctx.command().name, error);
            if let Err(e) = ctx.say(format!("An error occurred: {error}")).await {
                error!("Failed to send error message: {e}");
            }
        }
        error => {
            if let Err(e) = poise::builtins::on_error(error).await {
                error!("Error while handling error: {e}");
            }
        }
    }
}

/// Global command check: invocations from bot-banned users or guilds are
/// silently dropped. Expiry is judged at read time by the repository, so a
/// lapsed ban lets the user straight back in with no cleanup pass.
async fn not_banned(ctx: Context<'_>) -> Result<bool, Error> {
    let db = &ctx.data().database;

    if moderation::is_user_banned(db, to_db_id(ctx.author().id.get())).await? {
        warn!("Ignoring command from banned user {}", ctx.author().id);
        return Ok(false);
    }
    if let Some(guild_id) = ctx.guild_id()
        && moderation::is_guild_banned(db, to_db_id(guild_id.get())).await?
    {
        warn!("Ignoring command from banned guild {guild_id}");
        return Ok(false);
    }

    Ok(true)
}

/// Builds the poise framework and runs the bot until the gateway connection
/// ends.
#[instrument(skip(token, settings, database))]
pub async fn run_bot(
    token: String,
    settings: Settings,
    database: DatabaseConnection,
) -> Result<(), serenity::Error> {
    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: vec![
                commands::general::ping(),
                commands::general::help(),
                commands::starboard::starboard(),
                commands::starboard::star(),
                commands::starboard::starred(),
                commands::moderation::botban(),
                commands::moderation::botunban(),
                commands::moderation::filter(),
                commands::tag::tag(),
            ],
            on_error: |error| Box::pin(on_error(error)),
            command_check: Some(|ctx| Box::pin(not_banned(ctx))),
            event_handler: |ctx, event, framework, data| {
                Box::pin(handlers::reactions::handle_event(ctx, event, framework, data))
            },
            ..Default::default()
        })
        .setup(move |ctx, ready, framework| {
            Box::pin(async move {
                info!("Logged in as {}", ready.user.name);
                info!("Registering commands globally...");
                poise::builtins::register_globally(ctx, &framework.options().commands).await?;
                Ok(BotData::new(database, settings))
            })
        })
        .build();

    // Reactions drive the starboard; message content is needed for snapshots
    let intents = serenity::GatewayIntents::GUILDS
        | serenity::GatewayIntents::GUILD_MESSAGES
        | serenity::GatewayIntents::GUILD_MESSAGE_REACTIONS
        | serenity::GatewayIntents::MESSAGE_CONTENT;

    info!("Setting up Serenity client for Poise framework...");
    let mut client = serenity::ClientBuilder::new(&token, intents)
        .framework(framework)
        .await?;

    info!("Starting bot client...");
    client.start().await.inspect_err(|why| {
        error!("Client error: {why:?}");
    })
}
