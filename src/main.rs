//! Binary entry point - wires settings, database, and the Discord client.

use std::env;

use stargazer::bot;
use stargazer::config::{database, settings};
use stargazer::errors::{Error, Result};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing as early as possible
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load .env non-fatally; env vars can be set externally
    dotenvy::dotenv().ok();
    info!("Attempted to load .env file.");

    let app_settings = settings::load_default_settings()
        .inspect_err(|e| error!("Failed to load settings: {e}"))?;
    info!(
        "Settings loaded (default star threshold: {}).",
        app_settings.default_star_threshold
    );

    let db = database::create_connection()
        .await
        .inspect(|_| info!("Database connection established."))
        .inspect_err(|e| error!("Failed to connect to database: {e}"))?;
    database::create_tables(&db)
        .await
        .inspect(|_| info!("Database tables ready."))
        .inspect_err(|e| error!("Failed to initialize schema: {e}"))?;

    // The bot token is loaded directly before use, never stored in settings
    let token = env::var("DISCORD_BOT_TOKEN")
        .inspect_err(|e| error!("DISCORD_BOT_TOKEN not found: {e}"))
        .map_err(Error::EnvVar)?;

    bot::run_bot(token, app_settings, db).await.map_err(Error::from)?;

    Ok(())
}
