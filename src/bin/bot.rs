// Entry point for the Discord gateway process

use anyhow::Context;
use recap::core::config::AppConfig;
use recap::discord::{RecapBot, intents};
use serenity::Client;
use tracing::error;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    recap::setup_logging();

    let config = AppConfig::from_env().inspect_err(|e| error!("Config error: {}", e))?;

    let bot = RecapBot::new(&config).context("Failed to initialize bot")?;

    let mut client = Client::builder(&config.discord_token, intents())
        .event_handler(bot)
        .await
        .context("Failed to build Discord client")?;

    if let Err(e) = client.start().await {
        error!("Failed to login: {}", e);
        return Err(e).context("Discord gateway connection failed");
    }

    Ok(())
}
