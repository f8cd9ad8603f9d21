//! Recap - A Discord bot that summarizes one user's messages from the past year using ChatGPT.
//!
//! On `/summarize username:<user>` the bot walks the channel history backward
//! in pages of 50, keeps the target user's messages from the last 365 days,
//! reports progress in an editable status message, and posts a summary
//! generated by an `OpenAI` chat completion.
//!
//! # Architecture
//!
//! The system uses:
//! - serenity for the Discord gateway, slash commands and REST calls
//! - reqwest + openai-api-rs message types for the completion request
//! - Tokio for async runtime
//!
//! The collection and summarization logic in [`worker`] only talks to the
//! [`worker::collect::HistorySource`], [`worker::deliver::InvocationReply`] and
//! [`ai::Summarizer`] traits, which [`discord`] and [`ai`] implement.
//!
//! # Example
//!
//! ```no_run
//! use recap::core::config::AppConfig;
//! use recap::discord::{RecapBot, intents};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     recap::setup_logging();
//!
//!     let config = AppConfig::from_env()?;
//!     let bot = RecapBot::new(&config)?;
//!     let mut client = serenity::Client::builder(&config.discord_token, intents())
//!         .event_handler(bot)
//!         .await?;
//!     client.start().await?;
//!     Ok(())
//! }
//! ```

// Module declarations
pub mod ai;
pub mod core;
pub mod discord;
pub mod errors;
pub mod worker;

pub use ai::{LlmClient, Summarizer, estimate_tokens};
pub use errors::BotError;

/// Configure structured logging with JSON format.
///
/// Installs a tracing-subscriber registry with a JSON formatter and an
/// `EnvFilter` taken from `RUST_LOG` (default `info`). Call it once at
/// process start.
///
/// # Example
///
/// ```
/// recap::setup_logging();
/// ```
pub fn setup_logging() {
    use tracing_subscriber::EnvFilter;
    use tracing_subscriber::prelude::*;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let fmt_layer = tracing_subscriber::fmt::layer().json().with_target(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .init();
}
