//! All Discord-specific functionality

pub mod bot;
pub mod client;
pub mod commands;
pub mod response_builder;

// Re-export main types for convenience
pub use bot::{RecapBot, intents};
pub use client::{DiscordHistory, InteractionReply};
