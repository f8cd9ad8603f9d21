//! Slash-command declaration and per-guild registration.

use futures::future::join_all;
use serenity::all::{
    CommandDataOptionValue, CommandInteraction, CommandOptionType, CreateCommand,
    CreateCommandOption, GuildId, Http, UserId,
};
use std::sync::Arc;
use tracing::{error, info};

pub const SUMMARIZE_COMMAND: &str = "summarize";
pub const USERNAME_OPTION: &str = "username";

#[must_use]
pub fn summarize_command() -> CreateCommand {
    CreateCommand::new(SUMMARIZE_COMMAND)
        .description("Summarize a user's messages from the past 12 months")
        .add_option(
            CreateCommandOption::new(
                CommandOptionType::User,
                USERNAME_OPTION,
                "The user to summarize",
            )
            .required(true),
        )
}

/// Register `/summarize` in every guild. Re-creating a command with the same
/// name overwrites it, so running this on every startup is harmless. Failures
/// are logged per guild and never abort the bot.
pub async fn register_commands(http: Arc<Http>, guilds: Vec<GuildId>) {
    let registrations = guilds.into_iter().map(|guild_id| {
        let http = Arc::clone(&http);
        async move { (guild_id, guild_id.create_command(&http, summarize_command()).await) }
    });

    for (guild_id, result) in join_all(registrations).await {
        match result {
            Ok(command) => info!("Registered /{} command for guild: {}", command.name, guild_id),
            Err(e) => error!("Error registering commands for guild {}: {}", guild_id, e),
        }
    }
}

/// The user picked for the `username` option, with their display tag.
#[must_use]
pub fn target_user(command: &CommandInteraction) -> Option<(UserId, String)> {
    let option = command
        .data
        .options
        .iter()
        .find(|option| option.name == USERNAME_OPTION)?;

    let CommandDataOptionValue::User(user_id) = option.value else {
        return None;
    };

    let tag = command
        .data
        .resolved
        .users
        .get(&user_id)
        .map_or_else(|| user_id.to_string(), serenity::all::User::tag);

    Some((user_id, tag))
}
