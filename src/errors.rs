use thiserror::Error;

#[derive(Debug, Error)]
pub enum BotError {
    #[error("Failed to access Discord API: {0}")]
    DiscordError(String),

    #[error("Failed to access OpenAI API: {0}")]
    OpenAIError(String),

    #[error("Failed to send HTTP request: {0}")]
    HttpError(String),

    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    #[error("{0}")]
    GeneralError(String),
}

impl From<serenity::Error> for BotError {
    fn from(error: serenity::Error) -> Self {
        BotError::DiscordError(error.to_string())
    }
}

impl From<reqwest::Error> for BotError {
    fn from(error: reqwest::Error) -> Self {
        BotError::HttpError(error.to_string())
    }
}

impl From<anyhow::Error> for BotError {
    fn from(error: anyhow::Error) -> Self {
        BotError::GeneralError(error.to_string())
    }
}
