use std::env;
use std::time::Duration;

use crate::errors::BotError;

/// Number of messages requested per history page (Discord's maximum is 100).
pub const PAGE_SIZE: u8 = 50;

/// Pause between two history page fetches.
pub const PAGE_DELAY: Duration = Duration::from_secs(5);

/// How far back, in days, messages are kept for a summary.
pub const RETENTION_DAYS: i64 = 365;

pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4";
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

pub const MAX_SUMMARY_TOKENS: u32 = 1024;
pub const SUMMARY_TEMPERATURE: f64 = 0.5;

/// Default input token budget for the concatenated messages. Leaves room for
/// the system prompt and the completion inside gpt-4's 8k context window.
/// Override with `OPENAI_MAX_INPUT_TOKENS` for larger-context models.
pub const MAX_INPUT_TOKENS: usize = 6_000;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub discord_token: String,
    pub openai_api_key: String,
    pub openai_org_id: Option<String>,
    pub openai_model: Option<String>,
    pub openai_base_url: Option<String>,
    pub openai_max_input_tokens: Option<usize>,
    pub max_concurrent_summaries: Option<usize>,
}

impl AppConfig {
    /// # Errors
    ///
    /// Returns `BotError::ConfigError` when a credential is missing or a
    /// numeric setting does not parse.
    pub fn from_env() -> Result<Self, BotError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the config from an arbitrary key lookup. Empty values count as unset.
    ///
    /// # Errors
    ///
    /// See [`AppConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, BotError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let require = |key: &str| {
            get(key).ok_or_else(|| {
                BotError::ConfigError(format!("{key}: environment variable not found"))
            })
        };
        let positive = |key: &str| -> Result<Option<usize>, BotError> {
            let Some(raw) = get(key) else {
                return Ok(None);
            };
            let value = raw
                .trim()
                .parse::<usize>()
                .map_err(|e| BotError::ConfigError(format!("{key}: {e}")))?;
            if value == 0 {
                return Err(BotError::ConfigError(format!("{key}: must be at least 1")));
            }
            Ok(Some(value))
        };

        Ok(Self {
            discord_token: require("DISCORD_TOKEN")?,
            openai_api_key: require("OPENAI_API_KEY")?,
            openai_org_id: get("OPENAI_ORG_ID"),
            openai_model: get("OPENAI_MODEL"),
            openai_base_url: get("OPENAI_BASE_URL"),
            openai_max_input_tokens: positive("OPENAI_MAX_INPUT_TOKENS")?,
            max_concurrent_summaries: positive("MAX_CONCURRENT_SUMMARIES")?,
        })
    }

    #[must_use]
    pub fn model(&self) -> &str {
        self.openai_model.as_deref().unwrap_or(DEFAULT_OPENAI_MODEL)
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        self.openai_base_url
            .as_deref()
            .unwrap_or(DEFAULT_OPENAI_BASE_URL)
            .trim_end_matches('/')
    }

    #[must_use]
    pub fn max_input_tokens(&self) -> usize {
        self.openai_max_input_tokens.unwrap_or(MAX_INPUT_TOKENS)
    }
}

/// Pagination knobs for the history collector.
#[derive(Debug, Clone)]
pub struct CollectorSettings {
    pub page_size: u8,
    pub page_delay: Duration,
    pub retention: chrono::Duration,
}

impl Default for CollectorSettings {
    fn default() -> Self {
        Self {
            page_size: PAGE_SIZE,
            page_delay: PAGE_DELAY,
            retention: chrono::Duration::days(RETENTION_DAYS),
        }
    }
}
