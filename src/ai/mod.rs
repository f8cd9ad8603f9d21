//! All AI/LLM functionality

pub mod client;
pub mod prompt_builder;

use async_trait::async_trait;

use crate::errors::BotError;

// Re-export main types for convenience
pub use client::{LlmClient, estimate_tokens};

/// Turns the collected message text into a summary.
#[async_trait]
pub trait Summarizer: Send + Sync {
    /// Exactly one attempt; no retries.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, quota/API errors, or an unusable response.
    async fn summarize(&self, text: &str) -> Result<String, BotError>;
}
