use openai_api_rs::v1::chat_completion::{ChatCompletionMessage, Content, MessageRole};
use tracing::warn;

use super::client::estimate_tokens;

pub const SYSTEM_PROMPT: &str = "You are a helpful assistant that summarizes user messages.";

pub const USER_PROMPT_PREFIX: &str = "Summarize the following messages:\n\n";

/// Keep the leading (newest) lines of `text` that fit into `max_tokens`.
///
/// Returns the input untouched when it already fits.
#[must_use]
pub fn fit_to_budget(text: &str, max_tokens: usize) -> String {
    if estimate_tokens(text) <= max_tokens {
        return text.to_string();
    }

    let total_lines = text.lines().count();
    let mut kept: Vec<&str> = Vec::new();
    let mut chars = 0usize;
    for line in text.lines() {
        let extra = line.chars().count() + usize::from(!kept.is_empty());
        if (chars + extra) / 4 + 1 > max_tokens {
            break;
        }
        chars += extra;
        kept.push(line);
    }

    warn!(
        "Message text exceeds the {} token input budget; keeping the newest {} of {} lines",
        max_tokens,
        kept.len(),
        total_lines
    );
    kept.join("\n")
}

/// System instruction fixing the summarizer role, followed by the user request
/// embedding `messages_text`.
#[must_use]
pub fn build_prompt(messages_text: &str) -> Vec<ChatCompletionMessage> {
    vec![
        ChatCompletionMessage {
            role: MessageRole::system,
            content: Content::Text(SYSTEM_PROMPT.to_string()),
            name: None,
            tool_calls: None,
            tool_call_id: None,
        },
        ChatCompletionMessage {
            role: MessageRole::user,
            content: Content::Text(format!("{USER_PROMPT_PREFIX}{messages_text}")),
            name: None,
            tool_calls: None,
            tool_call_id: None,
        },
    ]
}
