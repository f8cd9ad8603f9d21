use async_trait::async_trait;
use tracing::{error, info, warn};

use crate::core::models::{Invocation, StatusHandle};
use crate::discord::response_builder::{no_messages_text, summary_messages};
use crate::errors::BotError;

use super::SUMMARIZE_FAILURE_MESSAGE;

/// The reply surface of a slash-command invocation.
#[async_trait]
pub trait InvocationReply: Send + Sync {
    /// Acknowledge the command so the work can outlive the initial response window.
    async fn defer(&self) -> Result<(), BotError>;

    /// Post the status message and return a handle for later edits.
    async fn send_status(&self, content: &str) -> Result<StatusHandle, BotError>;

    async fn edit_status(&self, handle: &StatusHandle, content: &str) -> Result<(), BotError>;

    async fn delete_status(&self, handle: &StatusHandle) -> Result<(), BotError>;

    /// Replace the deferred reply's content.
    async fn edit_reply(&self, content: &str) -> Result<(), BotError>;

    async fn follow_up(&self, content: &str, ephemeral: bool) -> Result<(), BotError>;

    /// Post a plain channel message, independent of the interaction token.
    async fn send_to_channel(&self, content: &str) -> Result<(), BotError>;
}

/// Follow up, falling back to a channel message once the interaction token
/// can no longer be used (it expires 15 minutes after the command).
async fn follow_up_or_channel(
    reply: &dyn InvocationReply,
    invocation: &Invocation,
    content: &str,
    ephemeral: bool,
) -> Result<(), BotError> {
    if let Err(e) = reply.follow_up(content, ephemeral).await {
        warn!(
            "Follow-up failed, posting to the channel instead: {} (corr_id={})",
            e, invocation.correlation_id
        );
        reply.send_to_channel(content).await?;
    }
    Ok(())
}

/// Post the summary as one or more public follow-ups.
///
/// # Errors
///
/// Returns the first error from posting a chunk.
pub async fn deliver_summary(
    reply: &dyn InvocationReply,
    invocation: &Invocation,
    summary: &str,
) -> Result<(), BotError> {
    let chunks = summary_messages(&invocation.target_user_tag, summary);
    for chunk in &chunks {
        follow_up_or_channel(reply, invocation, chunk, false).await?;
    }
    info!(
        "Summary for {} posted in {} message(s) (corr_id={})",
        invocation.target_user_tag,
        chunks.len(),
        invocation.correlation_id
    );
    Ok(())
}

/// # Errors
///
/// Returns an error if the follow-up could not be posted.
pub async fn notify_no_messages(
    reply: &dyn InvocationReply,
    invocation: &Invocation,
) -> Result<(), BotError> {
    follow_up_or_channel(
        reply,
        invocation,
        &no_messages_text(&invocation.target_user_tag),
        false,
    )
    .await
}

/// Report a summarization failure privately to the invoking user, or publicly
/// if the interaction has expired. Delivery errors are only logged.
pub async fn deliver_summarize_failure(reply: &dyn InvocationReply, invocation: &Invocation) {
    if let Err(e) = follow_up_or_channel(reply, invocation, SUMMARIZE_FAILURE_MESSAGE, true).await
    {
        error!(
            "Failed to send summarization error notice: {} (corr_id={})",
            e, invocation.correlation_id
        );
    }
}

/// Overwrite the deferred reply with a failure notice, logging if that fails too.
pub async fn deliver_reply_failure(
    reply: &dyn InvocationReply,
    invocation: &Invocation,
    message: &str,
) {
    if let Err(e) = reply.edit_reply(message).await {
        error!(
            "Failed to report '{}' to the channel: {} (corr_id={})",
            message, e, invocation.correlation_id
        );
    }
}
