use tokio::sync::Semaphore;
use tracing::{error, info, warn};

use super::collect::{HistoryCollector, HistorySource};
use super::deliver::{
    InvocationReply, deliver_reply_failure, deliver_summarize_failure, deliver_summary,
    notify_no_messages,
};
use super::progress::StatusMessage;
use super::{FETCH_FAILURE_MESSAGE, SETUP_FAILURE_MESSAGE};
use crate::ai::Summarizer;
use crate::core::config::CollectorSettings;
use crate::core::models::{Invocation, InvocationOutcome};

/// Run one `/summarize` invocation from defer to final message.
///
/// When `admission` is given, a permit is held from just after the defer until
/// the invocation finishes. Every failure is handled here and reported in the
/// channel; nothing propagates to the caller beyond the returned outcome.
pub async fn run_invocation(
    invocation: &Invocation,
    settings: &CollectorSettings,
    history: &dyn HistorySource,
    reply: &dyn InvocationReply,
    summarizer: &dyn Summarizer,
    admission: Option<&Semaphore>,
) -> InvocationOutcome {
    info!(
        "Summarize requested for user {} ({}) in channel {} (corr_id={})",
        invocation.target_user_tag,
        invocation.target_user_id,
        invocation.channel_id,
        invocation.correlation_id
    );

    if let Err(e) = reply.defer().await {
        error!(
            "Failed to defer reply: {} (corr_id={})",
            e, invocation.correlation_id
        );
        deliver_reply_failure(reply, invocation, SETUP_FAILURE_MESSAGE).await;
        return InvocationOutcome::SetupFailed;
    }

    // Acknowledged above, so queueing here cannot expire the interaction.
    let _permit = match admission {
        Some(permits) => match permits.acquire().await {
            Ok(permit) => Some(permit),
            Err(e) => {
                error!(
                    "Concurrency limiter closed: {} (corr_id={})",
                    e, invocation.correlation_id
                );
                deliver_reply_failure(reply, invocation, SETUP_FAILURE_MESSAGE).await;
                return InvocationOutcome::SetupFailed;
            }
        },
        None => None,
    };

    let status = match StatusMessage::open(reply, &invocation.target_user_tag).await {
        Ok(status) => status,
        Err(e) => {
            error!(
                "Error sending status message: {} (corr_id={})",
                e, invocation.correlation_id
            );
            deliver_reply_failure(reply, invocation, SETUP_FAILURE_MESSAGE).await;
            return InvocationOutcome::SetupFailed;
        }
    };

    let collector = HistoryCollector::new(invocation, settings, history, &status);
    let accumulator = match collector.run().await {
        Ok(accumulator) => accumulator,
        Err(e) => {
            error!(
                "Error fetching messages: {} (corr_id={})",
                e, invocation.correlation_id
            );
            deliver_reply_failure(reply, invocation, FETCH_FAILURE_MESSAGE).await;
            return InvocationOutcome::FetchFailed;
        }
    };

    if accumulator.is_empty() {
        info!(
            "No messages from {} inside the retention window (corr_id={})",
            invocation.target_user_tag, invocation.correlation_id
        );
        if let Err(e) = notify_no_messages(reply, invocation).await {
            error!(
                "Failed to send empty-result notice: {} (corr_id={})",
                e, invocation.correlation_id
            );
            return InvocationOutcome::NoMessages;
        }
        remove_status(status, invocation).await;
        return InvocationOutcome::NoMessages;
    }

    let summary = match summarizer.summarize(&accumulator.joined()).await {
        Ok(summary) => summary,
        Err(e) => {
            error!(
                "Error with OpenAI API: {} (corr_id={})",
                e, invocation.correlation_id
            );
            deliver_summarize_failure(reply, invocation).await;
            return InvocationOutcome::SummarizeFailed;
        }
    };
    info!(
        "Summary generated successfully (corr_id={})",
        invocation.correlation_id
    );

    if let Err(e) = deliver_summary(reply, invocation, &summary).await {
        error!(
            "Failed to post summary: {} (corr_id={})",
            e, invocation.correlation_id
        );
        deliver_summarize_failure(reply, invocation).await;
        return InvocationOutcome::SummarizeFailed;
    }

    remove_status(status, invocation).await;
    InvocationOutcome::Summarized
}

async fn remove_status(status: StatusMessage<'_>, invocation: &Invocation) {
    if let Err(e) = status.delete().await {
        warn!(
            "Failed to delete status message: {} (corr_id={})",
            e, invocation.correlation_id
        );
    }
}
