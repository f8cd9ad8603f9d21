use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

/// One message from a channel's history, reduced to what the collector needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryMessage {
    pub id: u64,
    pub author_id: u64,
    pub created_at: DateTime<Utc>,
    pub content: String,
}

/// A single `/summarize` execution for one user in one channel.
#[derive(Debug, Clone)]
pub struct Invocation {
    pub correlation_id: String,
    pub target_user_id: u64,
    pub target_user_tag: String,
    pub channel_id: u64,
    pub invoked_at: DateTime<Utc>,
}

impl Invocation {
    #[must_use]
    pub fn new(
        target_user_id: u64,
        target_user_tag: impl Into<String>,
        channel_id: u64,
        invoked_at: DateTime<Utc>,
    ) -> Self {
        Self {
            correlation_id: Uuid::new_v4().to_string(),
            target_user_id,
            target_user_tag: target_user_tag.into(),
            channel_id,
            invoked_at,
        }
    }

    /// Oldest creation time still inside the retention window.
    #[must_use]
    pub fn horizon(&self, retention: Duration) -> DateTime<Utc> {
        self.invoked_at - retention
    }
}

/// Locates the editable status message posted for an invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusHandle {
    pub channel_id: u64,
    pub message_id: u64,
}

/// How an invocation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvocationOutcome {
    Summarized,
    NoMessages,
    SetupFailed,
    FetchFailed,
    SummarizeFailed,
}
