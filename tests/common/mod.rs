//! In-memory fakes for the collector, reply and summarizer traits.
#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use std::sync::Mutex;

use recap::ai::Summarizer;
use recap::core::models::{HistoryMessage, StatusHandle};
use recap::errors::BotError;
use recap::worker::collect::{HistorySource, ProgressSink};
use recap::worker::deliver::InvocationReply;

pub const TARGET: u64 = 42;
pub const OTHER: u64 = 7;
pub const CHANNEL: u64 = 1000;

pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
}

/// Build a channel history, newest first, with snowflake-like ids that grow
/// with creation time. Entries are `(author, age, body)` in any order.
pub fn history(entries: &[(u64, Duration, &str)]) -> Vec<HistoryMessage> {
    let mut messages: Vec<HistoryMessage> = entries
        .iter()
        .map(|(author, age, body)| HistoryMessage {
            id: 0,
            author_id: *author,
            created_at: now() - *age,
            content: (*body).to_string(),
        })
        .collect();
    messages.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    let count = messages.len() as u64;
    for (i, message) in messages.iter_mut().enumerate() {
        message.id = 10_000 + count - i as u64;
    }
    messages
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchCall {
    pub before: Option<u64>,
    pub limit: u8,
    pub returned: usize,
}

/// Serves pages from a fixed newest-first history.
pub struct FakeHistory {
    messages: Vec<HistoryMessage>,
    fail_on_call: Option<usize>,
    calls: Mutex<Vec<FetchCall>>,
}

impl FakeHistory {
    pub fn new(messages: Vec<HistoryMessage>) -> Self {
        Self {
            messages,
            fail_on_call: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Make the n-th fetch (1-based) fail.
    pub fn failing_on(mut self, call: usize) -> Self {
        self.fail_on_call = Some(call);
        self
    }

    pub fn calls(&self) -> Vec<FetchCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl HistorySource for FakeHistory {
    async fn fetch_page(
        &self,
        _channel_id: u64,
        before: Option<u64>,
        limit: u8,
    ) -> Result<Vec<HistoryMessage>, BotError> {
        let mut calls = self.calls.lock().unwrap();
        if self.fail_on_call == Some(calls.len() + 1) {
            calls.push(FetchCall {
                before,
                limit,
                returned: 0,
            });
            return Err(BotError::DiscordError("Missing Access".to_string()));
        }

        let page: Vec<HistoryMessage> = self
            .messages
            .iter()
            .filter(|m| before.is_none_or(|b| m.id < b))
            .take(usize::from(limit))
            .cloned()
            .collect();
        calls.push(FetchCall {
            before,
            limit,
            returned: page.len(),
        });
        Ok(page)
    }
}

#[derive(Default)]
pub struct RecordingProgress {
    pub reports: Mutex<Vec<usize>>,
    pub fail: bool,
}

impl RecordingProgress {
    pub fn failing() -> Self {
        Self {
            reports: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn reports(&self) -> Vec<usize> {
        self.reports.lock().unwrap().clone()
    }
}

#[async_trait]
impl ProgressSink for RecordingProgress {
    async fn report(&self, total: usize) -> Result<(), BotError> {
        self.reports.lock().unwrap().push(total);
        if self.fail {
            return Err(BotError::DiscordError("Unknown Message".to_string()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplyEvent {
    Defer,
    SendStatus(String),
    EditStatus(String),
    DeleteStatus,
    EditReply(String),
    FollowUp { content: String, ephemeral: bool },
    ChannelMessage(String),
}

pub const STATUS: StatusHandle = StatusHandle {
    channel_id: CHANNEL,
    message_id: 99,
};

#[derive(Default)]
pub struct FakeReply {
    pub events: Mutex<Vec<ReplyEvent>>,
    pub fail_send_status: bool,
    pub fail_edit_status: bool,
    /// Simulates an expired interaction token.
    pub fail_follow_up: bool,
}

impl FakeReply {
    pub fn events(&self) -> Vec<ReplyEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn follow_ups(&self) -> Vec<(String, bool)> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                ReplyEvent::FollowUp { content, ephemeral } => Some((content, ephemeral)),
                _ => None,
            })
            .collect()
    }

    fn push(&self, event: ReplyEvent) {
        self.events.lock().unwrap().push(event);
    }
}

#[async_trait]
impl InvocationReply for FakeReply {
    async fn defer(&self) -> Result<(), BotError> {
        self.push(ReplyEvent::Defer);
        Ok(())
    }

    async fn send_status(&self, content: &str) -> Result<StatusHandle, BotError> {
        if self.fail_send_status {
            return Err(BotError::DiscordError("Missing Permissions".to_string()));
        }
        self.push(ReplyEvent::SendStatus(content.to_string()));
        Ok(STATUS)
    }

    async fn edit_status(&self, handle: &StatusHandle, content: &str) -> Result<(), BotError> {
        assert_eq!(*handle, STATUS);
        if self.fail_edit_status {
            return Err(BotError::DiscordError("Unknown Message".to_string()));
        }
        self.push(ReplyEvent::EditStatus(content.to_string()));
        Ok(())
    }

    async fn delete_status(&self, handle: &StatusHandle) -> Result<(), BotError> {
        assert_eq!(*handle, STATUS);
        self.push(ReplyEvent::DeleteStatus);
        Ok(())
    }

    async fn edit_reply(&self, content: &str) -> Result<(), BotError> {
        self.push(ReplyEvent::EditReply(content.to_string()));
        Ok(())
    }

    async fn follow_up(&self, content: &str, ephemeral: bool) -> Result<(), BotError> {
        if self.fail_follow_up {
            return Err(BotError::DiscordError("Invalid Webhook Token".to_string()));
        }
        self.push(ReplyEvent::FollowUp {
            content: content.to_string(),
            ephemeral,
        });
        Ok(())
    }

    async fn send_to_channel(&self, content: &str) -> Result<(), BotError> {
        self.push(ReplyEvent::ChannelMessage(content.to_string()));
        Ok(())
    }
}

/// Returns a canned completion and remembers every input text.
pub struct StubSummarizer {
    response: Result<String, String>,
    pub inputs: Mutex<Vec<String>>,
}

impl StubSummarizer {
    pub fn ok(summary: &str) -> Self {
        Self {
            response: Ok(summary.to_string()),
            inputs: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(error: &str) -> Self {
        Self {
            response: Err(error.to_string()),
            inputs: Mutex::new(Vec::new()),
        }
    }

    pub fn inputs(&self) -> Vec<String> {
        self.inputs.lock().unwrap().clone()
    }
}

#[async_trait]
impl Summarizer for StubSummarizer {
    async fn summarize(&self, text: &str) -> Result<String, BotError> {
        self.inputs.lock().unwrap().push(text.to_string());
        self.response
            .clone()
            .map_err(BotError::OpenAIError)
    }
}
