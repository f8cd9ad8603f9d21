//! Backward pagination over a channel's history.
//!
//! The collector walks pages newest-to-oldest, keeps the target user's
//! messages that fall inside the retention window, and reports the running
//! total after every page. It stops on an empty page or once a page reaches
//! past the horizon.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::core::config::CollectorSettings;
use crate::core::models::{HistoryMessage, Invocation};
use crate::errors::BotError;

/// Source of channel history pages.
#[async_trait]
pub trait HistorySource: Send + Sync {
    /// Fetch up to `limit` messages from `channel_id`, newest first. When `before`
    /// is set only messages strictly older than that message id are returned.
    /// An empty page means the history is exhausted.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying transport or permissions check fails.
    async fn fetch_page(
        &self,
        channel_id: u64,
        before: Option<u64>,
        limit: u8,
    ) -> Result<Vec<HistoryMessage>, BotError>;
}

/// Receives the running total after each page.
#[async_trait]
pub trait ProgressSink: Send + Sync {
    /// # Errors
    ///
    /// Returns an error if the progress display could not be updated.
    async fn report(&self, total: usize) -> Result<(), BotError>;
}

/// Message bodies collected for one invocation, newest first.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Accumulator {
    bodies: Vec<String>,
}

impl Accumulator {
    fn extend<'a>(&mut self, messages: impl Iterator<Item = &'a HistoryMessage>) -> usize {
        let before = self.bodies.len();
        self.bodies.extend(messages.map(|m| m.content.clone()));
        self.bodies.len() - before
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.bodies.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    #[must_use]
    pub fn bodies(&self) -> &[String] {
        &self.bodies
    }

    /// Newline-joined text handed to the summarizer. Blank bodies
    /// (attachment-only posts) keep their empty line.
    #[must_use]
    pub fn joined(&self) -> String {
        self.bodies.join("\n")
    }
}

/// Messages from a page written by `author_id` at or after `horizon`, in page order.
pub fn in_window<'a>(
    page: &'a [HistoryMessage],
    author_id: u64,
    horizon: DateTime<Utc>,
) -> impl Iterator<Item = &'a HistoryMessage> {
    page.iter()
        .filter(move |m| m.author_id == author_id && m.created_at >= horizon)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CollectorState {
    Fetching { before: Option<u64> },
    Filtering { page: Vec<HistoryMessage> },
    Delaying { before: u64 },
    Done,
    Failed,
}

impl CollectorState {
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, CollectorState::Done | CollectorState::Failed)
    }
}

pub struct HistoryCollector<'a> {
    source: &'a dyn HistorySource,
    progress: &'a dyn ProgressSink,
    channel_id: u64,
    author_id: u64,
    horizon: DateTime<Utc>,
    page_size: u8,
    page_delay: Duration,
    correlation_id: String,
    state: CollectorState,
    accumulator: Accumulator,
    pages_fetched: usize,
}

impl<'a> HistoryCollector<'a> {
    #[must_use]
    pub fn new(
        invocation: &Invocation,
        settings: &CollectorSettings,
        source: &'a dyn HistorySource,
        progress: &'a dyn ProgressSink,
    ) -> Self {
        Self {
            source,
            progress,
            channel_id: invocation.channel_id,
            author_id: invocation.target_user_id,
            horizon: invocation.horizon(settings.retention),
            page_size: settings.page_size,
            page_delay: settings.page_delay,
            correlation_id: invocation.correlation_id.clone(),
            state: CollectorState::Fetching { before: None },
            accumulator: Accumulator::default(),
            pages_fetched: 0,
        }
    }

    #[must_use]
    pub fn state(&self) -> &CollectorState {
        &self.state
    }

    #[must_use]
    pub fn pages_fetched(&self) -> usize {
        self.pages_fetched
    }

    /// Advance by one transition.
    ///
    /// # Errors
    ///
    /// Returns the fetch error when a page cannot be retrieved. The collector is
    /// left in [`CollectorState::Failed`].
    pub async fn step(&mut self) -> Result<(), BotError> {
        let state = std::mem::replace(&mut self.state, CollectorState::Failed);
        self.state = match state {
            CollectorState::Fetching { before } => {
                let page = self
                    .source
                    .fetch_page(self.channel_id, before, self.page_size)
                    .await?;
                self.pages_fetched += 1;
                debug!(
                    "Fetched page {} with {} messages (corr_id={})",
                    self.pages_fetched,
                    page.len(),
                    self.correlation_id
                );
                if page.is_empty() {
                    CollectorState::Done
                } else {
                    CollectorState::Filtering { page }
                }
            }
            CollectorState::Filtering { page } => self.filter_page(&page).await,
            CollectorState::Delaying { before } => {
                tokio::time::sleep(self.page_delay).await;
                CollectorState::Fetching {
                    before: Some(before),
                }
            }
            terminal @ (CollectorState::Done | CollectorState::Failed) => terminal,
        };
        Ok(())
    }

    async fn filter_page(&mut self, page: &[HistoryMessage]) -> CollectorState {
        let added = self
            .accumulator
            .extend(in_window(page, self.author_id, self.horizon));
        let total = self.accumulator.total();

        if let Err(e) = self.progress.report(total).await {
            warn!(
                "Error updating status message: {} (corr_id={})",
                e, self.correlation_id
            );
        } else {
            info!(
                "Fetched {} messages so far (+{}, corr_id={})",
                total, added, self.correlation_id
            );
        }

        // Pagination follows the raw page so other authors never stall it.
        match page.last() {
            Some(oldest) if oldest.created_at < self.horizon => CollectorState::Done,
            Some(oldest) => CollectorState::Delaying { before: oldest.id },
            None => CollectorState::Done,
        }
    }

    /// Drive the collector until history is exhausted or the horizon is crossed.
    ///
    /// # Errors
    ///
    /// Returns the first page fetch error. Whatever was collected up to that
    /// point is dropped.
    pub async fn run(mut self) -> Result<Accumulator, BotError> {
        while !self.state.is_terminal() {
            self.step().await?;
        }
        info!(
            "Total messages fetched: {} across {} pages (corr_id={})",
            self.accumulator.total(),
            self.pages_fetched,
            self.correlation_id
        );
        Ok(self.accumulator)
    }
}
