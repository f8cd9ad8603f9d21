//! Per-invocation work: collect history, summarize, deliver

pub mod collect;
pub mod deliver;
pub mod handler;
pub mod progress;

pub use handler::run_invocation;

/// Shown when the initial status message cannot be posted.
pub const SETUP_FAILURE_MESSAGE: &str = "Failed to send status message.";

/// Shown when a history page cannot be fetched.
pub const FETCH_FAILURE_MESSAGE: &str = "Failed to fetch messages.";

/// Shown (ephemerally) when the completion request fails.
pub const SUMMARIZE_FAILURE_MESSAGE: &str = "An error occurred while summarizing the messages.";
