//! The per-invocation status message that shows the running fetch count.

use async_trait::async_trait;
use tracing::info;

use super::collect::ProgressSink;
use super::deliver::InvocationReply;
use crate::core::models::StatusHandle;
use crate::discord::response_builder::status_text;
use crate::errors::BotError;

pub struct StatusMessage<'a> {
    reply: &'a dyn InvocationReply,
    handle: StatusHandle,
    user_tag: String,
}

impl<'a> StatusMessage<'a> {
    /// Post the initial `Messages fetched: 0` status.
    ///
    /// # Errors
    ///
    /// Returns an error if the status message could not be sent.
    pub async fn open(reply: &'a dyn InvocationReply, user_tag: &str) -> Result<Self, BotError> {
        let handle = reply.send_status(&status_text(user_tag, 0)).await?;
        info!("Started fetching messages for {}", user_tag);
        Ok(Self {
            reply,
            handle,
            user_tag: user_tag.to_string(),
        })
    }

    #[must_use]
    pub fn handle(&self) -> StatusHandle {
        self.handle
    }

    /// # Errors
    ///
    /// Returns an error if Discord rejects the delete.
    pub async fn delete(self) -> Result<(), BotError> {
        self.reply.delete_status(&self.handle).await
    }
}

#[async_trait]
impl<'a> ProgressSink for StatusMessage<'a> {
    async fn report(&self, total: usize) -> Result<(), BotError> {
        self.reply
            .edit_status(&self.handle, &status_text(&self.user_tag, total))
            .await
    }
}
