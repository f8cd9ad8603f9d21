//! serenity-backed implementations of the history and reply traits.

use async_trait::async_trait;
use serenity::all::{
    ChannelId, CommandInteraction, CreateInteractionResponseFollowup, EditInteractionResponse,
    EditMessage, GetMessages, Http, Message, MessageId,
};
use std::sync::Arc;

use crate::core::models::{HistoryMessage, StatusHandle};
use crate::errors::BotError;
use crate::worker::collect::HistorySource;
use crate::worker::deliver::InvocationReply;

fn history_message(message: Message) -> HistoryMessage {
    HistoryMessage {
        id: message.id.get(),
        author_id: message.author.id.get(),
        created_at: *message.timestamp,
        content: message.content,
    }
}

/// Reads channel history through the Discord REST API.
pub struct DiscordHistory {
    http: Arc<Http>,
}

impl DiscordHistory {
    #[must_use]
    pub fn new(http: Arc<Http>) -> Self {
        Self { http }
    }
}

#[async_trait]
impl HistorySource for DiscordHistory {
    async fn fetch_page(
        &self,
        channel_id: u64,
        before: Option<u64>,
        limit: u8,
    ) -> Result<Vec<HistoryMessage>, BotError> {
        let mut request = GetMessages::new().limit(limit);
        if let Some(before) = before {
            request = request.before(MessageId::new(before));
        }

        let messages = ChannelId::new(channel_id)
            .messages(&self.http, request)
            .await?;

        Ok(messages.into_iter().map(history_message).collect())
    }
}

/// Reply surface bound to one slash-command interaction.
pub struct InteractionReply {
    http: Arc<Http>,
    command: CommandInteraction,
}

impl InteractionReply {
    #[must_use]
    pub fn new(http: Arc<Http>, command: CommandInteraction) -> Self {
        Self { http, command }
    }
}

#[async_trait]
impl InvocationReply for InteractionReply {
    async fn defer(&self) -> Result<(), BotError> {
        self.command.defer(&self.http).await?;
        Ok(())
    }

    async fn send_status(&self, content: &str) -> Result<StatusHandle, BotError> {
        let message = self
            .command
            .create_followup(
                &self.http,
                CreateInteractionResponseFollowup::new().content(content),
            )
            .await?;
        Ok(StatusHandle {
            channel_id: message.channel_id.get(),
            message_id: message.id.get(),
        })
    }

    async fn edit_status(&self, handle: &StatusHandle, content: &str) -> Result<(), BotError> {
        ChannelId::new(handle.channel_id)
            .edit_message(
                &self.http,
                MessageId::new(handle.message_id),
                EditMessage::new().content(content),
            )
            .await?;
        Ok(())
    }

    async fn delete_status(&self, handle: &StatusHandle) -> Result<(), BotError> {
        ChannelId::new(handle.channel_id)
            .delete_message(&self.http, MessageId::new(handle.message_id))
            .await?;
        Ok(())
    }

    async fn edit_reply(&self, content: &str) -> Result<(), BotError> {
        self.command
            .edit_response(&self.http, EditInteractionResponse::new().content(content))
            .await?;
        Ok(())
    }

    async fn follow_up(&self, content: &str, ephemeral: bool) -> Result<(), BotError> {
        self.command
            .create_followup(
                &self.http,
                CreateInteractionResponseFollowup::new()
                    .content(content)
                    .ephemeral(ephemeral),
            )
            .await?;
        Ok(())
    }

    async fn send_to_channel(&self, content: &str) -> Result<(), BotError> {
        self.command.channel_id.say(&self.http, content).await?;
        Ok(())
    }
}
