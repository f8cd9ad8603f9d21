use chrono::Utc;
use serenity::all::{
    CommandInteraction, Context, CreateInteractionResponse, CreateInteractionResponseMessage,
    EventHandler, GatewayIntents, Interaction, Ready,
};
use serenity::async_trait;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{error, info, warn};

use super::client::{DiscordHistory, InteractionReply};
use super::commands::{SUMMARIZE_COMMAND, register_commands, target_user};
use crate::ai::{LlmClient, Summarizer};
use crate::core::config::{AppConfig, CollectorSettings};
use crate::core::models::Invocation;
use crate::errors::BotError;
use crate::worker::run_invocation;

/// Gateway intents the bot needs to read message history and content.
#[must_use]
pub fn intents() -> GatewayIntents {
    GatewayIntents::GUILDS | GatewayIntents::GUILD_MESSAGES | GatewayIntents::MESSAGE_CONTENT
}

/// Discord event handler holding the process-wide service handles.
pub struct RecapBot {
    summarizer: Arc<dyn Summarizer>,
    settings: CollectorSettings,
    permits: Option<Semaphore>,
}

impl RecapBot {
    /// Construct a `RecapBot` with an `LlmClient` built from `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the LLM client cannot be constructed.
    pub fn new(config: &AppConfig) -> Result<Self, BotError> {
        let llm_client = LlmClient::new(config)?;
        info!("Using model {}", llm_client.model_name());
        Ok(Self::with_summarizer(
            config,
            Arc::new(llm_client),
            CollectorSettings::default(),
        ))
    }

    #[must_use]
    pub fn with_summarizer(
        config: &AppConfig,
        summarizer: Arc<dyn Summarizer>,
        settings: CollectorSettings,
    ) -> Self {
        let permits = config
            .max_concurrent_summaries
            .map(Semaphore::new);
        Self {
            summarizer,
            settings,
            permits,
        }
    }

    async fn handle_summarize(&self, ctx: &Context, command: CommandInteraction) {
        let Some((user_id, user_tag)) = target_user(&command) else {
            warn!("/summarize invoked without a resolvable user option");
            let response = CreateInteractionResponse::Message(
                CreateInteractionResponseMessage::new()
                    .content("Please pick a user to summarize.")
                    .ephemeral(true),
            );
            if let Err(e) = command.create_response(&ctx.http, response).await {
                error!("Failed to respond to summarize command: {}", e);
            }
            return;
        };

        let invocation = Invocation::new(
            user_id.get(),
            user_tag,
            command.channel_id.get(),
            Utc::now(),
        );

        let history = DiscordHistory::new(Arc::clone(&ctx.http));
        let reply = InteractionReply::new(Arc::clone(&ctx.http), command);

        let outcome = run_invocation(
            &invocation,
            &self.settings,
            &history,
            &reply,
            self.summarizer.as_ref(),
            self.permits.as_ref(),
        )
        .await;

        info!(
            "Invocation finished with {:?} (corr_id={})",
            outcome, invocation.correlation_id
        );
    }
}

#[async_trait]
impl EventHandler for RecapBot {
    async fn ready(&self, ctx: Context, ready: Ready) {
        info!("Logged in as {}!", ready.user.tag());

        let guilds = ready.guilds.iter().map(|guild| guild.id).collect();
        tokio::spawn(register_commands(Arc::clone(&ctx.http), guilds));
    }

    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        let Interaction::Command(command) = interaction else {
            return;
        };

        info!(
            "Received slash command: {} from {}",
            command.data.name, command.user.name
        );

        if command.data.name == SUMMARIZE_COMMAND {
            self.handle_summarize(&ctx, command).await;
        } else {
            warn!("Unknown command: {}", command.data.name);
        }
    }
}
