//! LLM (`OpenAI`) API client module
//!
//! Encapsulates the single chat-completion call used to summarize a user's messages.

use async_trait::async_trait;
use openai_api_rs::v1::chat_completion::ChatCompletionMessage;
use reqwest::Client;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use tracing::info;

use super::Summarizer;
use super::prompt_builder::{build_prompt, fit_to_budget};
use crate::core::config::{AppConfig, MAX_SUMMARY_TOKENS, SUMMARY_TEMPERATURE};
use crate::errors::BotError;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatCompletionMessage],
    max_tokens: u32,
    temperature: f64,
}

#[must_use]
pub fn estimate_tokens(text: &str) -> usize {
    text.chars().count() / 4 + 1
}

/// LLM API client for generating summaries
pub struct LlmClient {
    http: Client,
    api_key: String,
    org_id: Option<String>,
    model_name: String,
    base_url: String,
    max_input_tokens: usize,
}

impl LlmClient {
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(config: &AppConfig) -> Result<Self, BotError> {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| BotError::HttpError(format!("Failed to build OpenAI HTTP client: {e}")))?;

        Ok(Self {
            http,
            api_key: config.openai_api_key.clone(),
            org_id: config.openai_org_id.clone(),
            model_name: config.model().to_string(),
            base_url: config.base_url().to_string(),
            max_input_tokens: config.max_input_tokens(),
        })
    }

    #[must_use]
    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    fn headers(&self) -> Result<HeaderMap, BotError> {
        let mut headers = HeaderMap::new();
        let auth_value = HeaderValue::from_str(&format!("Bearer {}", self.api_key))
            .map_err(|e| BotError::HttpError(format!("Invalid Authorization header: {e}")))?;
        headers.insert(AUTHORIZATION, auth_value);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if let Some(org) = &self.org_id {
            let org_value = HeaderValue::from_str(org).map_err(|e| {
                BotError::HttpError(format!("Invalid OpenAI-Organization header: {e}"))
            })?;
            headers.insert("OpenAI-Organization", org_value);
        }
        Ok(headers)
    }

    /// Send one chat-completion request and return the first choice's text.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the API answers with a non-success
    /// status, or the response carries no completion text.
    pub async fn generate_summary(
        &self,
        prompt: Vec<ChatCompletionMessage>,
    ) -> Result<String, BotError> {
        #[cfg(feature = "debug-logs")]
        info!("Using ChatGPT prompt:\n{:?}", prompt);

        #[cfg(not(feature = "debug-logs"))]
        info!(
            "Generating summary with {} messages in prompt (model={})",
            prompt.len(),
            self.model_name
        );

        let request_body = CompletionRequest {
            model: &self.model_name,
            messages: &prompt,
            max_tokens: MAX_SUMMARY_TOKENS,
            temperature: SUMMARY_TEMPERATURE,
        };

        let response = self
            .http
            .post(format!("{}/chat/completions", self.base_url))
            .headers(self.headers()?)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| BotError::HttpError(format!("OpenAI API request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_else(|e| {
                format!("Failed to read error response body (status {status}): {e}")
            });
            return Err(BotError::OpenAIError(format!(
                "OpenAI API error (status {status}): {error_text}"
            )));
        }

        let response_json: Value = response
            .json()
            .await
            .map_err(|e| BotError::OpenAIError(format!("Failed to parse OpenAI response: {e}")))?;

        extract_completion_text(&response_json)
    }
}

/// Pull `choices[0].message.content` out of a chat-completion response.
pub(crate) fn extract_completion_text(response_json: &Value) -> Result<String, BotError> {
    if let Some(message) = response_json
        .get("error")
        .and_then(|e| e.get("message"))
        .and_then(Value::as_str)
    {
        return Err(BotError::OpenAIError(message.to_string()));
    }

    response_json
        .get("choices")
        .and_then(Value::as_array)
        .and_then(|choices| choices.first())
        .and_then(|choice| choice.get("message"))
        .and_then(|message| message.get("content"))
        .and_then(Value::as_str)
        .filter(|text| !text.trim().is_empty())
        .map(ToString::to_string)
        .ok_or_else(|| BotError::OpenAIError("No text in response".to_string()))
}

#[async_trait]
impl Summarizer for LlmClient {
    async fn summarize(&self, text: &str) -> Result<String, BotError> {
        let estimated = estimate_tokens(text);
        info!("Estimated input tokens: {}", estimated);

        let text = fit_to_budget(text, self.max_input_tokens);
        self.generate_summary(build_prompt(&text)).await
    }
}
