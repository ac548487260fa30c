//! # OpenRouter Feedback Generator
//!
//! This module provides an implementation of the [`FeedbackGenerator`] trait backed by the
//! OpenRouter chat-completions API. The generator forwards the assembled conversation and
//! returns the first choice's text, trimmed.
//!
//! ## Failure modes
//!
//! - The service cannot be reached or times out: [`MarkerError::Transport`].
//! - The service answers with a non-200 status: [`MarkerError::Upstream`], carrying the
//!   service's own error body (as JSON when possible).
//! - The service answers 200 without `choices[0].message.content`:
//!   [`MarkerError::MalformedResponse`].
//!
//! ## Environment
//!
//! Requires `OPENROUTER_API_KEY`. `OPENROUTER_HTTP_REFERRER` and `OPENROUTER_APP_TITLE` are
//! sent as the `HTTP-Referer` and `X-Title` attribution headers when set.

use crate::error::MarkerError;
use crate::traits::feedback::{ChatMessage, FeedbackGenerator, GenerationRequest};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use util::config;

/// Connection settings for [`OpenRouterFeedback`].
#[derive(Debug, Clone)]
pub struct OpenRouterSettings {
    pub url: String,
    pub api_key: String,
    pub model: String,
    pub http_referrer: Option<String>,
    pub app_title: Option<String>,
    pub timeout: Duration,
}

impl OpenRouterSettings {
    pub fn from_config() -> Self {
        Self {
            url: config::openrouter_url(),
            api_key: config::openrouter_api_key(),
            model: config::openrouter_model(),
            http_referrer: config::openrouter_http_referrer(),
            app_title: config::openrouter_app_title(),
            timeout: Duration::from_secs(config::timeout_secs()),
        }
    }
}

/// Generator that calls the OpenRouter chat-completions endpoint.
pub struct OpenRouterFeedback {
    client: reqwest::Client,
    settings: OpenRouterSettings,
}

/// Request body for the chat-completions API.
#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
    max_tokens: u32,
}

/// Response from the chat-completions API.
#[derive(Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

impl OpenRouterFeedback {
    /// Builds the generator with a client whose requests time out after `settings.timeout`.
    pub fn new(settings: OpenRouterSettings) -> Result<Self, MarkerError> {
        let client = reqwest::Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(|e| MarkerError::Transport(e.to_string()))?;
        Ok(Self { client, settings })
    }

    pub fn from_config() -> Result<Self, MarkerError> {
        Self::new(OpenRouterSettings::from_config())
    }
}

#[async_trait]
impl FeedbackGenerator for OpenRouterFeedback {
    fn backend(&self) -> &str {
        "openrouter"
    }

    fn model(&self) -> &str {
        &self.settings.model
    }

    fn check_credentials(&self) -> Result<(), MarkerError> {
        if self.settings.api_key.trim().is_empty() {
            return Err(MarkerError::MissingCredential("OPENROUTER_API_KEY".into()));
        }
        Ok(())
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<String, MarkerError> {
        self.check_credentials()?;

        let body = ChatCompletionRequest {
            model: &self.settings.model,
            messages: &request.conversation,
            temperature: request.temperature,
            max_tokens: request.max_output_tokens,
        };

        let mut builder = self
            .client
            .post(&self.settings.url)
            .bearer_auth(&self.settings.api_key)
            .json(&body);
        if let Some(referrer) = &self.settings.http_referrer {
            builder = builder.header("HTTP-Referer", referrer);
        }
        if let Some(title) = &self.settings.app_title {
            builder = builder.header("X-Title", title);
        }

        tracing::debug!(model = %self.settings.model, "sending chat completion request");
        let response = builder.send().await.map_err(|e| {
            tracing::warn!(error = %e, "OpenRouter request failed");
            MarkerError::Transport(e.to_string())
        })?;

        let status = response.status();
        let response_text = response
            .text()
            .await
            .map_err(|e| MarkerError::Transport(e.to_string()))?;

        if status != StatusCode::OK {
            tracing::warn!(status = status.as_u16(), "OpenRouter returned an error status");
            let detail = serde_json::from_str::<Value>(&response_text)
                .unwrap_or(Value::String(response_text));
            return Err(MarkerError::Upstream {
                status: status.as_u16(),
                detail,
            });
        }

        let response = serde_json::from_str::<ChatCompletionResponse>(&response_text)
            .map_err(|_| MarkerError::MalformedResponse(response_text.clone()))?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .ok_or(MarkerError::MalformedResponse(response_text))
    }
}
