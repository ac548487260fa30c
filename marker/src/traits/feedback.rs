//!
//! # Feedback Generator Trait
//!
//! This module defines the [`FeedbackGenerator`] trait and the [`GenerationRequest`] it
//! consumes. A generator is the external text-generation service seen as a black box:
//! a structured request goes in, free-form text (or a categorized [`MarkerError`]) comes out.
//!

use crate::error::MarkerError;
use crate::types::GenerationSettings;
use async_trait::async_trait;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

/// The request handed to a [`FeedbackGenerator`].
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    /// System instructions; also the first `conversation` turn.
    pub instructions: String,
    pub conversation: Vec<ChatMessage>,
    pub temperature: f32,
    pub max_output_tokens: u32,
}

impl GenerationRequest {
    /// A two-turn request: the system instructions followed by the user prompt.
    pub fn new(instructions: String, user_prompt: String, settings: GenerationSettings) -> Self {
        let conversation = vec![
            ChatMessage {
                role: Role::System,
                content: instructions.clone(),
            },
            ChatMessage {
                role: Role::User,
                content: user_prompt,
            },
        ];
        Self {
            instructions,
            conversation,
            temperature: settings.temperature,
            max_output_tokens: settings.max_output_tokens,
        }
    }
}

/// A pluggable text-generation backend.
///
/// Implementations must be shareable across concurrent requests.
#[async_trait]
pub trait FeedbackGenerator: Send + Sync {
    /// Short backend identifier, e.g. `openrouter`.
    fn backend(&self) -> &str;

    /// Model identifier reported by the health endpoint.
    fn model(&self) -> &str;

    /// Fails fast when the backend is missing credentials. Called before any parsing.
    fn check_credentials(&self) -> Result<(), MarkerError> {
        Ok(())
    }

    /// Sends the request and returns the generated text.
    async fn generate(&self, request: &GenerationRequest) -> Result<String, MarkerError>;
}
