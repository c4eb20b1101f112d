//! Generation provider trait and prompt message types

use async_trait::async_trait;
use futures_util::Stream;
use serde::{Deserialize, Serialize};
use std::pin::Pin;

use crate::error::Result;
use crate::types::chat::{ChatMessage, Role};

/// A lazy, finite sequence of answer fragments; concatenation yields the
/// full answer. Non-restartable: dropping it releases the upstream
/// connection.
pub type AnswerStream = Pin<Box<dyn Stream<Item = Result<String>> + Send>>;

/// Role of a provider-level prompt message
///
/// Unlike the wire-level [`Role`], prompts may carry a system persona.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PromptRole {
    /// Persona and behavioral rules
    System,
    /// Customer turn
    User,
    /// Assistant turn
    Assistant,
}

/// A message in a model request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptMessage {
    /// Message role
    pub role: PromptRole,
    /// Message text
    pub content: String,
}

impl PromptMessage {
    /// Create a system message
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: PromptRole::System,
            content: content.into(),
        }
    }

    /// Create a user message
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: PromptRole::User,
            content: content.into(),
        }
    }

    /// Create an assistant message
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: PromptRole::Assistant,
            content: content.into(),
        }
    }
}

impl From<&ChatMessage> for PromptMessage {
    fn from(message: &ChatMessage) -> Self {
        let role = match message.role {
            Role::User => PromptRole::User,
            Role::Assistant => PromptRole::Assistant,
        };
        Self {
            role,
            content: message.content.clone(),
        }
    }
}

/// Trait for hosted language-model inference
///
/// Implementations:
/// - `OpenAiClient`: hosted chat completions API
/// - test fakes returning scripted output
#[async_trait]
pub trait GenerationProvider: Send + Sync {
    /// Run a model request to completion and return the full text
    async fn complete(&self, messages: &[PromptMessage]) -> Result<String>;

    /// Run a model request in streaming mode
    ///
    /// Errors establishing the stream surface here; once the stream is
    /// returned, fragments arrive in provider order.
    async fn complete_stream(&self, messages: &[PromptMessage]) -> Result<AnswerStream>;

    /// The model identity, used in cache keys
    fn model(&self) -> &str;

    /// Provider name for logging
    fn name(&self) -> &str;
}
