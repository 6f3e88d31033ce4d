//! Base trait for text-generation collaborators.
//!
//! The translation service treats the model as an opaque, untrusted text
//! source: it hands over a system prompt plus the user text and gets raw text
//! back. Everything provider-specific (URLs, auth headers, response shapes)
//! lives behind [`BaseLLM`].

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::LlmError;

/// Role of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

/// A single message in a chat-completions conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// Builds the two-message conversation every translation call sends.
pub fn instruction_messages(system_prompt: &str, user_text: &str) -> Vec<ChatMessage> {
    vec![ChatMessage::system(system_prompt), ChatMessage::user(user_text)]
}

/// A text-generation model.
///
/// Implementations should surface timeouts, authentication failures and
/// unusable replies as [`LlmError`] rather than returning empty text.
#[async_trait]
pub trait BaseLLM: Send + Sync + fmt::Debug {
    /// Model or deployment identifier, for logging.
    fn model(&self) -> &str;

    /// Provider name, for logging.
    fn provider(&self) -> &str;

    /// Generate a reply to `user_text` under `system_prompt`.
    ///
    /// Returns the raw assistant text exactly as the model produced it.
    async fn generate(
        &self,
        system_prompt: &str,
        user_text: &str,
        temperature: f64,
    ) -> Result<String, LlmError>;
}
