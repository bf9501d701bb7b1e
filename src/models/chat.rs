//! Chat relay request models.

use serde::{Deserialize, Serialize};

/// Author of a chat turn.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

/// A single prior turn of the conversation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub content: String,
}

impl ChatTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }
}

/// Request body for `POST /api/ai-chatbot`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub chat_history: Vec<ChatTurn>,
}

/// Error body returned when the relay fails before streaming anything.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatFallback {
    pub response: String,
}
