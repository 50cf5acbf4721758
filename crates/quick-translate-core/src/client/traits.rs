use async_trait::async_trait;
use serde::Serialize;

use crate::error::Result;

/// Role of a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

/// A single chat message
#[derive(Debug, Clone, PartialEq, Serialize)]
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

/// Backend-independent chat completion request.
///
/// The model id is not part of the request; the client carries it.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatRequest {
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    pub max_tokens: u32,
}

/// Trait for chat-completion backends
#[async_trait]
pub trait ChatClient: Send + Sync {
    /// Human-readable backend name
    fn name(&self) -> &'static str;

    /// Send a single-turn request and return the first choice's content.
    ///
    /// `Ok(None)` means the API answered without any choice content.
    async fn complete(&self, request: &ChatRequest) -> Result<Option<String>>;
}
