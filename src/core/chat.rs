//! Chat engine
//!
//! The ChatEngine turns one request body into one reply:
//! 1. Validates the new message
//! 2. Parses the caller's prior turns
//! 3. Seeds the conversation with the persona and greeting
//! 4. Sends the message to the provider and returns its text

use serde_json::Value;
use std::sync::Arc;

use crate::conversation::{parse_history, ChatTurn, Conversation, HistoryError};
use crate::providers::{ChatProvider, ProviderError};

/// A validated chat request
#[derive(Debug, Clone, PartialEq)]
pub struct ChatRequest {
    /// The user's new message
    pub message: String,

    /// The caller's prior turns, already mapped
    pub history: Vec<ChatTurn>,
}

/// Errors from the chat engine
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("Message is required")]
    Validation,

    #[error("Malformed history: {0}")]
    MalformedHistory(#[from] HistoryError),

    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),
}

impl ChatRequest {
    /// Validate a raw request body.
    ///
    /// A body that is not a JSON object is treated as having no fields.
    pub fn from_body(body: &Value) -> Result<Self, ChatError> {
        let fields = body.as_object();

        let message = match fields.and_then(|f| f.get("message")) {
            Some(Value::String(message)) if !message.is_empty() => message.clone(),
            _ => return Err(ChatError::Validation),
        };

        let history = parse_history(fields.and_then(|f| f.get("conversationHistory")))?;

        Ok(Self { message, history })
    }
}

/// The core chat engine
pub struct ChatEngine {
    provider: Arc<dyn ChatProvider>,
}

impl ChatEngine {
    pub fn new(provider: Arc<dyn ChatProvider>) -> Self {
        Self { provider }
    }

    /// Process a raw request body and return the generated reply
    pub async fn reply(&self, body: &Value) -> Result<String, ChatError> {
        let request = ChatRequest::from_body(body)?;
        self.chat(request).await
    }

    pub async fn chat(&self, request: ChatRequest) -> Result<String, ChatError> {
        let conversation = Conversation::new().with_history(request.history);

        let reply = self
            .provider
            .send_message(&conversation.turns, &request.message)
            .await?;

        Ok(reply)
    }
}
