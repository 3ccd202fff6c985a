//! Model provider integrations

pub mod gemini;

use async_trait::async_trait;
use thiserror::Error;

use crate::conversation::ChatTurn;

pub use gemini::GeminiProvider;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Response blocked: {0}")]
    Blocked(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// A generative model that continues a seeded chat.
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Send `message` as the newest user turn after `history` and return the reply text.
    async fn send_message(&self, history: &[ChatTurn], message: &str)
        -> Result<String, ProviderError>;
}
