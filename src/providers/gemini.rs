//! Google Gemini provider
//!
//! Talks to the `generateContent` REST endpoint:
//!
//! ```text
//! POST {base_url}/models/{model}:generateContent
//! x-goog-api-key: <key>
//! ```
//!
//! The whole chat (seed history plus the new message) goes out in one
//! request; nothing is kept between calls.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::{Config, GenerationConfig};
use crate::conversation::{ChatTurn, Role};

use super::{ChatProvider, ProviderError};

/// Finish reasons that mean the candidate text must not be used
const BLOCKED_FINISH_REASONS: &[&str] = &["SAFETY", "RECITATION", "LANGUAGE"];

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: Role,
    parts: [Part<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

impl<'a> From<&'a ChatTurn> for Content<'a> {
    fn from(turn: &'a ChatTurn) -> Self {
        Self {
            role: turn.role,
            parts: [Part {
                text: &turn.content,
            }],
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

/// Error body returned by Google APIs
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ApiError,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
    #[serde(default)]
    status: Option<String>,
}

impl GenerateContentResponse {
    /// Concatenated text of the first candidate.
    fn text(self) -> Result<String, ProviderError> {
        let Some(candidate) = self.candidates.into_iter().next() else {
            if let Some(reason) = self.prompt_feedback.and_then(|f| f.block_reason) {
                return Err(ProviderError::Blocked(format!("prompt blocked: {}", reason)));
            }
            return Ok(String::new());
        };

        if let Some(reason) = candidate.finish_reason.as_deref() {
            if BLOCKED_FINISH_REASONS.contains(&reason) {
                return Err(ProviderError::Blocked(format!("candidate finished with {}", reason)));
            }
        }

        Ok(candidate
            .content
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default())
    }
}

/// Gemini `generateContent` client
pub struct GeminiProvider {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
    generation: GenerationConfig,
}

impl GeminiProvider {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
            api_key: api_key.into(),
            model: model.into(),
            generation: GenerationConfig::CHEESA,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.base_url, &config.google_ai_key, &config.model)
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }

    fn build_request<'a>(&self, history: &'a [ChatTurn], message: &'a str) -> GenerateContentRequest<'a> {
        let mut contents: Vec<Content<'a>> = history.iter().map(Content::from).collect();
        contents.push(Content {
            role: Role::User,
            parts: [Part { text: message }],
        });

        GenerateContentRequest {
            contents,
            generation_config: self.generation,
        }
    }
}

#[async_trait]
impl ChatProvider for GeminiProvider {
    async fn send_message(
        &self,
        history: &[ChatTurn],
        message: &str,
    ) -> Result<String, ProviderError> {
        let request = self.build_request(history, message);

        tracing::debug!(model = %self.model, turns = request.contents.len(), "sending generateContent");

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = match serde_json::from_str::<ErrorResponse>(&body) {
                Ok(ErrorResponse { error }) => match error.status {
                    Some(code) => format!("{}: {}", code, error.message),
                    None => error.message,
                },
                Err(_) => body,
            };
            return Err(ProviderError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: GenerateContentResponse = serde_json::from_str(&body).map_err(|e| {
            ProviderError::InvalidResponse(format!("Failed to parse response: {} - Body: {}", e, body))
        })?;

        parsed.text()
    }
}
