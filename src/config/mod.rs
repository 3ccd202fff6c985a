//! Application configuration

pub mod prompts;

use std::env;

use serde::Serialize;

/// Environment variable holding the Gemini API key
pub const API_KEY_VAR: &str = "GOOGLE_AI_KEY";

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub google_ai_key: String,
    pub model: String,
    pub base_url: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the config from an arbitrary variable source
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let google_ai_key = lookup(API_KEY_VAR)
            .filter(|key| !key.trim().is_empty())
            .ok_or(ConfigError::MissingApiKey(API_KEY_VAR))?;

        let port: u16 = match lookup("PORT") {
            Some(raw) => raw
                .parse()
                .map_err(|_| ConfigError::InvalidPort(raw))?,
            None => 3000,
        };

        Ok(Self {
            host: lookup("HOST").unwrap_or_else(|| "127.0.0.1".into()),
            port,
            google_ai_key,
            model: lookup("GEMINI_MODEL").unwrap_or_else(|| prompts::MODEL.into()),
            base_url: lookup("GEMINI_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_BASE_URL.into()),
        })
    }
}

/// Sampling parameters sent with every generation request
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub temperature: f32,
    pub top_p: f32,
    pub top_k: u32,
    pub max_output_tokens: u32,
}

impl GenerationConfig {
    pub const CHEESA: Self = Self {
        temperature: 0.7,
        top_p: 0.95,
        top_k: 40,
        max_output_tokens: 1024,
    };
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self::CHEESA
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing {0}")]
    MissingApiKey(&'static str),

    #[error("Invalid PORT value: {0}")]
    InvalidPort(String),
}
