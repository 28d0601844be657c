//! The seam between the harness and a judge endpoint

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// One chat turn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: String,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// What the judge is asked. `model` and `temperature` fall back to the
/// provider's defaults when unset.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub model: Option<String>,
    pub messages: Vec<Message>,
    pub max_tokens: u32,
    pub temperature: Option<f32>,
}

impl CompletionRequest {
    pub fn new(messages: Vec<Message>, max_tokens: u32) -> Self {
        Self {
            model: None,
            messages,
            max_tokens,
            temperature: None,
        }
    }

    /// Single user-turn request, the shape every judge prompt takes
    pub fn prompt(prompt: impl Into<String>, max_tokens: u32) -> Self {
        Self::new(vec![Message::user(prompt)], max_tokens)
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_temperature(mut self, temp: f32) -> Self {
        self.temperature = Some(temp);
        self
    }
}

/// The judge's answer plus the bookkeeping logged at debug level
#[derive(Debug, Clone)]
pub struct CompletionResponse {
    /// Raw text handed to the output parsers; may be empty
    pub content: String,
    pub model: String,
    pub input_tokens: u32,
    pub output_tokens: u32,
    pub finish_reason: String,
    pub latency_ms: u64,
}

/// Why a judge call failed. Only [`ProviderError::Config`] stops the
/// retry loop.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Rate limited: retry after {retry_after_ms}ms")]
    RateLimited { retry_after_ms: u64 },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ProviderError {
    /// Errors another attempt cannot fix
    pub fn is_fatal(&self) -> bool {
        matches!(self, ProviderError::Config(_))
    }
}

pub type ProviderResult<T> = Result<T, ProviderError>;

/// A judge endpoint. Implementations make one HTTP round trip per call and
/// leave retries to [`crate::runner::Executor`].
#[async_trait]
pub trait LLMProvider: Send + Sync {
    /// Label used in logs, e.g. "openrouter"
    fn name(&self) -> &str;

    /// Model used when the request names none
    fn default_model(&self) -> &str;

    async fn complete(&self, request: &CompletionRequest) -> ProviderResult<CompletionResponse>;
}
