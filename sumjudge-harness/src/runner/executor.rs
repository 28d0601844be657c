//! Judge response acquisition with bounded retries

use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;

use crate::config::Config;
use crate::providers::{CompletionRequest, LLMProvider, ProviderError};

/// Configuration for the executor
#[derive(Debug, Clone)]
pub struct ExecutorConfig {
    /// Total attempts per prompt, including the first
    pub attempts: u32,
    /// Fixed pause between attempts
    pub retry_delay: Duration,
    pub max_tokens: u32,
    pub temperature: f32,
    /// Overrides the provider's default model
    pub model: Option<String>,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            attempts: 3,
            retry_delay: Duration::from_secs(5),
            max_tokens: 4096,
            temperature: 0.0,
            model: None,
        }
    }
}

impl ExecutorConfig {
    pub fn from_config(config: &Config) -> Self {
        Self {
            attempts: config.evaluation.retry_count.max(1),
            retry_delay: config.evaluation.retry_delay(),
            max_tokens: config.evaluation.max_tokens,
            temperature: config.evaluation.temperature,
            model: Some(config.provider.model.clone()),
        }
    }
}

/// Sends prompts to the judge one at a time.
///
/// Acquisition never fails: after the last attempt the caller gets an empty
/// string, which every parser treats as an unusable response.
pub struct Executor {
    config: ExecutorConfig,
    provider: Arc<dyn LLMProvider + Send + Sync>,
}

impl Executor {
    pub fn new(provider: Arc<dyn LLMProvider + Send + Sync>, config: ExecutorConfig) -> Self {
        Self { config, provider }
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    pub fn config(&self) -> &ExecutorConfig {
        &self.config
    }

    pub fn model(&self) -> &str {
        self.config
            .model
            .as_deref()
            .unwrap_or_else(|| self.provider.default_model())
    }

    /// Send `prompt` and return the judge's text, or `""` once every attempt
    /// has failed.
    pub async fn fetch(&self, prompt: &str) -> String {
        let request = self.request(prompt);
        let attempts = self.config.attempts.max(1);

        for attempt in 1..=attempts {
            let wait = match self.provider.complete(&request).await {
                Ok(response) => {
                    tracing::debug!(
                        "Response from {} in {}ms ({} in / {} out tokens, finish: {})",
                        response.model,
                        response.latency_ms,
                        response.input_tokens,
                        response.output_tokens,
                        response.finish_reason
                    );
                    return response.content;
                }
                Err(e) if e.is_fatal() => {
                    tracing::error!("Giving up on {}: {}", self.provider.name(), e);
                    return String::new();
                }
                Err(ProviderError::RateLimited { retry_after_ms }) => {
                    tracing::warn!(
                        "Rate limited on {}, attempt {}/{}",
                        self.provider.name(),
                        attempt,
                        attempts
                    );
                    self.config.retry_delay.max(Duration::from_millis(retry_after_ms))
                }
                Err(e) => {
                    tracing::warn!(
                        "API call failed, attempt {}/{}: {}",
                        attempt,
                        attempts,
                        e
                    );
                    self.config.retry_delay
                }
            };

            if attempt < attempts {
                sleep(wait).await;
            }
        }

        tracing::error!("All {} attempts failed for model {}", attempts, self.model());
        String::new()
    }

    fn request(&self, prompt: &str) -> CompletionRequest {
        let request = CompletionRequest::prompt(prompt, self.config.max_tokens)
            .with_temperature(self.config.temperature);
        match &self.config.model {
            Some(model) => request.with_model(model.clone()),
            None => request,
        }
    }
}
