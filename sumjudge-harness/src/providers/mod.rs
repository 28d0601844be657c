//! LLM Provider implementations

pub mod openai;
pub mod traits;

pub use openai::OpenAIClient;
pub use traits::{
    CompletionRequest, CompletionResponse, LLMProvider, Message, ProviderError, ProviderResult,
};

use crate::config::Config;
use std::sync::Arc;

/// Create the configured judge provider
pub fn create_provider(config: &Config) -> ProviderResult<Arc<dyn LLMProvider + Send + Sync>> {
    let client = OpenAIClient::from_config(&config.provider)?;
    tracing::debug!(
        "Judge provider {} at {} (model {})",
        client.name(),
        config.provider.base_url,
        client.default_model()
    );
    Ok(Arc::new(client))
}
