//! Harness-level error type

use crate::config::ConfigError;
use crate::providers::ProviderError;
use crate::records::LoadError;

/// Anything that can stop a run before it finishes.
///
/// Judge failures are not in here: acquisition degrades to an empty
/// response and parsing to an empty result, so those only lower the
/// success rate.
#[derive(Debug, thiserror::Error)]
pub enum HarnessError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to load records: {0}")]
    Load(#[from] LoadError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Provider setup failed: {0}")]
    Provider(#[from] ProviderError),
}

pub type HarnessResult<T> = Result<T, HarnessError>;
