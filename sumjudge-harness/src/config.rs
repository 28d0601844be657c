//! Configuration management for the evaluation harness
//!
//! Loads judge and run settings from TOML files and provides runtime access.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub provider: ProviderConfig,
    #[serde(default)]
    pub evaluation: EvaluationConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Judge endpoint settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(default = "default_provider_name")]
    pub name: String,
    /// OpenAI-compatible API root, without the `/chat/completions` suffix
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Environment variable holding the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    #[serde(default = "default_model")]
    pub model: String,
    /// HTTP client timeout
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            name: default_provider_name(),
            base_url: default_base_url(),
            api_key_env: default_api_key_env(),
            model: default_model(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

/// Per-request and per-run evaluation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationConfig {
    #[serde(default)]
    pub temperature: f32,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Total attempts per prompt, including the first
    #[serde(default = "default_retry_count")]
    pub retry_count: u32,
    /// Fixed pause between attempts
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
    /// Re-render the console report every this many documents
    #[serde(default = "default_print_interval")]
    pub print_interval: usize,
    /// Transcript prefix length shown to the key-fact extractor
    #[serde(default = "default_keyfact_source_chars")]
    pub keyfact_source_chars: usize,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            temperature: 0.0,
            max_tokens: default_max_tokens(),
            retry_count: default_retry_count(),
            retry_delay_ms: default_retry_delay_ms(),
            print_interval: default_print_interval(),
            keyfact_source_chars: default_keyfact_source_chars(),
        }
    }
}

impl EvaluationConfig {
    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
        }
    }
}

// Default value functions
fn default_provider_name() -> String { "openrouter".to_string() }
fn default_base_url() -> String { "https://openrouter.ai/api/v1".to_string() }
fn default_api_key_env() -> String { "OPENROUTER_API_KEY".to_string() }
fn default_model() -> String { "meta-llama/llama-3-8b-instruct:free".to_string() }
fn default_timeout_ms() -> u64 { 120_000 }
fn default_max_tokens() -> u32 { 4096 }
fn default_retry_count() -> u32 { 3 }
fn default_retry_delay_ms() -> u64 { 5_000 }
fn default_print_interval() -> usize { 10 }
fn default_keyfact_source_chars() -> usize { 2_000 }
fn default_output_dir() -> String { "results".to_string() }

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::Io(e.to_string()))?;
        Self::from_toml(&content)
    }

    /// Parse configuration from a TOML string
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)
            .map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from default config location or return defaults
    pub fn load_or_default() -> Self {
        let config_paths = [
            "config/sumjudge.toml",
            "../config/sumjudge.toml",
            "sumjudge.toml",
        ];

        for path in &config_paths {
            match Self::from_file(path) {
                Ok(config) => {
                    tracing::info!("Loaded configuration from {}", path);
                    return config;
                }
                Err(ConfigError::Io(_)) => {}
                Err(e) => tracing::warn!("Ignoring {}: {}", path, e),
            }
        }

        tracing::info!("Using default configuration");
        Self::default()
    }

    /// Save configuration to a TOML file
    pub fn save_toml<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::Parse(e.to_string()))?;
        fs::write(path, content)
            .map_err(|e| ConfigError::Io(e.to_string()))?;
        Ok(())
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.evaluation.retry_count == 0 {
            return Err(ConfigError::Invalid("evaluation.retry_count must be at least 1".to_string()));
        }
        if self.evaluation.print_interval == 0 {
            return Err(ConfigError::Invalid("evaluation.print_interval must be at least 1".to_string()));
        }
        Ok(())
    }
}

/// Configuration errors
#[derive(Debug, Clone)]
pub enum ConfigError {
    Io(String),
    Parse(String),
    Invalid(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Invalid(e) => write!(f, "Invalid configuration: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.provider.base_url, "https://openrouter.ai/api/v1");
        assert_eq!(config.evaluation.retry_count, 3);
        assert_eq!(config.evaluation.retry_delay(), Duration::from_secs(5));
        assert_eq!(config.evaluation.temperature, 0.0);
    }

    #[test]
    fn test_parse_partial_toml_config() {
        let toml = r#"
[provider]
model = "gpt-4o-mini"
base_url = "https://api.openai.com/v1"
api_key_env = "OPENAI_API_KEY"

[evaluation]
print_interval = 2
"#;
        let config = Config::from_toml(toml).unwrap();
        assert_eq!(config.provider.model, "gpt-4o-mini");
        assert_eq!(config.provider.name, "openrouter");
        assert_eq!(config.evaluation.print_interval, 2);
        assert_eq!(config.evaluation.max_tokens, 4096);
        assert_eq!(config.output.output_dir, "results");
    }

    #[test]
    fn test_zero_attempts_rejected() {
        let err = Config::from_toml("[evaluation]\nretry_count = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sumjudge.toml");
        let mut config = Config::default();
        config.evaluation.keyfact_source_chars = 500;
        config.save_toml(&path).unwrap();

        let reloaded = Config::from_file(&path).unwrap();
        assert_eq!(reloaded.evaluation.keyfact_source_chars, 500);
        assert_eq!(reloaded.provider.model, config.provider.model);
    }
}
