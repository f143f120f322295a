//! Provider selection and construction from configuration.

use crate::{AnthropicClient, OpenAiClient, RetryPolicy};
use herald_error::{GenerationError, GenerationErrorKind, HeraldResult};
use herald_interface::ContentGenerator;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, instrument};

/// Supported text generation providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelProvider {
    /// OpenAI or any OpenAI-compatible chat completions endpoint.
    #[serde(alias = "openai-compatible")]
    OpenAi,
    /// Anthropic messages API.
    Anthropic,
}

impl ModelProvider {
    /// Environment variable holding the API key when none is configured.
    pub fn default_api_key_env(&self) -> &'static str {
        match self {
            Self::OpenAi => "OPENAI_API_KEY",
            Self::Anthropic => "ANTHROPIC_API_KEY",
        }
    }
}

/// `[model]` section of the agent configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSettings {
    /// Which provider to talk to
    #[serde(default = "default_provider")]
    pub provider: ModelProvider,
    /// Model identifier
    #[serde(default = "default_model")]
    pub model: String,
    /// Override for the provider's API base URL
    #[serde(default)]
    pub base_url: Option<String>,
    /// Environment variable holding the API key
    #[serde(default)]
    pub api_key_env: Option<String>,
    /// Maximum tokens per completion
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Sampling temperature
    #[serde(default)]
    pub temperature: Option<f32>,
    /// Retries for transient provider failures
    #[serde(default = "default_max_retries")]
    pub max_retries: usize,
    /// Initial retry backoff in milliseconds
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,
}

fn default_provider() -> ModelProvider {
    ModelProvider::OpenAi
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_max_tokens() -> u32 {
    300
}

fn default_max_retries() -> usize {
    3
}

fn default_retry_backoff_ms() -> u64 {
    500
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            model: default_model(),
            base_url: None,
            api_key_env: None,
            max_tokens: default_max_tokens(),
            temperature: None,
            max_retries: default_max_retries(),
            retry_backoff_ms: default_retry_backoff_ms(),
        }
    }
}

impl ModelSettings {
    /// Retry policy derived from these settings.
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_retries: self.max_retries,
            initial_backoff_ms: self.retry_backoff_ms,
            max_delay: Duration::from_secs(30),
        }
    }

    /// Name of the environment variable the API key is read from.
    pub fn api_key_var(&self) -> &str {
        self.api_key_env
            .as_deref()
            .unwrap_or_else(|| self.provider.default_api_key_env())
    }
}

/// Build the configured generator, reading its API key from the environment.
///
/// # Errors
///
/// Returns a generation error if the API key variable is unset or empty.
#[instrument(skip_all, fields(provider = ?settings.provider, model = %settings.model))]
pub fn build_generator(settings: &ModelSettings) -> HeraldResult<Arc<dyn ContentGenerator>> {
    let var = settings.api_key_var();
    let api_key = std::env::var(var)
        .ok()
        .filter(|key| !key.is_empty())
        .ok_or_else(|| {
            GenerationError::new(GenerationErrorKind::MissingCredentials(var.to_string()))
        })?;

    let generator: Arc<dyn ContentGenerator> = match settings.provider {
        ModelProvider::OpenAi => Arc::new(OpenAiClient::from_settings(api_key, settings)),
        ModelProvider::Anthropic => Arc::new(AnthropicClient::from_settings(api_key, settings)),
    };

    info!("Content generator ready");
    Ok(generator)
}
