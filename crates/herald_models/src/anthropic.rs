//! Anthropic messages API client.

use crate::retry::status_error;
use crate::{ModelSettings, RetryPolicy};
use async_trait::async_trait;
use derive_getters::Getters;
use herald_error::{GenerationError, GenerationErrorKind, HeraldResult};
use herald_interface::ContentGenerator;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, instrument};

const ANTHROPIC_API_BASE: &str = "https://api.anthropic.com";
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Messages API request body.
#[derive(Debug, Clone, Serialize, Getters, derive_builder::Builder)]
#[builder(setter(into))]
pub(crate) struct MessagesRequest {
    model: String,
    max_tokens: u32,
    messages: Vec<AnthropicMessage>,
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct AnthropicMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    id: String,
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

/// Anthropic API client.
#[derive(Debug, Clone)]
pub struct AnthropicClient {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
    max_tokens: u32,
    temperature: Option<f32>,
    retry: RetryPolicy,
}

impl AnthropicClient {
    /// Creates a new Anthropic client.
    ///
    /// # Arguments
    ///
    /// * `api_key` - Anthropic API key
    /// * `model` - Model identifier (e.g., "claude-3-5-haiku-latest")
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        debug!("Creating new Anthropic client");
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            model: model.into(),
            base_url: ANTHROPIC_API_BASE.to_string(),
            max_tokens: 300,
            temperature: None,
            retry: RetryPolicy::default(),
        }
    }

    /// Creates a client from the `[model]` configuration section.
    pub fn from_settings(api_key: impl Into<String>, settings: &ModelSettings) -> Self {
        let mut client = Self::new(api_key, settings.model.clone())
            .with_max_tokens(settings.max_tokens)
            .with_retry(settings.retry_policy());
        client.temperature = settings.temperature;
        if let Some(base_url) = &settings.base_url {
            client = client.with_base_url(base_url.clone());
        }
        client
    }

    /// Override the API base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the completion token limit.
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Set the retry policy.
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    fn build_request(&self, prompt: &str) -> Result<MessagesRequest, GenerationError> {
        MessagesRequestBuilder::default()
            .model(self.model.clone())
            .max_tokens(self.max_tokens)
            .messages(vec![AnthropicMessage {
                role: "user",
                content: prompt.to_string(),
            }])
            .temperature(self.temperature)
            .build()
            .map_err(|e| GenerationError::new(GenerationErrorKind::Builder(e.to_string())))
    }

    /// Sends a request to the Anthropic API.
    #[instrument(skip(self, request), fields(model = %request.model()))]
    async fn send(&self, request: &MessagesRequest) -> Result<String, GenerationError> {
        debug!("Sending request to Anthropic API");

        let url = format!("{}/v1/messages", self.base_url);
        let response = self
            .client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(request)
            .send()
            .await
            .map_err(|e| {
                error!(error = ?e, "Failed to send request to Anthropic API");
                GenerationError::new(GenerationErrorKind::Http(e.to_string()))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %body, "Anthropic API returned error");
            return Err(GenerationError::new(status_error(status.as_u16(), body)));
        }

        let parsed: MessagesResponse = response.json().await.map_err(|e| {
            error!(error = ?e, "Failed to parse Anthropic response");
            GenerationError::new(GenerationErrorKind::Parse(e.to_string()))
        })?;

        debug!(response_id = %parsed.id, "Received response from Anthropic");

        Ok(parsed
            .content
            .into_iter()
            .filter(|block| block.kind == "text")
            .filter_map(|block| block.text)
            .collect::<Vec<_>>()
            .join(""))
    }
}

#[async_trait]
impl ContentGenerator for AnthropicClient {
    #[instrument(skip(self, prompt), fields(provider = "anthropic", model = %self.model, prompt_len = prompt.len()))]
    async fn generate_text(&self, prompt: &str) -> HeraldResult<String> {
        let request = self.build_request(prompt)?;
        let text = self.retry.run(|| self.send(&request)).await?;
        Ok(text)
    }

    fn provider_name(&self) -> &'static str {
        "anthropic"
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
