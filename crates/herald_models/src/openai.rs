//! OpenAI-compatible chat completions client.

use crate::retry::status_error;
use crate::{ModelSettings, RetryPolicy};
use async_trait::async_trait;
use derive_getters::Getters;
use herald_error::{GenerationError, GenerationErrorKind, HeraldResult};
use herald_interface::ContentGenerator;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, instrument};

const OPENAI_API_BASE: &str = "https://api.openai.com/v1";

/// Chat completions request body.
#[derive(Debug, Clone, Serialize, Getters, derive_builder::Builder)]
#[builder(setter(into))]
pub(crate) struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct ChatMessage {
    role: String,
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

/// OpenAI-compatible API client.
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
    max_tokens: u32,
    temperature: Option<f32>,
    retry: RetryPolicy,
}

impl OpenAiClient {
    /// Creates a new client against the public OpenAI endpoint.
    ///
    /// # Arguments
    ///
    /// * `api_key` - Bearer token
    /// * `model` - Model identifier (e.g., "gpt-4o-mini")
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        debug!("Creating new OpenAI client");
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            model: model.into(),
            base_url: OPENAI_API_BASE.to_string(),
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

    /// Point the client at another OpenAI-compatible endpoint.
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

    fn build_request(&self, prompt: &str) -> Result<ChatRequest, GenerationError> {
        ChatRequestBuilder::default()
            .model(self.model.clone())
            .messages(vec![ChatMessage {
                role: "user".to_string(),
                content: Some(prompt.to_string()),
            }])
            .max_tokens(self.max_tokens)
            .temperature(self.temperature)
            .build()
            .map_err(|e| GenerationError::new(GenerationErrorKind::Builder(e.to_string())))
    }

    /// Sends one chat completions request.
    #[instrument(skip(self, request), fields(model = %request.model()))]
    async fn send(&self, request: &ChatRequest) -> Result<String, GenerationError> {
        let url = format!("{}/chat/completions", self.base_url);
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                error!(error = ?e, "Failed to send request to chat completions API");
                GenerationError::new(GenerationErrorKind::Http(e.to_string()))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %body, "Chat completions API returned error");
            return Err(GenerationError::new(status_error(status.as_u16(), body)));
        }

        let parsed: ChatResponse = response.json().await.map_err(|e| {
            error!(error = ?e, "Failed to parse chat completions response");
            GenerationError::new(GenerationErrorKind::Parse(e.to_string()))
        })?;

        let choice = parsed
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| GenerationError::new(GenerationErrorKind::EmptyResponse))?;

        Ok(choice.message.content.unwrap_or_default())
    }
}

#[async_trait]
impl ContentGenerator for OpenAiClient {
    #[instrument(skip(self, prompt), fields(provider = "openai", model = %self.model, prompt_len = prompt.len()))]
    async fn generate_text(&self, prompt: &str) -> HeraldResult<String> {
        let request = self.build_request(prompt)?;
        let text = self.retry.run(|| self.send(&request)).await?;
        debug!(text_len = text.len(), "Received completion");
        Ok(text)
    }

    fn provider_name(&self) -> &'static str {
        "openai"
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
