//! Anthropic Messages API adapter.
//!
//! Endpoint: POST {base_url}/v1/messages
//! Auth: `x-api-key` header

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{status_error, AdapterError, AdapterOutput, CompletionAdapter};

pub const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
pub const DEFAULT_MODEL: &str = "claude-3-5-sonnet-20241022";
pub const DEFAULT_MAX_TOKENS: u32 = 1024;
const API_VERSION: &str = "2023-06-01";

/// Configuration for the Anthropic adapter
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnthropicConfig {
    pub api_key: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}
fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}
fn default_max_tokens() -> u32 {
    DEFAULT_MAX_TOKENS
}

impl AnthropicConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: default_base_url(),
            model: default_model(),
            max_tokens: default_max_tokens(),
        }
    }
}

/// Anthropic Messages API client
pub struct AnthropicAdapter {
    config: AnthropicConfig,
    client: reqwest::Client,
}

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<Message<'a>>,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    #[serde(default)]
    input_tokens: u64,
    #[serde(default)]
    output_tokens: u64,
}

impl AnthropicAdapter {
    /// Create a new adapter; an empty key is rejected up front
    pub fn new(config: AnthropicConfig) -> Result<Self, AdapterError> {
        if config.api_key.trim().is_empty() {
            return Err(AdapterError::MissingCredentials(
                "ANTHROPIC_API_KEY is not set".to_string(),
            ));
        }
        Ok(Self {
            config,
            client: reqwest::Client::new(),
        })
    }

    /// Build API URL
    fn api_url(&self) -> String {
        format!("{}/v1/messages", self.config.base_url.trim_end_matches('/'))
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }
}

#[async_trait]
impl CompletionAdapter for AnthropicAdapter {
    fn name(&self) -> &str {
        "anthropic"
    }

    async fn complete(&self, prompt: &str, timeout: Duration) -> Result<AdapterOutput, AdapterError> {
        let body = MessagesRequest {
            model: &self.config.model,
            max_tokens: self.config.max_tokens,
            messages: vec![Message {
                role: "user",
                content: prompt,
            }],
        };

        debug!(model = %self.config.model, prompt_len = prompt.len(), "Sending messages request");

        let response = self
            .client
            .post(self.api_url())
            .timeout(timeout)
            .header("x-api-key", &self.config.api_key)
            .header("anthropic-version", API_VERSION)
            .json(&body)
            .send()
            .await
            .map_err(|e| timeout_or_http(self.name(), timeout, e))?;

        if !response.status().is_success() {
            return Err(status_error(self.name(), response).await);
        }

        let parsed: MessagesResponse = response
            .json()
            .await
            .map_err(|_| AdapterError::InvalidResponse(self.name().to_string()))?;

        let text = parsed
            .content
            .into_iter()
            .next()
            .and_then(|block| block.text)
            .ok_or_else(|| AdapterError::InvalidResponse(self.name().to_string()))?;

        let mut output = AdapterOutput::new(text);
        if let Some(usage) = parsed.usage {
            output = output.with_tokens(usage.input_tokens + usage.output_tokens);
        }
        Ok(output)
    }

    async fn health_check(&self) -> Result<(), AdapterError> {
        let url = format!("{}/v1/models", self.config.base_url.trim_end_matches('/'));
        let response = self
            .client
            .get(url)
            .header("x-api-key", &self.config.api_key)
            .header("anthropic-version", API_VERSION)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(status_error(self.name(), response).await);
        }
        Ok(())
    }
}

pub(crate) fn timeout_or_http(adapter: &str, timeout: Duration, err: reqwest::Error) -> AdapterError {
    if err.is_timeout() {
        AdapterError::Timeout {
            adapter: adapter.to_string(),
            timeout,
        }
    } else {
        AdapterError::Http(err)
    }
}
