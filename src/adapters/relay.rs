//! Chat relay adapter.
//!
//! Endpoint: POST {api_url}/chat with `{"message": ...}`
//! Reply: `{"response": ...}`

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::anthropic::timeout_or_http;
use super::{status_error, AdapterError, AdapterOutput, CompletionAdapter};

pub const DEFAULT_API_URL: &str = "http://localhost:3000";

/// Client for a self-hosted chat relay
pub struct RelayAdapter {
    api_url: String,
    client: reqwest::Client,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    message: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    response: Option<String>,
}

impl RelayAdapter {
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            client: reqwest::Client::new(),
        }
    }

    fn chat_url(&self) -> String {
        format!("{}/chat", self.api_url.trim_end_matches('/'))
    }
}

impl Default for RelayAdapter {
    fn default() -> Self {
        Self::new(DEFAULT_API_URL)
    }
}

#[async_trait]
impl CompletionAdapter for RelayAdapter {
    fn name(&self) -> &str {
        "relay"
    }

    async fn complete(&self, prompt: &str, timeout: Duration) -> Result<AdapterOutput, AdapterError> {
        let response = self
            .client
            .post(self.chat_url())
            .timeout(timeout)
            .json(&ChatRequest { message: prompt })
            .send()
            .await
            .map_err(|e| timeout_or_http(self.name(), timeout, e))?;

        if !response.status().is_success() {
            return Err(status_error(self.name(), response).await);
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|_| AdapterError::InvalidResponse(self.name().to_string()))?;

        parsed
            .response
            .map(AdapterOutput::new)
            .ok_or_else(|| AdapterError::InvalidResponse(self.name().to_string()))
    }

    async fn health_check(&self) -> Result<(), AdapterError> {
        // Any HTTP answer means the relay is up; /chat only accepts POST
        self.client.get(&self.api_url).send().await?;
        Ok(())
    }
}
