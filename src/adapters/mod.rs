//! Adapter interfaces for external systems.
//!
//! Adapters provide a unified interface for the completion endpoints that
//! do the actual rewriting, plus the desktop hooks (clipboard, browser)
//! used by share actions.

pub mod anthropic;
pub mod desktop;
pub mod relay;

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

pub use anthropic::{AnthropicAdapter, AnthropicConfig};
pub use relay::RelayAdapter;

/// Errors from a completion call
#[derive(Debug, Error)]
pub enum AdapterError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{adapter} returned {status}: {body}")]
    Status {
        adapter: String,
        status: u16,
        body: String,
    },

    #[error("Invalid response format from {0}")]
    InvalidResponse(String),

    #[error("{adapter} timed out after {timeout:?}")]
    Timeout { adapter: String, timeout: Duration },

    #[error("Missing credentials: {0}")]
    MissingCredentials(String),
}

/// Output from an adapter execution
#[derive(Debug, Clone)]
pub struct AdapterOutput {
    /// The content returned by the adapter
    pub content: String,

    /// Tokens used (if available)
    pub tokens_used: Option<u64>,
}

impl AdapterOutput {
    /// Create a new adapter output with just content
    pub fn new(content: String) -> Self {
        Self {
            content,
            tokens_used: None,
        }
    }

    pub fn with_tokens(mut self, tokens: u64) -> Self {
        self.tokens_used = Some(tokens);
        self
    }
}

/// A completion endpoint: one prompt in, one free-text answer out
#[async_trait]
pub trait CompletionAdapter: Send + Sync {
    /// Human-readable adapter name
    fn name(&self) -> &str;

    /// Send a prompt and wait for the completion. One attempt, no retry.
    async fn complete(&self, prompt: &str, timeout: Duration) -> Result<AdapterOutput, AdapterError>;

    /// Health check
    async fn health_check(&self) -> Result<(), AdapterError>;
}

/// Turn a non-success response into an `AdapterError::Status`
pub(crate) async fn status_error(adapter: &str, response: reqwest::Response) -> AdapterError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    AdapterError::Status {
        adapter: adapter.to_string(),
        status,
        body,
    }
}
