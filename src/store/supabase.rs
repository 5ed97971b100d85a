//! Supabase (PostgREST) backend.
//!
//! Endpoint: {url}/rest/v1/{table}
//! Auth: `apikey` header plus `Authorization: Bearer`

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{RequestBuilder, Response};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::domain::{NewSavedItem, Platform, SavedId, SavedItem};

use super::{SavedStore, StoreError};

pub const DEFAULT_TABLE: &str = "saved_content";

/// Configuration for the Supabase backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupabaseConfig {
    pub url: String,
    pub anon_key: String,
    #[serde(default = "default_table")]
    pub table: String,
}

fn default_table() -> String {
    DEFAULT_TABLE.to_string()
}

impl SupabaseConfig {
    pub fn new(url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            anon_key: anon_key.into(),
            table: default_table(),
        }
    }
}

/// Row as PostgREST returns it; the platform tag is checked after decoding
#[derive(Debug, Deserialize)]
struct Row {
    id: SavedId,
    content: String,
    platform: String,
    created_at: DateTime<Utc>,
}

impl Row {
    fn into_item(self) -> Option<SavedItem> {
        match self.platform.parse::<Platform>() {
            Ok(platform) => Some(SavedItem {
                id: self.id,
                content: self.content,
                platform,
                created_at: self.created_at,
            }),
            Err(_) => {
                warn!(id = %self.id, platform = %self.platform, "Skipping row with unknown platform");
                None
            }
        }
    }
}

#[derive(Debug, Serialize)]
struct ContentPatch<'a> {
    content: &'a str,
}

/// PostgREST client for the saved-content table
pub struct SupabaseStore {
    config: SupabaseConfig,
    client: reqwest::Client,
}

impl SupabaseStore {
    pub fn new(config: SupabaseConfig) -> Result<Self, StoreError> {
        if config.url.trim().is_empty() || config.anon_key.trim().is_empty() {
            return Err(StoreError::MissingCredentials(
                "SUPABASE_URL and SUPABASE_ANON_KEY are required".to_string(),
            ));
        }
        Ok(Self {
            config,
            client: reqwest::Client::new(),
        })
    }

    /// Build table URL
    fn table_url(&self) -> String {
        format!(
            "{}/rest/v1/{}",
            self.config.url.trim_end_matches('/'),
            self.config.table
        )
    }

    fn authed(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .header("apikey", &self.config.anon_key)
            .header("Authorization", format!("Bearer {}", self.config.anon_key))
    }

    /// Filter for a single row
    fn id_filter(id: &SavedId) -> [(&'static str, String); 1] {
        [("id", format!("eq.{}", id))]
    }

    async fn rows(response: Response) -> Result<Vec<Row>, StoreError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::Status {
                status: status.as_u16(),
                body,
            });
        }
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[async_trait]
impl SavedStore for SupabaseStore {
    fn name(&self) -> &str {
        "supabase"
    }

    async fn insert(&self, item: NewSavedItem) -> Result<SavedItem, StoreError> {
        let response = self
            .authed(self.client.post(self.table_url()))
            .header("Prefer", "return=representation")
            .json(&[&item])
            .send()
            .await?;

        let row = Self::rows(response)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| StoreError::InvalidResponse("insert returned no rows".to_string()))?;

        debug!(id = %row.id, "Inserted saved item");
        row.into_item()
            .ok_or_else(|| StoreError::InvalidResponse("inserted row has unknown platform".to_string()))
    }

    async fn list(&self) -> Result<Vec<SavedItem>, StoreError> {
        let response = self
            .authed(self.client.get(self.table_url()))
            .query(&[("select", "*"), ("order", "created_at.desc")])
            .send()
            .await?;

        let items: Vec<SavedItem> = Self::rows(response)
            .await?
            .into_iter()
            .filter_map(Row::into_item)
            .collect();
        debug!(count = items.len(), "Listed saved items");
        Ok(items)
    }

    async fn update_content(&self, id: &SavedId, content: &str) -> Result<SavedItem, StoreError> {
        let response = self
            .authed(self.client.patch(self.table_url()))
            .query(&Self::id_filter(id))
            .header("Prefer", "return=representation")
            .json(&ContentPatch { content })
            .send()
            .await?;

        Self::rows(response)
            .await?
            .into_iter()
            .next()
            .and_then(Row::into_item)
            .ok_or_else(|| StoreError::NotFound(id.clone()))
    }

    async fn delete(&self, id: &SavedId) -> Result<(), StoreError> {
        let response = self
            .authed(self.client.delete(self.table_url()))
            .query(&Self::id_filter(id))
            .header("Prefer", "return=representation")
            .send()
            .await?;

        if Self::rows(response).await?.is_empty() {
            return Err(StoreError::NotFound(id.clone()));
        }
        Ok(())
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        let response = self
            .authed(self.client.get(self.table_url()))
            .query(&[("select", "id"), ("limit", "1")])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(())
    }
}
