//! Persistence gateway for saved content.
//!
//! A single table of saved items: insert, list newest-first, update content
//! by id, delete by id. Last write wins; there is no version check.
//!
//! Two backends:
//! - `SupabaseStore`: hosted PostgREST table
//! - `SqliteStore`: local database file (or in-memory for tests)

pub mod sqlite;
pub mod supabase;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{NewSavedItem, SavedId, SavedItem};

pub use sqlite::SqliteStore;
pub use supabase::{SupabaseConfig, SupabaseStore};

/// Errors from the persistence gateway
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Store returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Store task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Saved item not found: {0}")]
    NotFound(SavedId),

    #[error("Invalid response from store: {0}")]
    InvalidResponse(String),

    #[error("Missing credentials: {0}")]
    MissingCredentials(String),
}

/// The saved-content table
#[async_trait]
pub trait SavedStore: Send + Sync {
    /// Backend name for logs
    fn name(&self) -> &str;

    /// Insert a row and return it with its assigned id
    async fn insert(&self, item: NewSavedItem) -> Result<SavedItem, StoreError>;

    /// All rows, newest `created_at` first
    async fn list(&self) -> Result<Vec<SavedItem>, StoreError>;

    /// Replace a row's content
    async fn update_content(&self, id: &SavedId, content: &str) -> Result<SavedItem, StoreError>;

    /// Remove a row
    async fn delete(&self, id: &SavedId) -> Result<(), StoreError>;

    /// Health check
    async fn health_check(&self) -> Result<(), StoreError>;
}
