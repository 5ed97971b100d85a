//! Saved content rows.
//!
//! The store owns identity and ordering; this side only carries the
//! identifier around as an opaque string.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use super::platform::Platform;

/// Store-assigned identifier (numeric or textual on the wire)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct SavedId(String);

impl SavedId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SavedId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for SavedId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl<'de> Deserialize<'de> for SavedId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Int(i64),
            Text(String),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Int(n) => SavedId(n.to_string()),
            RawId::Text(s) => SavedId(s),
        })
    }
}

/// A persisted remix
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedItem {
    pub id: SavedId,
    pub content: String,
    pub platform: Platform,
    pub created_at: DateTime<Utc>,
}

/// Insert payload; the store assigns the id
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewSavedItem {
    pub content: String,
    pub platform: Platform,
    pub created_at: DateTime<Utc>,
}

impl NewSavedItem {
    /// Stamp a new item with the current time
    pub fn new(content: impl Into<String>, platform: Platform) -> Self {
        Self {
            content: content.into(),
            platform,
            created_at: Utc::now(),
        }
    }
}

/// Sort newest first
pub fn sort_newest_first(items: &mut [SavedItem]) {
    items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}
