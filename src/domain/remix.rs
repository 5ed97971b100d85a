//! Remix requests and results.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::platform::Platform;

/// A request to rewrite source text for one platform
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemixRequest {
    source_text: String,
    platform: Platform,
}

/// Source text was empty or whitespace only
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Source text is empty")]
pub struct EmptySourceText;

impl RemixRequest {
    /// Create a request; blank source text is rejected
    pub fn new(source_text: impl Into<String>, platform: Platform) -> Result<Self, EmptySourceText> {
        let source_text = source_text.into();
        if source_text.trim().is_empty() {
            return Err(EmptySourceText);
        }
        Ok(Self {
            source_text,
            platform,
        })
    }

    pub fn source_text(&self) -> &str {
        &self.source_text
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }
}

/// The rewritten content, shaped by platform
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "items", rename_all = "snake_case")]
pub enum RemixResult {
    /// One block of text (professional post, caption)
    Single(String),

    /// Ordered short items (short-form posts)
    Sequence(Vec<String>),
}

impl RemixResult {
    /// Item texts in order
    pub fn items(&self) -> Vec<&str> {
        match self {
            RemixResult::Single(text) => vec![text.as_str()],
            RemixResult::Sequence(items) => items.iter().map(String::as_str).collect(),
        }
    }

    /// Get one item by index
    pub fn item(&self, index: usize) -> Option<&str> {
        match self {
            RemixResult::Single(text) if index == 0 => Some(text),
            RemixResult::Single(_) => None,
            RemixResult::Sequence(items) => items.get(index).map(String::as_str),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            RemixResult::Single(_) => 1,
            RemixResult::Sequence(items) => items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            RemixResult::Single(text) => text.is_empty(),
            RemixResult::Sequence(items) => items.is_empty(),
        }
    }

    /// Replace one item's text. Returns false if the index is out of range.
    pub fn edit(&mut self, index: usize, text: impl Into<String>) -> bool {
        match self {
            RemixResult::Single(existing) if index == 0 => {
                *existing = text.into();
                true
            }
            RemixResult::Single(_) => false,
            RemixResult::Sequence(items) => match items.get_mut(index) {
                Some(existing) => {
                    *existing = text.into();
                    true
                }
                None => false,
            },
        }
    }
}

/// Advisory length of an item against a platform limit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CharCount {
    pub current: usize,
    pub limit: Option<usize>,
    /// Negative when over the limit
    pub remaining: Option<i64>,
}

impl CharCount {
    pub fn of(text: &str, platform: Platform) -> Self {
        let current = text.chars().count();
        let limit = platform.char_limit();
        Self {
            current,
            limit,
            remaining: limit.map(|l| l as i64 - current as i64),
        }
    }

    pub fn is_over(&self) -> bool {
        self.remaining.is_some_and(|r| r < 0)
    }
}

impl std::fmt::Display for CharCount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (self.limit, self.remaining) {
            (Some(limit), Some(remaining)) => {
                write!(f, "{}/{} ({} remaining)", self.current, limit, remaining)
            }
            _ => write!(f, "{} chars", self.current),
        }
    }
}
