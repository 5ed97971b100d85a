//! Saved-content panel.
//!
//! Keeps the last listing from the store. Every mutation is followed by a
//! full re-fetch; on failure the previous listing stays on screen.

use tracing::{error, instrument};

use crate::domain::{NewSavedItem, Notice, SavedId, SavedItem};
use crate::store::SavedStore;

#[derive(Debug, Clone, Default)]
pub struct SavedPanel {
    items: Vec<SavedItem>,
}

impl SavedPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[SavedItem] {
        &self.items
    }

    /// Re-fetch everything. Returns a notice only on failure.
    #[instrument(skip_all, fields(store = store.name()))]
    pub async fn refresh(&mut self, store: &dyn SavedStore) -> Option<Notice> {
        match store.list().await {
            Ok(items) => {
                self.items = items;
                None
            }
            Err(e) => {
                error!(error = %e, "Error fetching saved content");
                Some(Notice::load_failed())
            }
        }
    }

    /// Persist a new item, then re-fetch
    #[instrument(skip_all, fields(store = store.name(), platform = %item.platform))]
    pub async fn save(&mut self, store: &dyn SavedStore, item: NewSavedItem) -> Notice {
        let platform = item.platform;
        match store.insert(item).await {
            Ok(_) => self.refresh(store).await.unwrap_or_else(|| Notice::saved(platform)),
            Err(e) => {
                error!(error = %e, "Error saving content");
                Notice::save_failed(platform)
            }
        }
    }

    /// Replace an item's content, then re-fetch
    #[instrument(skip_all, fields(store = store.name(), %id))]
    pub async fn edit(&mut self, store: &dyn SavedStore, id: &SavedId, content: &str) -> Notice {
        match store.update_content(id, content).await {
            Ok(_) => self.refresh(store).await.unwrap_or_else(Notice::updated),
            Err(e) => {
                error!(error = %e, "Error updating saved content");
                Notice::update_failed()
            }
        }
    }

    /// Delete an item, then re-fetch
    #[instrument(skip_all, fields(store = store.name(), %id))]
    pub async fn delete(&mut self, store: &dyn SavedStore, id: &SavedId) -> Notice {
        match store.delete(id).await {
            Ok(()) => self.refresh(store).await.unwrap_or_else(Notice::deleted),
            Err(e) => {
                error!(error = %e, "Error deleting saved content");
                Notice::delete_failed()
            }
        }
    }
}
