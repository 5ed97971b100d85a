//! Local SQLite backend.
//!
//! Same table shape as the hosted store. Ids are UUID v4 strings and
//! timestamps are stored as RFC 3339 text. Queries run on tokio's blocking
//! pool so disk I/O never stalls a runtime worker.

use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::domain::{NewSavedItem, Platform, SavedId, SavedItem};

use super::{SavedStore, StoreError};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS saved_content (
    id          TEXT PRIMARY KEY,
    content     TEXT NOT NULL,
    platform    TEXT NOT NULL,
    created_at  TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS saved_content_created_at ON saved_content (created_at);
";

/// SQLite-backed saved-content table
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Open (or create) a database file
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Self::init(Connection::open(path)?)
    }

    /// Fresh in-memory database
    pub fn in_memory() -> Result<Self, StoreError> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Run `f` against the connection on the blocking pool
    async fn with_conn<T, F>(&self, f: F) -> Result<T, StoreError>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> Result<T, StoreError> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || f(&lock(&conn))).await?
    }

    fn fetch(conn: &Connection, id: &SavedId) -> Result<Option<SavedItem>, StoreError> {
        let raw = conn
            .query_row(
                "SELECT id, content, platform, created_at FROM saved_content WHERE id = ?1",
                params![id.as_str()],
                raw_row,
            )
            .optional()?;
        Ok(raw.and_then(into_item))
    }
}

/// A panic mid-query leaves the connection itself usable
fn lock(conn: &Mutex<Connection>) -> MutexGuard<'_, Connection> {
    conn.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

type RawRow = (String, String, String, String);

fn raw_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawRow> {
    Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?))
}

fn into_item((id, content, platform, created_at): RawRow) -> Option<SavedItem> {
    let platform = match platform.parse::<Platform>() {
        Ok(p) => p,
        Err(_) => {
            warn!(%id, %platform, "Skipping row with unknown platform");
            return None;
        }
    };
    let created_at = match DateTime::parse_from_rfc3339(&created_at) {
        Ok(t) => t.with_timezone(&Utc),
        Err(_) => {
            warn!(%id, %created_at, "Skipping row with unreadable timestamp");
            return None;
        }
    };
    Some(SavedItem {
        id: SavedId::new(id),
        content,
        platform,
        created_at,
    })
}

#[async_trait]
impl SavedStore for SqliteStore {
    fn name(&self) -> &str {
        "sqlite"
    }

    async fn insert(&self, item: NewSavedItem) -> Result<SavedItem, StoreError> {
        let id = SavedId::new(Uuid::new_v4().to_string());

        self.with_conn(move |conn| {
            conn.execute(
                "INSERT INTO saved_content (id, content, platform, created_at) VALUES (?1, ?2, ?3, ?4)",
                params![
                    id.as_str(),
                    item.content,
                    item.platform.tag(),
                    item.created_at.to_rfc3339()
                ],
            )?;
            debug!(%id, "Inserted saved item");

            Ok(SavedItem {
                id,
                content: item.content,
                platform: item.platform,
                created_at: item.created_at,
            })
        })
        .await
    }

    async fn list(&self) -> Result<Vec<SavedItem>, StoreError> {
        let raws = self
            .with_conn(|conn| {
                let mut stmt = conn.prepare(
                    "SELECT id, content, platform, created_at FROM saved_content ORDER BY created_at DESC",
                )?;
                let raws = stmt
                    .query_map([], raw_row)?
                    .collect::<rusqlite::Result<Vec<_>>>()?;
                Ok(raws)
            })
            .await?;

        let mut items: Vec<SavedItem> = raws.into_iter().filter_map(into_item).collect();
        // Text ordering breaks on mixed offsets; sort on the parsed value
        crate::domain::saved::sort_newest_first(&mut items);
        Ok(items)
    }

    async fn update_content(&self, id: &SavedId, content: &str) -> Result<SavedItem, StoreError> {
        let id = id.clone();
        let content = content.to_string();

        self.with_conn(move |conn| {
            let changed = conn.execute(
                "UPDATE saved_content SET content = ?1 WHERE id = ?2",
                params![content, id.as_str()],
            )?;
            if changed == 0 {
                return Err(StoreError::NotFound(id));
            }
            Self::fetch(conn, &id)?.ok_or(StoreError::NotFound(id))
        })
        .await
    }

    async fn delete(&self, id: &SavedId) -> Result<(), StoreError> {
        let id = id.clone();

        self.with_conn(move |conn| {
            let changed = conn.execute(
                "DELETE FROM saved_content WHERE id = ?1",
                params![id.as_str()],
            )?;
            if changed == 0 {
                return Err(StoreError::NotFound(id));
            }
            Ok(())
        })
        .await
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        self.with_conn(|conn| {
            conn.query_row("SELECT COUNT(*) FROM saved_content", [], |row| row.get::<_, i64>(0))?;
            Ok(())
        })
        .await
    }
}
