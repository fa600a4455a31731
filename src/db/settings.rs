//! Persisted string settings.
//!
//! Backs the "last backup" and "last restore" markers. Both start empty on a
//! fresh database and are rewritten on each successful export or restore.
//! Recording a marker is best-effort: a failed write is logged and dropped so
//! that it never aborts the backup operation it belongs to.

use crate::libs::error::CatalogResult;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};

pub const LAST_BACKUP_KEY: &str = "last_backup_date";
pub const LAST_RESTORE_KEY: &str = "last_restore_date";

const UPSERT_SETTING: &str = "INSERT INTO settings (key, value, updated_at) VALUES (?1, ?2, CURRENT_TIMESTAMP)
    ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = CURRENT_TIMESTAMP";
const SELECT_SETTING: &str = "SELECT value FROM settings WHERE key = ?1";

pub struct Settings<'a> {
    conn: &'a Connection,
}

impl<'a> Settings<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    pub fn get(&self, key: &str) -> CatalogResult<Option<String>> {
        Ok(self.conn.query_row(SELECT_SETTING, params![key], |row| row.get(0)).optional()?)
    }

    pub fn set(&self, key: &str, value: &str) -> CatalogResult<()> {
        self.conn.execute(UPSERT_SETTING, params![key, value])?;
        Ok(())
    }

    /// Writes `value`, logging instead of failing.
    pub fn set_best_effort(&self, key: &str, value: &str) {
        if let Err(e) = self.set(key, value) {
            tracing::warn!(key, error = %e, "failed to persist setting");
        }
    }

    pub fn record_last_backup(&self, at: &str) {
        self.set_best_effort(LAST_BACKUP_KEY, at);
    }

    pub fn record_last_restore(&self, at: &str) {
        self.set_best_effort(LAST_RESTORE_KEY, at);
    }

    /// Timestamp of the last export, `None` when never exported or unreadable.
    pub fn last_backup(&self) -> Option<DateTime<Utc>> {
        self.read_timestamp(LAST_BACKUP_KEY)
    }

    pub fn last_restore(&self) -> Option<DateTime<Utc>> {
        self.read_timestamp(LAST_RESTORE_KEY)
    }

    fn read_timestamp(&self, key: &str) -> Option<DateTime<Utc>> {
        let raw = match self.get(key) {
            Ok(raw) => raw?,
            Err(e) => {
                tracing::warn!(key, error = %e, "failed to read setting");
                return None;
            }
        };
        DateTime::parse_from_rfc3339(&raw).ok().map(|dt| dt.with_timezone(&Utc))
    }
}
