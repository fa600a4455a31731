//! Database schema migration management and versioning system.
//!
//! The record collections are created by numbered migrations, mirroring the
//! way the catalog schema grew: exercises first, courses in the second
//! version, and the settings table for backup bookkeeping in the third.
//!
//! ## Usage
//!
//! ```rust
//! use tabli::db::migrations::{init_with_migrations, get_db_version};
//! use rusqlite::Connection;
//!
//! let mut conn = Connection::open_in_memory()?;
//! init_with_migrations(&mut conn)?;
//! assert_eq!(get_db_version(&conn)?, 3);
//! # Ok::<(), rusqlite::Error>(())
//! ```

use crate::libs::messages::Message;
use crate::msg_debug;
use rusqlite::{params, Connection, Result, Transaction};

/// Tracks which schema versions have been applied.
const MIGRATIONS_TABLE: &str = "
CREATE TABLE IF NOT EXISTS migrations (
    id INTEGER PRIMARY KEY,
    version INTEGER NOT NULL UNIQUE,
    name TEXT NOT NULL,
    applied_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
)";

/// A single schema change.
#[derive(Debug, Clone)]
struct Migration {
    version: u32,
    name: &'static str,
    up: fn(&Transaction) -> Result<()>,
}

/// Registry of all migrations, applied in version order.
pub struct MigrationManager {
    migrations: Vec<Migration>,
}

impl Default for MigrationManager {
    fn default() -> Self {
        Self::new()
    }
}

impl MigrationManager {
    pub fn new() -> Self {
        let mut manager = Self { migrations: Vec::new() };
        manager.register_migrations();
        manager
    }

    fn register_migrations(&mut self) {
        // Version 1: exercise collection with secondary indexes on the fields
        // the catalog sorts and filters by
        self.add_migration(1, "create_exercises", |tx| {
            tx.execute(
                "CREATE TABLE IF NOT EXISTS exercises (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    data TEXT NOT NULL
                )",
                [],
            )?;
            tx.execute("CREATE INDEX IF NOT EXISTS idx_exercises_title ON exercises(json_extract(data, '$.title'))", [])?;
            tx.execute(
                "CREATE INDEX IF NOT EXISTS idx_exercises_difficulty ON exercises(json_extract(data, '$.difficulty'))",
                [],
            )?;
            tx.execute(
                "CREATE INDEX IF NOT EXISTS idx_exercises_category ON exercises(json_extract(data, '$.category'))",
                [],
            )?;
            tx.execute(
                "CREATE INDEX IF NOT EXISTS idx_exercises_favorite ON exercises(json_extract(data, '$.isFavorite'))",
                [],
            )?;
            tx.execute(
                "CREATE INDEX IF NOT EXISTS idx_exercises_last_used ON exercises(json_extract(data, '$.lastUsed'))",
                [],
            )?;
            tx.execute(
                "CREATE INDEX IF NOT EXISTS idx_exercises_usage ON exercises(json_extract(data, '$.usageCount'))",
                [],
            )?;
            Ok(())
        });

        // Version 2: course playlists
        self.add_migration(2, "create_courses", |tx| {
            tx.execute(
                "CREATE TABLE IF NOT EXISTS courses (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    data TEXT NOT NULL
                )",
                [],
            )?;
            tx.execute("CREATE INDEX IF NOT EXISTS idx_courses_title ON courses(json_extract(data, '$.title'))", [])?;
            tx.execute(
                "CREATE INDEX IF NOT EXISTS idx_courses_favorite ON courses(json_extract(data, '$.isFavorite'))",
                [],
            )?;
            Ok(())
        });

        // Version 3: key/value settings for backup and restore markers
        self.add_migration(3, "create_settings", |tx| {
            tx.execute(
                "CREATE TABLE IF NOT EXISTS settings (
                    key TEXT PRIMARY KEY,
                    value TEXT NOT NULL,
                    updated_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
                )",
                [],
            )?;
            Ok(())
        });
    }

    fn add_migration(&mut self, version: u32, name: &'static str, up: fn(&Transaction) -> Result<()>) {
        self.migrations.push(Migration { version, name, up });
    }

    /// Applies every pending migration inside a single transaction.
    pub fn run_migrations(&self, conn: &mut Connection) -> Result<()> {
        conn.execute(MIGRATIONS_TABLE, [])?;

        let current_version = self.get_current_version(conn)?;
        let pending: Vec<&Migration> = self.migrations.iter().filter(|m| m.version > current_version).collect();

        if pending.is_empty() {
            msg_debug!(Message::DatabaseUpToDate);
            return Ok(());
        }

        let tx = conn.transaction()?;
        for migration in pending {
            msg_debug!(Message::RunningMigration(migration.version, migration.name.to_string()));
            (migration.up)(&tx)?;
            tx.execute("INSERT INTO migrations (version, name) VALUES (?1, ?2)", params![migration.version, migration.name])?;
            tracing::info!(version = migration.version, name = migration.name, "migration applied");
        }
        tx.commit()?;

        Ok(())
    }

    fn get_current_version(&self, conn: &Connection) -> Result<u32> {
        let version: Option<u32> = conn.query_row("SELECT MAX(version) FROM migrations", [], |row| row.get(0))?;
        Ok(version.unwrap_or(0))
    }

    pub fn is_migration_applied(&self, conn: &Connection, version: u32) -> Result<bool> {
        let count: i32 = conn.query_row("SELECT COUNT(*) FROM migrations WHERE version = ?1", params![version], |row| row.get(0))?;
        Ok(count > 0)
    }

    /// Applied migrations as `(version, name, applied_at)`, oldest first.
    pub fn get_migration_history(&self, conn: &Connection) -> Result<Vec<(u32, String, String)>> {
        let mut stmt = conn.prepare("SELECT version, name, applied_at FROM migrations ORDER BY version")?;
        let history = stmt
            .query_map([], |row| Ok((row.get::<_, u32>(0)?, row.get::<_, String>(1)?, row.get::<_, String>(2)?)))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(history)
    }

    pub fn latest_version(&self) -> u32 {
        self.migrations.last().map(|m| m.version).unwrap_or(0)
    }
}

/// Brings the connection's schema up to date.
pub fn init_with_migrations(conn: &mut Connection) -> Result<()> {
    MigrationManager::new().run_migrations(conn)
}

pub fn get_db_version(conn: &Connection) -> Result<u32> {
    MigrationManager::new().get_current_version(conn)
}

pub fn needs_migration(conn: &Connection) -> Result<bool> {
    let manager = MigrationManager::new();
    Ok(manager.get_current_version(conn)? < manager.latest_version())
}
