//! Keyed JSON record collections on top of SQLite.
//!
//! Each collection is a table of `(id INTEGER PRIMARY KEY AUTOINCREMENT, data TEXT)`.
//! Records are stored as JSON documents without their `_id`; the key is
//! attached as a string `_id` whenever a record is read back. `AUTOINCREMENT`
//! keeps key assignment monotonic, so a key is never handed out twice, even
//! after a delete or a `clear`.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use tabli::db::{db::Db, store::{Collection, CollectionName}};
//! use tabli::libs::exercise::Exercise;
//!
//! let db = Db::in_memory()?;
//! let exercises: Collection<Exercise> = Collection::new(&db.conn, CollectionName::Exercises);
//! let favorites = exercises.scan(|e| e.is_favorite)?;
//! # Ok::<(), tabli::libs::error::CatalogError>(())
//! ```

use crate::libs::error::CatalogResult;
use rusqlite::{params, Connection, OptionalExtension};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use std::marker::PhantomData;

/// Field carrying the record key in serialized records.
pub const ID_FIELD: &str = "_id";

/// The record collections known to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionName {
    Exercises,
    Courses,
}

impl CollectionName {
    pub fn table(&self) -> &'static str {
        match self {
            CollectionName::Exercises => "exercises",
            CollectionName::Courses => "courses",
        }
    }
}

/// Typed view over one collection.
pub struct Collection<'a, R> {
    conn: &'a Connection,
    name: CollectionName,
    _record: PhantomData<R>,
}

impl<'a, R> Collection<'a, R>
where
    R: Serialize + DeserializeOwned,
{
    pub fn new(conn: &'a Connection, name: CollectionName) -> Self {
        Self {
            conn,
            name,
            _record: PhantomData,
        }
    }

    /// Inserts a record and returns the key the store assigned to it.
    /// Any `_id` carried by the record is ignored.
    pub fn add(&self, record: &R) -> CatalogResult<i64> {
        let data = encode(record)?;
        self.conn.execute(&format!("INSERT INTO {} (data) VALUES (?1)", self.name.table()), params![data])?;
        Ok(self.conn.last_insert_rowid())
    }

    pub fn get(&self, key: i64) -> CatalogResult<Option<R>> {
        let data: Option<String> = self
            .conn
            .query_row(&format!("SELECT data FROM {} WHERE id = ?1", self.name.table()), params![key], |row| row.get(0))
            .optional()?;

        data.map(|data| decode(key, &data)).transpose()
    }

    /// Upserts the full record under `key`.
    pub fn put(&self, key: i64, record: &R) -> CatalogResult<()> {
        let data = encode(record)?;
        self.conn
            .execute(&format!("INSERT OR REPLACE INTO {} (id, data) VALUES (?1, ?2)", self.name.table()), params![key, data])?;
        Ok(())
    }

    /// Removes the record; returns whether one existed.
    pub fn delete(&self, key: i64) -> CatalogResult<bool> {
        let affected = self.conn.execute(&format!("DELETE FROM {} WHERE id = ?1", self.name.table()), params![key])?;
        Ok(affected > 0)
    }

    pub fn clear(&self) -> CatalogResult<()> {
        self.conn.execute(&format!("DELETE FROM {}", self.name.table()), [])?;
        Ok(())
    }

    pub fn count(&self) -> CatalogResult<usize> {
        let count: i64 = self.conn.query_row(&format!("SELECT COUNT(*) FROM {}", self.name.table()), [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Every record in key order.
    pub fn all(&self) -> CatalogResult<Vec<R>> {
        self.scan(|_| true)
    }

    /// Full scan keeping the records accepted by `predicate`, in key order.
    pub fn scan<F>(&self, predicate: F) -> CatalogResult<Vec<R>>
    where
        F: Fn(&R) -> bool,
    {
        let mut stmt = self.conn.prepare(&format!("SELECT id, data FROM {} ORDER BY id", self.name.table()))?;
        let rows = stmt.query_map([], |row| Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?)))?;

        let mut records = Vec::new();
        for row in rows {
            let (key, data) = row?;
            let record = decode(key, &data)?;
            if predicate(&record) {
                records.push(record);
            }
        }
        Ok(records)
    }
}

fn encode<R: Serialize>(record: &R) -> CatalogResult<String> {
    let mut value = serde_json::to_value(record)?;
    if let Value::Object(map) = &mut value {
        map.remove(ID_FIELD);
    }
    Ok(serde_json::to_string(&value)?)
}

fn decode<R: DeserializeOwned>(key: i64, data: &str) -> CatalogResult<R> {
    let mut value: Value = serde_json::from_str(data)?;
    if let Value::Object(map) = &mut value {
        map.insert(ID_FIELD.to_string(), Value::String(key.to_string()));
    }
    Ok(serde_json::from_value(value)?)
}
