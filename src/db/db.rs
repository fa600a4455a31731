use crate::db::migrations::init_with_migrations;
use crate::libs::data_storage::DataStorage;
use crate::libs::error::CatalogResult;
use rusqlite::Connection;
use std::path::{Path, PathBuf};

pub const DB_FILE_NAME: &str = "tabli.db";

/// Connection to the catalog database with the schema brought up to date.
pub struct Db {
    pub conn: Connection,
    path: Option<PathBuf>,
}

impl Db {
    /// Opens the database in the platform data directory.
    pub fn new() -> CatalogResult<Db> {
        let db_file_path = DataStorage::new().get_path(DB_FILE_NAME)?;
        Self::open(db_file_path)
    }

    pub fn open<P: AsRef<Path>>(path: P) -> CatalogResult<Db> {
        let mut conn = Connection::open(path.as_ref())?;
        init_with_migrations(&mut conn)?;

        Ok(Db {
            conn,
            path: Some(path.as_ref().to_path_buf()),
        })
    }

    /// Private in-memory database, used by tests and dry runs.
    pub fn in_memory() -> CatalogResult<Db> {
        let mut conn = Connection::open_in_memory()?;
        init_with_migrations(&mut conn)?;

        Ok(Db { conn, path: None })
    }

    /// File backing this database, `None` for in-memory databases.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}
