//! Named blob repository contract with SQLite and in-memory backends.
//!
//! # Responsibility
//! - Read and write one text value per name.
//! - Provide an in-memory backend for tests and ephemeral sessions.
//!
//! # Invariants
//! - `write_blob` replaces any previous value for the same name.
//! - `read_blob` returns `Ok(None)` for names never written.

use crate::db::DbError;
use rusqlite::{params, Connection, OptionalExtension};
use std::cell::RefCell;
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Blob name under which tracked periods are persisted.
pub const PERIODS_BLOB_NAME: &str = "cycleTrackerData";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for blob persistence.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Storage contract for named text blobs.
pub trait BlobRepository {
    fn read_blob(&self, name: &str) -> RepoResult<Option<String>>;
    fn write_blob(&self, name: &str, value: &str) -> RepoResult<()>;
}

/// SQLite-backed blob repository over the `blobs` table.
pub struct SqliteBlobRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteBlobRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl BlobRepository for SqliteBlobRepository<'_> {
    fn read_blob(&self, name: &str) -> RepoResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM blobs WHERE name = ?1;",
                [name],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn write_blob(&self, name: &str, value: &str) -> RepoResult<()> {
        self.conn.execute(
            "INSERT INTO blobs (name, value) VALUES (?1, ?2)
             ON CONFLICT(name) DO UPDATE SET
                value = excluded.value,
                updated_at = (strftime('%s', 'now') * 1000);",
            params![name, value],
        )?;
        Ok(())
    }
}

/// Process-local blob repository; contents vanish with the value.
#[derive(Debug, Default)]
pub struct MemoryBlobRepository {
    blobs: RefCell<HashMap<String, String>>,
}

impl MemoryBlobRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a repository pre-populated with one blob.
    pub fn with_blob(name: &str, value: impl Into<String>) -> Self {
        let repo = Self::new();
        repo.blobs.borrow_mut().insert(name.to_string(), value.into());
        repo
    }
}

impl BlobRepository for MemoryBlobRepository {
    fn read_blob(&self, name: &str) -> RepoResult<Option<String>> {
        Ok(self.blobs.borrow().get(name).cloned())
    }

    fn write_blob(&self, name: &str, value: &str) -> RepoResult<()> {
        self.blobs
            .borrow_mut()
            .insert(name.to_string(), value.to_string());
        Ok(())
    }
}
