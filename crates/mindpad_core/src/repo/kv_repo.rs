//! Key-value slot contracts and storage implementations.
//!
//! # Responsibility
//! - Model the host key-value store as named string slots.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - `set` overwrites the whole slot value (last write wins).
//! - Reading a missing slot returns `None`, never an error.

use crate::db::DbError;
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for slot storage operations.
#[derive(Debug)]
pub enum RepoError {
    /// Storage transport failure.
    Db(DbError),
    /// Connection is missing the table this repository needs.
    MissingRequiredTable(&'static str),
    /// Snapshot value could not be encoded for storage.
    Encode(serde_json::Error),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::MissingRequiredTable(table) => write!(f, "missing required table `{table}`"),
            Self::Encode(err) => write!(f, "failed to encode slot value: {err}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::MissingRequiredTable(_) => None,
            Self::Encode(err) => Some(err),
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

/// Named string slots available to the host environment.
pub trait KvStore {
    /// Reads one slot, `None` when it was never written.
    fn get(&self, key: &str) -> RepoResult<Option<String>>;
    /// Replaces one slot value.
    fn set(&mut self, key: &str, value: &str) -> RepoResult<()>;
}

impl<S: KvStore + ?Sized> KvStore for Box<S> {
    fn get(&self, key: &str) -> RepoResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> RepoResult<()> {
        (**self).set(key, value)
    }
}

/// SQLite-backed slot store over the `kv_entries` table.
pub struct SqliteKvStore {
    conn: Connection,
}

impl SqliteKvStore {
    /// Constructs a store from a migrated connection.
    ///
    /// # Errors
    /// - `MissingRequiredTable` when migrations were not applied.
    pub fn try_new(conn: Connection) -> RepoResult<Self> {
        if !table_exists(&conn, "kv_entries")? {
            return Err(RepoError::MissingRequiredTable("kv_entries"));
        }
        Ok(Self { conn })
    }

    /// Borrows the underlying connection.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl KvStore for SqliteKvStore {
    fn get(&self, key: &str) -> RepoResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_entries WHERE key = ?1;",
                [key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set(&mut self, key: &str, value: &str) -> RepoResult<()> {
        self.conn.execute(
            "INSERT INTO kv_entries (key, value, updated_at)
             VALUES (?1, ?2, strftime('%s', 'now') * 1000)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at;",
            params![key, value],
        )?;
        Ok(())
    }
}

/// Process-local slot store, used by tests and throwaway sessions.
#[derive(Debug, Clone, Default)]
pub struct MemoryKvStore {
    entries: HashMap<String, String>,
}

impl MemoryKvStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store with one slot pre-populated.
    pub fn with_entry(key: impl Into<String>, value: impl Into<String>) -> Self {
        let mut entries = HashMap::new();
        entries.insert(key.into(), value.into());
        Self { entries }
    }
}

impl KvStore for MemoryKvStore {
    fn get(&self, key: &str) -> RepoResult<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> RepoResult<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}
