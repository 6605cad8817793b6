//! Whole-record key/value storage.
//!
//! Each record is a single text value under a fixed key. Values are read
//! whole and written whole; there are no partial updates.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use anyhow::{Context, Result};
use chrono::Utc;
use rusqlite::{Connection, OptionalExtension};

/// Durable storage for named records.
pub trait RecordStore {
    /// Reads the record stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be read.
    fn read(&self, key: &str) -> Result<Option<String>>;

    /// Replaces the record stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be written.
    fn write(&self, key: &str, value: &str) -> Result<()>;
}

/// `SQLite`-backed record store (`records` table).
#[derive(Debug)]
pub struct SqliteRecordStore {
    conn: Connection,
}

impl SqliteRecordStore {
    /// Wraps a migrated connection (see [`crate::open_db`]).
    #[must_use]
    pub const fn new(conn: Connection) -> Self {
        Self { conn }
    }
}

impl RecordStore for SqliteRecordStore {
    fn read(&self, key: &str) -> Result<Option<String>> {
        self.conn
            .query_row(
                "SELECT value FROM records WHERE key = ?1",
                rusqlite::params![key],
                |row| row.get(0),
            )
            .optional()
            .with_context(|| format!("failed to read record {key}"))
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        self.conn
            .execute(
                "INSERT INTO records (key, value, updated_at) VALUES (?1, ?2, ?3)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
                rusqlite::params![key, value, Utc::now().to_rfc3339()],
            )
            .with_context(|| format!("failed to write record {key}"))?;
        Ok(())
    }
}

/// In-process record store for tests and throwaway sessions.
#[derive(Debug, Default)]
pub struct MemoryRecordStore {
    records: Mutex<HashMap<String, String>>,
}

impl MemoryRecordStore {
    /// Creates a store pre-populated with one record.
    #[must_use]
    pub fn with_record(key: &str, value: &str) -> Self {
        let store = Self::default();
        store
            .records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(String::from(key), String::from(value));
        store
    }
}

impl RecordStore for MemoryRecordStore {
    fn read(&self, key: &str) -> Result<Option<String>> {
        let records = self.records.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(records.get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(String::from(key), String::from(value));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::open_db;

    #[test]
    fn test_sqlite_read_missing_key() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let store = SqliteRecordStore::new(open_db(Some(dir.path())).unwrap());

        // Act
        let value = store.read("favorites").unwrap();

        // Assert
        assert!(value.is_none());
    }

    #[test]
    fn test_sqlite_write_replaces_whole_record() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let store = SqliteRecordStore::new(open_db(Some(dir.path())).unwrap());

        // Act
        store.write("favorites", "[1]").unwrap();
        store.write("favorites", "[]").unwrap();

        // Assert
        assert_eq!(store.read("favorites").unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_sqlite_survives_reopen() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        {
            let store = SqliteRecordStore::new(open_db(Some(dir.path())).unwrap());
            store.write("k", "v").unwrap();
        }

        // Act
        let store = SqliteRecordStore::new(open_db(Some(dir.path())).unwrap());

        // Assert
        assert_eq!(store.read("k").unwrap().as_deref(), Some("v"));
    }

    #[test]
    fn test_memory_store_roundtrip() {
        // Arrange
        let store = MemoryRecordStore::with_record("a", "1");

        // Act
        store.write("b", "2").unwrap();

        // Assert
        assert_eq!(store.read("a").unwrap().as_deref(), Some("1"));
        assert_eq!(store.read("b").unwrap().as_deref(), Some("2"));
        assert!(store.read("c").unwrap().is_none());
    }
}
