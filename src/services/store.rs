use crate::error::AppError;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

pub const SETTINGS_KEY: &str = "farmLensSettings";
pub const HISTORY_KEY: &str = "farmLensHistory";

/// Durable key-value store holding whole serialized blobs, one per key.
#[derive(Clone)]
pub struct Store {
    conn: Arc<Mutex<Connection>>,
}

impl Store {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, AppError> {
        let conn = Connection::open(path)?;

        conn.execute_batch("PRAGMA journal_mode = WAL;")?;
        conn.execute_batch("PRAGMA synchronous = NORMAL;")?;

        Self::init(conn)
    }

    pub fn open_in_memory() -> Result<Self, AppError> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self, AppError> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS kv (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            )",
            [],
        )?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, AppError> {
        self.conn
            .lock()
            .map_err(|_| AppError::from("store connection lock poisoned"))
    }

    pub fn get(&self, key: &str) -> Result<Option<String>, AppError> {
        let conn = self.conn()?;
        let value = conn
            .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(value)
    }

    /// Replaces the whole blob stored under `key`.
    pub fn set(&self, key: &str, value: &str) -> Result<(), AppError> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        tracing::debug!(key, bytes = value.len(), "persisted blob");
        Ok(())
    }

    pub fn remove(&self, key: &str) -> Result<(), AppError> {
        let conn = self.conn()?;
        conn.execute("DELETE FROM kv WHERE key = ?1", params![key])?;
        tracing::debug!(key, "removed blob");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_key_reads_as_none() {
        let store = Store::open_in_memory().unwrap();
        assert_eq!(store.get(SETTINGS_KEY).unwrap(), None);
    }

    #[test]
    fn set_overwrites_and_remove_deletes() {
        let store = Store::open_in_memory().unwrap();
        store.set(HISTORY_KEY, "[1]").unwrap();
        store.set(HISTORY_KEY, "[2,1]").unwrap();
        assert_eq!(store.get(HISTORY_KEY).unwrap().as_deref(), Some("[2,1]"));

        store.remove(HISTORY_KEY).unwrap();
        assert_eq!(store.get(HISTORY_KEY).unwrap(), None);
        store.remove(HISTORY_KEY).unwrap();
    }

    #[test]
    fn keys_are_independent() {
        let store = Store::open_in_memory().unwrap();
        store.set(SETTINGS_KEY, "{}").unwrap();
        store.set(HISTORY_KEY, "[]").unwrap();
        store.remove(HISTORY_KEY).unwrap();
        assert_eq!(store.get(SETTINGS_KEY).unwrap().as_deref(), Some("{}"));
    }

    #[test]
    fn file_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("farm-lens.db");
        Store::open(&path).unwrap().set(SETTINGS_KEY, "{\"darkMode\":true}").unwrap();

        let reopened = Store::open(&path).unwrap();
        assert_eq!(
            reopened.get(SETTINGS_KEY).unwrap().as_deref(),
            Some("{\"darkMode\":true}")
        );
    }
}
