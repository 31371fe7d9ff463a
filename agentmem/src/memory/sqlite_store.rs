//! SQLite-backed Store (feature `sqlite`).
//!
//! One table keyed by `(ns, key)`; `seq` preserves insertion order for ranking
//! ties. Search loads the namespace rows and ranks them like `InMemoryStore`.

use std::path::Path;
use std::sync::Mutex;

use async_trait::async_trait;
use rusqlite::{params, Connection};
use serde_json::Value;

use crate::memory::store::{
    rank_rows, Namespace, Store, StoreError, StoreSearchHit, DEFAULT_SEARCH_LIMIT,
};

/// Persistent store in a SQLite file.
///
/// **Interaction**: Used as `Arc<dyn Store>` by the CLI when `DB_PATH` is set.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Opens (or creates) the database at `path` and ensures the table exists.
    pub fn new(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let conn = Connection::open(path).map_err(|e| StoreError::Storage(e.to_string()))?;
        Self::init(conn)
    }

    /// In-memory database, for tests.
    pub fn in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory().map_err(|e| StoreError::Storage(e.to_string()))?;
        Self::init(conn)
    }

    fn init(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS store (
                seq   INTEGER PRIMARY KEY AUTOINCREMENT,
                ns    TEXT NOT NULL,
                key   TEXT NOT NULL,
                value TEXT NOT NULL,
                UNIQUE(ns, key)
            );",
        )
        .map_err(|e| StoreError::Storage(e.to_string()))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn ns_key(namespace: &Namespace) -> Result<String, StoreError> {
        serde_json::to_string(namespace).map_err(|e| StoreError::Serialization(e.to_string()))
    }

    fn with_conn<T>(
        &self,
        f: impl FnOnce(&Connection) -> rusqlite::Result<T>,
    ) -> Result<T, StoreError> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| StoreError::Storage(format!("connection lock poisoned: {}", e)))?;
        f(&conn).map_err(|e| StoreError::Storage(e.to_string()))
    }

    fn rows(&self, namespace: &Namespace) -> Result<Vec<(u64, String, Value)>, StoreError> {
        let ns = Self::ns_key(namespace)?;
        let raw: Vec<(i64, String, String)> = self.with_conn(|conn| {
            let mut stmt =
                conn.prepare("SELECT seq, key, value FROM store WHERE ns = ?1 ORDER BY seq")?;
            let rows = stmt.query_map(params![ns], |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?)))?;
            rows.collect()
        })?;
        raw.into_iter()
            .map(|(seq, key, value)| {
                let value: Value = serde_json::from_str(&value)
                    .map_err(|e| StoreError::Serialization(e.to_string()))?;
                Ok((seq as u64, key, value))
            })
            .collect()
    }
}

#[async_trait]
impl Store for SqliteStore {
    async fn put(&self, namespace: &Namespace, key: &str, value: &Value) -> Result<(), StoreError> {
        let ns = Self::ns_key(namespace)?;
        let value =
            serde_json::to_string(value).map_err(|e| StoreError::Serialization(e.to_string()))?;
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO store (ns, key, value) VALUES (?1, ?2, ?3)
                 ON CONFLICT(ns, key) DO UPDATE SET value = excluded.value",
                params![ns, key, value],
            )
        })?;
        Ok(())
    }

    async fn get(&self, namespace: &Namespace, key: &str) -> Result<Option<Value>, StoreError> {
        let ns = Self::ns_key(namespace)?;
        let raw: Option<String> = self.with_conn(|conn| {
            let mut stmt = conn.prepare("SELECT value FROM store WHERE ns = ?1 AND key = ?2")?;
            let mut rows = stmt.query(params![ns, key])?;
            let value = match rows.next()? {
                Some(row) => Some(row.get(0)?),
                None => None,
            };
            Ok(value)
        })?;
        raw.map(|s| serde_json::from_str(&s).map_err(|e| StoreError::Serialization(e.to_string())))
            .transpose()
    }

    async fn list(&self, namespace: &Namespace) -> Result<Vec<String>, StoreError> {
        Ok(self
            .rows(namespace)?
            .into_iter()
            .map(|(_, key, _)| key)
            .collect())
    }

    async fn search(
        &self,
        namespace: &Namespace,
        query: Option<&str>,
        limit: Option<usize>,
    ) -> Result<Vec<StoreSearchHit>, StoreError> {
        let limit = limit.unwrap_or(DEFAULT_SEARCH_LIMIT).min(1000);
        Ok(rank_rows(self.rows(namespace)?, query, limit))
    }
}
