//! SQLite-backed Checkpointer (feature `sqlite`).
//!
//! Each checkpoint is one row holding the JSON-serialized `Checkpoint`.

use std::path::Path;
use std::sync::Mutex;

use async_trait::async_trait;
use rusqlite::{params, Connection};

use super::checkpoint::{Checkpoint, CheckpointListItem};
use super::checkpointer::{thread_id, CheckpointError, Checkpointer};
use super::config::RunnableConfig;

/// Persistent checkpointer in a SQLite file.
pub struct SqliteSaver {
    conn: Mutex<Connection>,
}

impl SqliteSaver {
    pub fn new(path: impl AsRef<Path>) -> Result<Self, CheckpointError> {
        let conn =
            Connection::open(path).map_err(|e| CheckpointError::Storage(e.to_string()))?;
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS checkpoints (
                seq           INTEGER PRIMARY KEY AUTOINCREMENT,
                thread_id     TEXT NOT NULL,
                checkpoint_id TEXT NOT NULL,
                data          TEXT NOT NULL,
                UNIQUE(thread_id, checkpoint_id)
            );",
        )
        .map_err(|e| CheckpointError::Storage(e.to_string()))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn with_conn<T>(
        &self,
        f: impl FnOnce(&Connection) -> rusqlite::Result<T>,
    ) -> Result<T, CheckpointError> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| CheckpointError::Storage(format!("connection lock poisoned: {}", e)))?;
        f(&conn).map_err(|e| CheckpointError::Storage(e.to_string()))
    }

    fn load(&self, thread: &str, limit: usize) -> Result<Vec<Checkpoint>, CheckpointError> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let raw: Vec<String> = self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT data FROM checkpoints WHERE thread_id = ?1 ORDER BY seq DESC LIMIT ?2",
            )?;
            let rows = stmt.query_map(params![thread, limit], |r| r.get(0))?;
            rows.collect()
        })?;
        raw.iter()
            .map(|s| {
                serde_json::from_str(s).map_err(|e| CheckpointError::Serialization(e.to_string()))
            })
            .collect()
    }
}

#[async_trait]
impl Checkpointer for SqliteSaver {
    async fn put(
        &self,
        config: &RunnableConfig,
        checkpoint: &Checkpoint,
    ) -> Result<String, CheckpointError> {
        let thread = thread_id(config)?;
        let data = serde_json::to_string(checkpoint)
            .map_err(|e| CheckpointError::Serialization(e.to_string()))?;
        self.with_conn(|conn| {
            conn.execute(
                "INSERT OR REPLACE INTO checkpoints (thread_id, checkpoint_id, data)
                 VALUES (?1, ?2, ?3)",
                params![thread, checkpoint.id, data],
            )
        })?;
        Ok(checkpoint.id.clone())
    }

    async fn get(&self, config: &RunnableConfig) -> Result<Option<Checkpoint>, CheckpointError> {
        let thread = thread_id(config)?;
        match &config.checkpoint_id {
            Some(id) => self
                .load(thread, usize::MAX)?
                .into_iter()
                .find(|c| &c.id == id)
                .map(Some)
                .ok_or_else(|| CheckpointError::NotFound(id.clone())),
            None => Ok(self.load(thread, 1)?.into_iter().next()),
        }
    }

    async fn list(
        &self,
        config: &RunnableConfig,
        limit: Option<usize>,
    ) -> Result<Vec<CheckpointListItem>, CheckpointError> {
        let thread = thread_id(config)?;
        Ok(self
            .load(thread, limit.unwrap_or(usize::MAX))?
            .into_iter()
            .map(|c| CheckpointListItem {
                checkpoint_id: c.id,
                metadata: c.metadata,
            })
            .collect())
    }
}
