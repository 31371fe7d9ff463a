//! Checkpointer trait: per-thread conversation history persistence.

use async_trait::async_trait;
use thiserror::Error;

use super::checkpoint::{Checkpoint, CheckpointListItem};
use super::config::RunnableConfig;

/// Errors from checkpoint operations.
#[derive(Debug, Error)]
pub enum CheckpointError {
    #[error("thread_id required")]
    ThreadIdRequired,
    #[error("serialization: {0}")]
    Serialization(String),
    #[error("storage: {0}")]
    Storage(String),
    #[error("checkpoint not found: {0}")]
    NotFound(String),
}

/// Saves and loads checkpoints keyed by `config.thread_id`.
///
/// `get` returns the checkpoint named by `config.checkpoint_id`, or the latest
/// one for the thread when no id is given.
#[async_trait]
pub trait Checkpointer: Send + Sync {
    /// Stores `checkpoint` for the thread and returns its id.
    async fn put(
        &self,
        config: &RunnableConfig,
        checkpoint: &Checkpoint,
    ) -> Result<String, CheckpointError>;

    async fn get(&self, config: &RunnableConfig) -> Result<Option<Checkpoint>, CheckpointError>;

    /// Checkpoints of the thread, newest first.
    async fn list(
        &self,
        config: &RunnableConfig,
        limit: Option<usize>,
    ) -> Result<Vec<CheckpointListItem>, CheckpointError>;
}

pub(crate) fn thread_id(config: &RunnableConfig) -> Result<&str, CheckpointError> {
    config
        .thread_id
        .as_deref()
        .ok_or(CheckpointError::ThreadIdRequired)
}
