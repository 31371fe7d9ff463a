//! Checkpoint and metadata types for conversation history.

use std::time::SystemTime;

use serde::{Deserialize, Serialize};

use crate::message::Message;

/// Metadata for a single checkpoint (source, step, created_at).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckpointMetadata {
    pub source: CheckpointSource,
    /// Number of model turns the run took before this checkpoint.
    pub step: u64,
    pub created_at: Option<SystemTime>,
}

/// What produced the checkpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CheckpointSource {
    /// Saved before the run, holding only the input.
    Input,
    /// Saved after the agent loop finished.
    Loop,
    /// Written directly by a caller.
    Update,
}

/// One checkpoint: the thread's message history at a point in time.
///
/// **Interaction**: Produced by `AgentRunner` after a run; stored by `Checkpointer::put`,
/// returned by `Checkpointer::get`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Checkpoint {
    pub id: String,
    pub ts: String,
    pub messages: Vec<Message>,
    pub metadata: CheckpointMetadata,
}

/// Item returned by `Checkpointer::list`.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckpointListItem {
    pub checkpoint_id: String,
    pub metadata: CheckpointMetadata,
}

impl Checkpoint {
    /// Creates a checkpoint from the current history. Uses current time for id/ts.
    pub fn from_messages(messages: Vec<Message>, source: CheckpointSource, step: u64) -> Self {
        let now = SystemTime::now();
        let ts = format!(
            "{}",
            now.duration_since(SystemTime::UNIX_EPOCH)
                .map(|d| d.as_millis())
                .unwrap_or(0)
        );
        let id = format!("{}-{}", ts, uuid::Uuid::new_v4().simple());
        Self {
            id,
            ts,
            messages,
            metadata: CheckpointMetadata {
                source,
                step,
                created_at: Some(now),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// **Scenario**: from_messages fills id/ts/metadata; two checkpoints get distinct ids.
    #[test]
    fn from_messages_sets_metadata() {
        let a = Checkpoint::from_messages(vec![Message::user("hi")], CheckpointSource::Loop, 2);
        let b = Checkpoint::from_messages(vec![], CheckpointSource::Input, 0);
        assert_ne!(a.id, b.id);
        assert!(a.id.starts_with(&a.ts));
        assert_eq!(a.metadata.step, 2);
        assert_eq!(a.metadata.source, CheckpointSource::Loop);
        assert!(a.metadata.created_at.is_some());
        assert_eq!(a.messages.len(), 1);
    }
}
