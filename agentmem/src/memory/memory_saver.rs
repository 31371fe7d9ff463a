use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::checkpoint::{Checkpoint, CheckpointListItem};
use super::checkpointer::{thread_id, CheckpointError, Checkpointer};
use super::config::RunnableConfig;

/// In-memory checkpointer for dev and tests. Keeps every checkpoint per thread.
#[derive(Default)]
pub struct MemorySaver {
    threads: RwLock<HashMap<String, Vec<Checkpoint>>>,
}

impl MemorySaver {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Checkpointer for MemorySaver {
    async fn put(
        &self,
        config: &RunnableConfig,
        checkpoint: &Checkpoint,
    ) -> Result<String, CheckpointError> {
        let thread = thread_id(config)?;
        let mut threads = self.threads.write().await;
        threads
            .entry(thread.to_string())
            .or_default()
            .push(checkpoint.clone());
        Ok(checkpoint.id.clone())
    }

    async fn get(&self, config: &RunnableConfig) -> Result<Option<Checkpoint>, CheckpointError> {
        let thread = thread_id(config)?;
        let threads = self.threads.read().await;
        let Some(list) = threads.get(thread) else {
            return Ok(None);
        };
        match &config.checkpoint_id {
            Some(id) => list
                .iter()
                .find(|c| &c.id == id)
                .cloned()
                .map(Some)
                .ok_or_else(|| CheckpointError::NotFound(id.clone())),
            None => Ok(list.last().cloned()),
        }
    }

    async fn list(
        &self,
        config: &RunnableConfig,
        limit: Option<usize>,
    ) -> Result<Vec<CheckpointListItem>, CheckpointError> {
        let thread = thread_id(config)?;
        let threads = self.threads.read().await;
        Ok(threads
            .get(thread)
            .map(|list| {
                list.iter()
                    .rev()
                    .take(limit.unwrap_or(usize::MAX))
                    .map(|c| CheckpointListItem {
                        checkpoint_id: c.id.clone(),
                        metadata: c.metadata.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::CheckpointSource;
    use crate::message::Message;

    /// **Scenario**: get returns the latest checkpoint, or a specific one by id.
    #[tokio::test]
    async fn put_get_latest_and_by_id() {
        let saver = MemorySaver::new();
        let config = RunnableConfig::for_thread("t1");
        let first = Checkpoint::from_messages(vec![Message::user("a")], CheckpointSource::Loop, 1);
        let second = Checkpoint::from_messages(
            vec![Message::user("a"), Message::assistant("b")],
            CheckpointSource::Loop,
            1,
        );
        saver.put(&config, &first).await.unwrap();
        saver.put(&config, &second).await.unwrap();

        let latest = saver.get(&config).await.unwrap().unwrap();
        assert_eq!(latest.messages.len(), 2);

        let mut by_id = config.clone();
        by_id.checkpoint_id = Some(first.id.clone());
        assert_eq!(saver.get(&by_id).await.unwrap().unwrap().id, first.id);

        let items = saver.list(&config, Some(1)).await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].checkpoint_id, second.id);
    }

    /// **Scenario**: Missing thread_id is rejected; unknown threads return None.
    #[tokio::test]
    async fn thread_id_required_and_unknown_thread() {
        let saver = MemorySaver::new();
        let cp = Checkpoint::from_messages(vec![], CheckpointSource::Input, 0);
        let err = saver.put(&RunnableConfig::default(), &cp).await.unwrap_err();
        assert!(matches!(err, CheckpointError::ThreadIdRequired));
        assert!(saver
            .get(&RunnableConfig::for_thread("nobody"))
            .await
            .unwrap()
            .is_none());
    }
}
