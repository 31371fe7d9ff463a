//! Run config: thread_id, checkpoint_id, user_id.
//!
//! Passed to `AgentRunner::run_with_config` and to `Checkpointer` implementations.

/// Config for a single run. Identifies the conversation thread and the user.
///
/// When a checkpointer is attached, `thread_id` selects the conversation whose
/// history is loaded before the run and saved after it.
#[derive(Debug, Clone, Default)]
pub struct RunnableConfig {
    /// Unique id for this conversation/thread. Required when using a checkpointer.
    pub thread_id: Option<String>,
    /// If set, load this checkpoint instead of the latest.
    pub checkpoint_id: Option<String>,
    /// User identity; the memory namespace and authorization grants derive from it.
    pub user_id: Option<String>,
}

impl RunnableConfig {
    pub fn for_thread(thread_id: impl Into<String>) -> Self {
        Self {
            thread_id: Some(thread_id.into()),
            ..Self::default()
        }
    }

    pub fn with_user(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }
}
