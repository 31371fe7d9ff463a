//! Shared run logic: wire the processor and the agent loop from config and collaborators.
//!
//! Used by [`run_with_config`](super::run_with_config) and by tests that inject
//! `MockLlm`, `InMemoryStore`, `MemorySaver` and `BufferSink`.

use std::sync::Arc;

use agentmem::{
    AgentRunner, Checkpointer, LlmClient, Message, OutputSink, RunnableConfig,
    StaticCapabilityRegistry, Store, ToolSource, TurnProcessor,
};

use crate::config::RunConfig;

use super::Error;

/// Everything a run needs besides configuration.
pub(crate) struct Collaborators {
    pub llm: Arc<dyn LlmClient>,
    pub tools: Arc<dyn ToolSource>,
    pub store: Arc<dyn Store>,
    pub checkpointer: Option<Arc<dyn Checkpointer>>,
    pub sink: Arc<dyn OutputSink>,
}

/// Runs `user_message` for the configured user. With a checkpointer and a thread id the
/// thread's history is continued and saved.
pub(crate) async fn run_agent(
    config: &RunConfig,
    user_message: &str,
    collaborators: Collaborators,
) -> Result<Vec<Message>, Error> {
    let user_id = config.require_user_id()?;
    let registry = StaticCapabilityRegistry::new(config.auth_required_tools.clone())
        .with_url_base(config.auth_url_base.clone());

    let processor = TurnProcessor::new(
        collaborators.llm,
        collaborators.store,
        Arc::new(registry),
        collaborators.sink,
    )
    .with_auth_timeout(config.auth_timeout);

    let mut runner = AgentRunner::new(processor, collaborators.tools)
        .with_recursion_limit(config.recursion_limit);
    if let Some(cp) = collaborators.checkpointer {
        runner = runner.with_checkpointer(cp);
    }

    let runnable_config = RunnableConfig {
        thread_id: config.thread_id.clone(),
        checkpoint_id: None,
        user_id: Some(user_id.to_string()),
    };
    tracing::debug!(
        user_id,
        thread_id = ?runnable_config.thread_id,
        recursion_limit = config.recursion_limit,
        "Running agent"
    );
    let messages = runner.run_with_config(user_message, &runnable_config).await?;
    Ok(messages)
}
