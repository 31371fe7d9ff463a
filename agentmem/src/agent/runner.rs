//! Agent runner: drives `TurnProcessor` turns and executes tools between them.
//!
//! ```text
//! process_turn ──End──► done
//!      ▲   │
//!      │   └─RunTools─► call each tool ─► append tool messages
//!      └──────────────────────────────────────┘
//! ```
//!
//! With a [`Checkpointer`] and a `thread_id`, the thread's earlier messages are
//! loaded before the run and the whole history is saved after it.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::logging::{log_tool_call, log_tool_result};
use crate::memory::{Checkpoint, CheckpointError, CheckpointSource, Checkpointer, RunnableConfig};
use crate::message::Message;
use crate::tool_source::ToolSource;
use crate::turn::{TurnDecision, TurnError, TurnProcessor};

/// Model turns allowed per run unless configured otherwise.
pub const DEFAULT_RECURSION_LIMIT: usize = 25;

/// Error type for AgentRunner runs.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error("turn failed: {0}")]
    Turn(#[from] TurnError),
    #[error("checkpoint error: {0}")]
    Checkpoint(#[from] CheckpointError),
    #[error("recursion limit of {0} model turns reached")]
    RecursionLimit(usize),
}

impl RunError {
    /// Plain text for the end user.
    pub fn user_message(&self) -> String {
        match self {
            RunError::Turn(e) => e.user_message(),
            RunError::Checkpoint(_) => {
                "The conversation history could not be loaded or saved.".to_string()
            }
            RunError::RecursionLimit(_) => {
                "The assistant took too many steps and stopped. Please rephrase the request."
                    .to_string()
            }
        }
    }
}

/// Runs turns until `End`, executing tools in between.
///
/// # Example
///
/// ```ignore
/// let runner = AgentRunner::new(processor, Arc::new(tools)).with_recursion_limit(100);
/// let history = runner.run(vec![Message::user("What's the weather in Oslo?")], "u1").await?;
/// ```
pub struct AgentRunner {
    processor: TurnProcessor,
    tools: Arc<dyn ToolSource>,
    checkpointer: Option<Arc<dyn Checkpointer>>,
    recursion_limit: usize,
}

impl AgentRunner {
    pub fn new(processor: TurnProcessor, tools: Arc<dyn ToolSource>) -> Self {
        Self {
            processor,
            tools,
            checkpointer: None,
            recursion_limit: DEFAULT_RECURSION_LIMIT,
        }
    }

    pub fn with_checkpointer(mut self, checkpointer: Arc<dyn Checkpointer>) -> Self {
        self.checkpointer = Some(checkpointer);
        self
    }

    /// Maximum number of model turns in one run.
    pub fn with_recursion_limit(mut self, limit: usize) -> Self {
        self.recursion_limit = limit;
        self
    }

    pub fn processor(&self) -> &TurnProcessor {
        &self.processor
    }

    /// Runs the loop over `history` and returns it extended with every assistant and
    /// tool message produced.
    pub async fn run(&self, history: Vec<Message>, user_id: &str) -> Result<Vec<Message>, RunError> {
        self.run_loop(history, user_id).await.map(|(messages, _)| messages)
    }

    /// Appends `user_message` to the thread's saved history (when a checkpointer and
    /// `thread_id` are set), runs the loop for `config.user_id` and saves the result.
    pub async fn run_with_config(
        &self,
        user_message: &str,
        config: &RunnableConfig,
    ) -> Result<Vec<Message>, RunError> {
        let user_id = config
            .user_id
            .as_deref()
            .ok_or(RunError::Turn(TurnError::InvalidUserId))?;
        let checkpointer = self
            .checkpointer
            .as_ref()
            .filter(|_| config.thread_id.is_some());

        let mut history = match checkpointer {
            Some(cp) => cp
                .get(config)
                .await?
                .map(|checkpoint| checkpoint.messages)
                .unwrap_or_default(),
            None => Vec::new(),
        };
        debug!(loaded = history.len(), "Initial history");
        history.push(Message::user(user_message));

        let (messages, steps) = self.run_loop(history, user_id).await?;

        if let Some(cp) = checkpointer {
            let checkpoint =
                Checkpoint::from_messages(messages.clone(), CheckpointSource::Loop, steps as u64);
            let id = cp.put(config, &checkpoint).await?;
            debug!(checkpoint_id = %id, "Checkpoint saved");
        }
        Ok(messages)
    }

    async fn run_loop(
        &self,
        mut history: Vec<Message>,
        user_id: &str,
    ) -> Result<(Vec<Message>, usize), RunError> {
        for step in 1..=self.recursion_limit {
            let outcome = self.processor.process_turn(&history, user_id).await?;
            history.push(outcome.message);
            match outcome.next {
                TurnDecision::End => return Ok((history, step)),
                TurnDecision::RunTools | TurnDecision::RequireAuthorization => {
                    let results = match history.last() {
                        Some(last) => self.run_tools(last).await,
                        None => Vec::new(),
                    };
                    history.extend(results);
                }
            }
        }
        warn!(limit = self.recursion_limit, "Recursion limit reached");
        Err(RunError::RecursionLimit(self.recursion_limit))
    }

    /// One tool message per call; a failing tool yields its error as the message text.
    async fn run_tools(&self, message: &Message) -> Vec<Message> {
        let mut results = Vec::with_capacity(message.tool_calls().len());
        for tc in message.tool_calls() {
            log_tool_call(&tc.name, &tc.arguments);
            let content = match self.tools.call_tool(&tc.name, tc.arguments.clone()).await {
                Ok(content) => {
                    log_tool_result(&tc.name, &content.text);
                    content.text
                }
                Err(e) => {
                    warn!(tool = %tc.name, error = %e, "Tool call failed");
                    format!("Error: {}", e)
                }
            };
            results.push(Message::tool(tc.id.clone(), tc.name.clone(), content));
        }
        results
    }
}
