//! The turn processor: memory recall and storage, prompt assembly, streaming
//! and tool-call routing for one turn.

use std::sync::Arc;
use std::time::Duration;

use tokio_stream::StreamExt;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::decision::{decide_next_step, TurnDecision};
use super::error::TurnError;
use super::prompt::{build_system_prompt, wants_to_remember, with_system_message, DEFAULT_PREAMBLE};
use crate::capability::{AuthStatus, CapabilityRegistry};
use crate::llm::LlmClient;
use crate::logging::{log_turn_complete, log_turn_error, log_turn_start};
use crate::memory::{memory_namespace, MemoryRecord, Namespace, RecallPolicy, Store};
use crate::message::{last_user_message, Message};
use crate::sink::OutputSink;
use crate::tool_call::ToolCallAccumulator;

/// How long `authorize_pending` waits for one authorization before re-checking it.
pub const DEFAULT_AUTH_TIMEOUT: Duration = Duration::from_secs(300);

/// Result of [`TurnProcessor::process_turn`].
#[derive(Debug, Clone, PartialEq)]
pub struct TurnOutcome {
    /// The assistant message to append to the history.
    pub message: Message,
    /// `End` or `RunTools`; a granted authorization resolves to `RunTools`.
    pub next: TurnDecision,
    /// Key of the memory stored this turn, if any.
    pub stored_memory: Option<String>,
}

/// Processes one conversational turn against injected collaborators.
///
/// **Interaction**: Driven by `AgentRunner`, which appends the outcome's message and
/// runs tools while the decision is `RunTools`.
pub struct TurnProcessor {
    llm: Arc<dyn LlmClient>,
    store: Arc<dyn Store>,
    registry: Arc<dyn CapabilityRegistry>,
    sink: Arc<dyn OutputSink>,
    recall: RecallPolicy,
    preamble: String,
    auth_timeout: Duration,
    cancel: CancellationToken,
}

impl TurnProcessor {
    pub fn new(
        llm: Arc<dyn LlmClient>,
        store: Arc<dyn Store>,
        registry: Arc<dyn CapabilityRegistry>,
        sink: Arc<dyn OutputSink>,
    ) -> Self {
        Self {
            llm,
            store,
            registry,
            sink,
            recall: RecallPolicy::default(),
            preamble: DEFAULT_PREAMBLE.to_string(),
            auth_timeout: DEFAULT_AUTH_TIMEOUT,
            cancel: CancellationToken::new(),
        }
    }

    pub fn with_recall_policy(mut self, recall: RecallPolicy) -> Self {
        self.recall = recall;
        self
    }

    /// Replaces "You are a helpful AI assistant." at the start of the system prompt.
    pub fn with_preamble(mut self, preamble: impl Into<String>) -> Self {
        self.preamble = preamble.into();
        self
    }

    pub fn with_auth_timeout(mut self, timeout: Duration) -> Self {
        self.auth_timeout = timeout;
        self
    }

    /// Token that aborts a pending authorization wait with `TurnError::Cancelled`.
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn registry(&self) -> &dyn CapabilityRegistry {
        self.registry.as_ref()
    }

    fn namespace(user_id: &str) -> Result<Namespace, TurnError> {
        if user_id.is_empty() {
            return Err(TurnError::InvalidUserId);
        }
        Ok(memory_namespace(user_id))
    }

    /// Returns the history with a system message carrying recalled memories in front.
    ///
    /// The store is searched with the latest user message; without one, nothing is
    /// recalled. A history that already starts with a system message comes back unchanged.
    pub async fn assemble_prompt(
        &self,
        history: &[Message],
        user_id: &str,
    ) -> Result<Vec<Message>, TurnError> {
        let namespace = Self::namespace(user_id)?;
        let memories = match last_user_message(history) {
            Some(last) => {
                let hits = self
                    .store
                    .search(&namespace, Some(last.content()), Some(self.recall.limit))
                    .await?;
                self.recall.apply(hits)
            }
            None => Vec::new(),
        };
        debug!(user_id, recalled = memories.len(), "Memories recalled");
        let system = build_system_prompt(&self.preamble, &memories);
        Ok(with_system_message(history, system))
    }

    /// Stores the latest user message as a memory when it contains "remember".
    pub async fn maybe_store_memory(
        &self,
        history: &[Message],
        user_id: &str,
    ) -> Result<Option<String>, TurnError> {
        let namespace = Self::namespace(user_id)?;
        let Some(last) = last_user_message(history) else {
            return Ok(None);
        };
        if !wants_to_remember(last.content()) {
            return Ok(None);
        }
        let key = uuid::Uuid::new_v4().to_string();
        let value = MemoryRecord::from_user_message(last.content()).to_value()?;
        self.store.put(&namespace, &key, &value).await?;
        info!(user_id, key = %key, "Memory stored");
        Ok(Some(key))
    }

    /// Streams the model over `prompt`, writing text to the sink as it arrives.
    ///
    /// Returns the assistant message (full text plus valid tool calls) and the text
    /// written. A stream error propagates after the text already emitted.
    pub async fn stream_turn(&self, prompt: &[Message]) -> Result<(Message, String), TurnError> {
        let mut stream = self.llm.stream(prompt).await?;
        let mut text = String::new();
        let mut calls = ToolCallAccumulator::new();
        while let Some(item) = stream.next().await {
            let chunk = match item {
                Ok(chunk) => chunk,
                Err(e) => {
                    warn!(error = %e, emitted = text.len(), "Model stream failed");
                    return Err(e.into());
                }
            };
            if let Some(piece) = chunk.content.filter(|c| !c.is_empty()) {
                self.sink.write(&piece);
                text.push_str(&piece);
            }
            for delta in chunk.tool_calls {
                calls.push(delta);
            }
        }
        let tool_calls = calls.finish();
        debug!(chars = text.len(), tool_calls = tool_calls.len(), "Model stream complete");
        Ok((
            Message::assistant_with_tool_calls(text.clone(), tool_calls),
            text,
        ))
    }

    pub fn decide_next_step(&self, message: &Message) -> TurnDecision {
        decide_next_step(message, self.registry.as_ref())
    }

    /// Authorizes every call in `message` whose tool requires it, in order.
    ///
    /// Stops at the first tool that ends up unauthorized.
    pub async fn authorize_pending(&self, message: &Message, user_id: &str) -> Result<(), TurnError> {
        for tc in message.tool_calls() {
            if !self.registry.requires_auth(&tc.name) {
                continue;
            }
            let handle = self.registry.authorize(&tc.name, user_id).await?;
            match handle.status {
                AuthStatus::Completed => continue,
                AuthStatus::Failed => {
                    return Err(TurnError::AuthorizationFailed {
                        tool: tc.name.clone(),
                    })
                }
                AuthStatus::Pending => {}
            }

            self.sink
                .write(&format!("\n🔐 Authorization required for {}\n\n", tc.name));
            self.sink.write(&format!(
                "Visit the following URL to authorize:\n{}\n\n",
                handle.url.as_deref().unwrap_or_default()
            ));
            self.sink.write("Waiting for authorization...\n\n");

            self.wait_for_auth(&handle.id, &tc.name).await?;
            if !self.registry.is_authorized(&handle.id).await? {
                warn!(tool = %tc.name, user_id, "Authorization not granted");
                return Err(TurnError::AuthorizationFailed {
                    tool: tc.name.clone(),
                });
            }
            info!(tool = %tc.name, user_id, "Authorization granted");
        }
        Ok(())
    }

    /// Waits for the provider, bounded by the timeout; a timeout falls through to the
    /// final `is_authorized` check.
    async fn wait_for_auth(&self, auth_id: &str, tool: &str) -> Result<(), TurnError> {
        tokio::select! {
            _ = self.cancel.cancelled() => Err(TurnError::Cancelled),
            res = tokio::time::timeout(self.auth_timeout, self.registry.wait_for_auth(auth_id)) => {
                match res {
                    Ok(done) => done.map_err(TurnError::from),
                    Err(_) => {
                        warn!(tool, timeout_secs = self.auth_timeout.as_secs(), "Authorization wait timed out");
                        Ok(())
                    }
                }
            }
        }
    }

    /// Runs one full turn over `history` for `user_id`.
    ///
    /// Memory is only written when `history` ends with the user message, so the
    /// follow-up steps an agent loop runs after tool results never store it again.
    pub async fn process_turn(
        &self,
        history: &[Message],
        user_id: &str,
    ) -> Result<TurnOutcome, TurnError> {
        log_turn_start(user_id, history.len());
        let result = self.process_turn_inner(history, user_id).await;
        match &result {
            Ok(outcome) => log_turn_complete(outcome.next, outcome.message.tool_calls().len()),
            Err(e) => log_turn_error(e),
        }
        result
    }

    async fn process_turn_inner(
        &self,
        history: &[Message],
        user_id: &str,
    ) -> Result<TurnOutcome, TurnError> {
        let prompt = self.assemble_prompt(history, user_id).await?;
        // Follow-up steps after tool results see the same user message; store it once.
        let stored_memory = match history.last() {
            Some(Message::User { .. }) => self.maybe_store_memory(history, user_id).await?,
            _ => None,
        };
        let (message, _) = self.stream_turn(&prompt).await?;
        let next = match self.decide_next_step(&message) {
            TurnDecision::RequireAuthorization => {
                self.authorize_pending(&message, user_id).await?;
                TurnDecision::RunTools
            }
            other => other,
        };
        Ok(TurnOutcome {
            message,
            next,
            stored_memory,
        })
    }
}
