//! # agentmem
//!
//! A conversational turn processor with long-term memory. Each turn recalls the
//! user's memories into the system prompt, stores the message when the user asks
//! to remember something, streams the model's answer to an output sink, and
//! decides whether to end, run the requested tools, or first obtain the user's
//! authorization for them.
//!
//! ## Design Principles
//!
//! - **Injected collaborators**: the model ([`LlmClient`]), memory ([`Store`]),
//!   authorization ([`CapabilityRegistry`]) and output ([`OutputSink`]) are traits
//!   passed to [`TurnProcessor::new`]; every one has an in-crate implementation usable in tests.
//! - **Explicit loop**: [`TurnDecision`] replaces a graph engine. [`AgentRunner`] runs
//!   turns and tools until the decision is `End`.
//!
//! ## Main Modules
//!
//! - [`turn`]: `TurnProcessor`, `TurnDecision`, `TurnError`, prompt assembly.
//! - [`agent`]: `AgentRunner`, the tool loop with optional checkpointing.
//! - [`memory`]: `Store` (in-memory, SQLite), namespaces, recall policy, `Checkpointer`.
//! - [`llm`]: `LlmClient` trait, `MockLlm`, optional `ChatOpenAI`.
//! - [`capability`]: `CapabilityRegistry` and `StaticCapabilityRegistry`.
//! - [`sink`]: `OutputSink`, `StdoutSink`, `BufferSink`, `ChannelSink`, `ChatFormatter`.
//! - [`tool_source`]: tool specs and execution; `MockToolSource`, `WeatherToolSource`.
//! - `services`: Open-Meteo geocoding and forecast clients.
//!
//! ## Features
//!
//! - `openai`: OpenAI-compatible streaming chat via `async-openai`.
//! - `sqlite`: persistent store and checkpointer.
//! - `services`: geocoding/forecast clients and the weather tool via `reqwest`.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use agentmem::{
//!     BufferSink, InMemoryStore, Message, MockLlm, StaticCapabilityRegistry, TurnProcessor,
//! };
//!
//! # #[tokio::main]
//! # async fn main() {
//! let processor = TurnProcessor::new(
//!     Arc::new(MockLlm::with_no_tool_calls("Noted.")),
//!     Arc::new(InMemoryStore::new()),
//!     Arc::new(StaticCapabilityRegistry::new(["list_emails"])),
//!     Arc::new(BufferSink::new()),
//! );
//! let outcome = processor
//!     .process_turn(&[Message::user("Remember to buy milk")], "jane@example.com")
//!     .await
//!     .unwrap();
//! assert!(outcome.stored_memory.is_some());
//! # }
//! ```

pub mod agent;
pub mod capability;
pub mod error;
pub mod llm;
pub mod logging;
pub mod memory;
pub mod message;
#[cfg(feature = "services")]
pub mod services;
pub mod sink;
pub mod tool_call;
pub mod tool_source;
pub mod turn;

pub use agent::{AgentRunner, RunError, DEFAULT_RECURSION_LIMIT};
pub use capability::{AuthError, AuthHandle, AuthStatus, CapabilityRegistry, StaticCapabilityRegistry};
pub use error::AgentError;
pub use llm::{ChunkStream, LlmChunk, LlmClient, LlmResponse, MockLlm, MockTurn, ToolChoiceMode};
#[cfg(feature = "openai")]
pub use llm::ChatOpenAI;
pub use memory::{
    escape_user_id, memory_namespace, Checkpoint, CheckpointError, CheckpointListItem,
    CheckpointMetadata, CheckpointSource, Checkpointer, DedupPolicy, InMemoryStore, MemoryRecord,
    MemorySaver, Namespace, RecallPolicy, RunnableConfig, Store, StoreError, StoreSearchHit,
};
#[cfg(feature = "sqlite")]
pub use memory::{SqliteSaver, SqliteStore};
pub use message::{last_user_message, Message, Role};
#[cfg(feature = "services")]
pub use services::{GeocodingClient, Location, OpenMeteoClient, ServiceError};
pub use sink::{BufferSink, ChannelSink, ChatFormatter, OutputSink, StdoutSink};
pub use tool_call::{ToolCall, ToolCallAccumulator, ToolCallDelta};
pub use tool_source::{MockToolSource, ToolCallContent, ToolSource, ToolSourceError, ToolSpec};
#[cfg(feature = "services")]
pub use tool_source::{WeatherToolSource, TOOL_GET_WEATHER};
pub use turn::{
    decide_next_step, TurnDecision, TurnError, TurnOutcome, TurnProcessor, DEFAULT_AUTH_TIMEOUT,
    DEFAULT_PREAMBLE,
};
