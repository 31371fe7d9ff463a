//! # Memory: long-term store and conversation checkpoints
//!
//! 1. **Store**: cross-session key-value records for long-term memory, isolated by
//!    [`Namespace`] (`["memories", <escaped user id>]`). The turn processor searches it
//!    to build the system prompt and writes a [`MemoryRecord`] when the user asks it to
//!    remember something. [`RecallPolicy`] filters what is recalled.
//! 2. **Checkpointer**: per-thread message history so a conversation continues across
//!    runs. Keyed by [`RunnableConfig::thread_id`].
//!
//! | Type              | Persistence | Feature  |
//! |-------------------|-------------|----------|
//! | [`InMemoryStore`] | In-memory   | —        |
//! | `SqliteStore`     | SQLite file | `sqlite` |
//! | [`MemorySaver`]   | In-memory   | —        |
//! | `SqliteSaver`     | SQLite file | `sqlite` |

mod checkpoint;
mod checkpointer;
mod config;
mod in_memory_store;
mod memory_saver;
mod namespace;
mod recall;
mod record;
mod store;

#[cfg(feature = "sqlite")]
mod sqlite_saver;
#[cfg(feature = "sqlite")]
mod sqlite_store;

pub use checkpoint::{Checkpoint, CheckpointListItem, CheckpointMetadata, CheckpointSource};
pub use checkpointer::{CheckpointError, Checkpointer};
pub use config::RunnableConfig;
pub use in_memory_store::InMemoryStore;
pub use memory_saver::MemorySaver;
pub use namespace::{escape_user_id, memory_namespace, MEMORIES_SEGMENT};
pub use recall::{DedupPolicy, RecallPolicy};
pub use record::{MemoryRecord, TAG_USER_MESSAGE};
pub use store::{Namespace, Store, StoreError, StoreSearchHit};

#[cfg(feature = "sqlite")]
pub use sqlite_saver::SqliteSaver;
#[cfg(feature = "sqlite")]
pub use sqlite_store::SqliteStore;
