//! # Turn processing
//!
//! One turn: recall memories into the system prompt, store a memory when asked,
//! stream the model, then decide whether to end, run tools or request
//! authorization first.
//!
//! ```text
//! history ──► assemble_prompt ──► maybe_store_memory ──► stream_turn ──► decide_next_step
//!                                                                            │
//!                           End / RunTools ◄── authorize_pending ◄── RequireAuthorization
//! ```

mod decision;
mod error;
mod processor;
mod prompt;

pub use decision::{decide_next_step, TurnDecision};
pub use error::TurnError;
pub use processor::{TurnOutcome, TurnProcessor, DEFAULT_AUTH_TIMEOUT};
pub use prompt::{build_system_prompt, with_system_message, wants_to_remember, DEFAULT_PREAMBLE};
