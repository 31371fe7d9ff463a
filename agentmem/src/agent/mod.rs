//! Agent loop: repeated turns with tool execution until the model ends the turn.

mod runner;

pub use runner::{AgentRunner, RunError, DEFAULT_RECURSION_LIMIT};
