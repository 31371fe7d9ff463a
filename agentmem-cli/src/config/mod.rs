//! Configuration types for running the agent.
//!
//! Re-exports [`RunConfig`], [`RunOptions`] and config [`Error`].

mod run_config;
mod run_options;

pub use run_config::{Error, RunConfig};
#[cfg(test)]
pub(crate) use run_config::parse_tool_list;
pub use run_options::RunOptions;
