//! agentmem-cli library: configuration and run logic behind the `agentmem` binary.
//!
//! Reads OpenAI, identity, persistence and authorization settings from `.env`/environment,
//! wires the collaborators, and runs one user message through the agent loop with the
//! answer streamed to stdout.
//!
//! ## Usage
//!
//! ```rust,no_run,ignore
//! let messages = agentmem_cli::run("Remember that I like tea").await?;
//! ```

mod config;
mod logging;
mod run;

pub use agentmem::Message;
pub use config::{Error, RunConfig, RunOptions};
pub use logging::init_tracing;
pub use run::{run, run_with_config, run_with_options};

#[cfg(test)]
mod tests;
