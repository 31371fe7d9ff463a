//! agentmem binary: parse the message and options, run one turn loop, stream the answer.

use agentmem::{RunError, ToolChoiceMode};
use agentmem_cli::{init_tracing, run_with_options, Error, RunOptions};
use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "agentmem")]
#[command(about = "Conversational agent with long-term memory and tool authorization")]
struct Args {
    /// User message (or give it as positional arguments)
    #[arg(short, long, value_name = "TEXT")]
    message: Option<String>,

    /// User identity for memories and authorization (env: USER_ID / EMAIL)
    #[arg(short, long)]
    user_id: Option<String>,

    /// Conversation thread to continue (env: THREAD_ID)
    #[arg(short, long)]
    thread_id: Option<String>,

    /// SQLite database path (env: DB_PATH, default memory.db)
    #[arg(long)]
    db_path: Option<String>,

    #[arg(long)]
    temperature: Option<f32>,

    /// auto, none or required
    #[arg(long)]
    tool_choice: Option<ToolChoiceMode>,

    /// Comma-separated tools that need authorization (env: AUTH_REQUIRED_TOOLS)
    #[arg(long, value_delimiter = ',')]
    auth_tools: Option<Vec<String>>,

    /// Seconds to wait for an authorization (env: AUTH_TIMEOUT_SECS)
    #[arg(long)]
    auth_timeout: Option<u64>,

    /// Maximum model turns (env: RECURSION_LIMIT, default 100)
    #[arg(long)]
    recursion_limit: Option<usize>,

    /// Debug logs on stderr
    #[arg(short, long)]
    verbose: bool,

    /// User message when -m/--message is not used
    #[arg(trailing_var_arg = true)]
    rest: Vec<String>,
}

impl Args {
    fn message(&self) -> String {
        if let Some(ref m) = self.message {
            return m.clone();
        }
        if self.rest.is_empty() {
            return "What do you remember about me?".to_string();
        }
        self.rest.join(" ").trim().to_string()
    }

    fn options(&self) -> RunOptions {
        RunOptions {
            temperature: self.temperature,
            tool_choice: self.tool_choice,
            user_id: self.user_id.clone(),
            thread_id: self.thread_id.clone(),
            db_path: self.db_path.clone(),
            auth_required_tools: self.auth_tools.clone(),
            auth_timeout_secs: self.auth_timeout,
            recursion_limit: self.recursion_limit,
            verbose: self.verbose,
        }
    }
}

fn describe(e: &Error) -> String {
    match e.downcast_ref::<RunError>() {
        Some(run_error) => run_error.user_message(),
        None => e.to_string(),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    init_tracing(args.verbose);
    let input = args.message();

    match run_with_options(&input, &args.options()).await {
        Ok(_) => println!(),
        Err(e) => {
            tracing::error!(error = %e, "Run failed");
            eprintln!();
            eprintln!("error: {}", describe(&e));
            std::process::exit(1);
        }
    }
    Ok(())
}
