//! Interactive chat REPL over the workflow engine.
//!
//! Reads lines from stdin, streams the reply fragments to stdout as they
//! arrive, and prints the conversation title whenever the cadence recomputes
//! it. Configure via `.env` / environment: `OPENAI_API_KEY`,
//! `MAX_TOOL_ITERATIONS`, `SUMMARY_TRIGGER_COUNT`, `SUMMARY_RETAIN_COUNT`.

use std::io::{self, BufRead, Write};
use std::sync::Arc;
use std::time::SystemTime;

use clap::Parser;
use tokio_stream::StreamExt;
use tracing_subscriber::EnvFilter;

use dialograph::title::message_lines;
use dialograph::{
    Checkpointer, ConversationState, LlmClient, MockLlm, MockToolSource, TitleGenerator,
    WorkflowConfig, WorkflowEngine,
};

type Error = Box<dyn std::error::Error + Send + Sync>;

#[derive(Parser, Debug)]
#[command(name = "dialograph", about = "Chat with the dialograph workflow engine")]
struct Args {
    /// Conversation id to resume; a fresh id is minted when omitted.
    #[arg(long)]
    thread_id: Option<String>,

    /// SQLite database path for checkpoints.
    #[arg(long, default_value = "dialograph.db")]
    db_path: String,

    /// Model name for the OpenAI-compatible gateway.
    #[arg(long, default_value = "gpt-4o-mini")]
    model: String,

    /// Use scripted mock gateways instead of a live model.
    #[arg(long)]
    offline: bool,
}

/// Load .env from the current directory; if not found, try the parent
/// (workspace root when run from the crate dir).
fn load_dotenv() {
    if dotenv::dotenv().is_ok() {
        return;
    }
    if let Ok(cwd) = std::env::current_dir() {
        if let Some(parent) = cwd.parent() {
            let env_path = parent.join(".env");
            if env_path.is_file() {
                let _ = dotenv::from_path(env_path);
            }
        }
    }
}

#[cfg(feature = "openai")]
fn live_llm(model: &str) -> Arc<dyn LlmClient> {
    Arc::new(dialograph::ChatOpenAI::new(model).with_temperature(0.7))
}

#[cfg(not(feature = "openai"))]
fn live_llm(_model: &str) -> Arc<dyn LlmClient> {
    eprintln!("built without the `openai` feature; run with --offline");
    std::process::exit(2)
}

fn build_checkpointer(db_path: &str) -> Result<Arc<dyn Checkpointer<ConversationState>>, Error> {
    #[cfg(feature = "sqlite")]
    {
        return Ok(Arc::new(dialograph::SqliteSaver::open(db_path)?));
    }
    #[cfg(not(feature = "sqlite"))]
    {
        let _ = db_path;
        Ok(Arc::new(dialograph::MemorySaver::new()))
    }
}

fn mint_thread_id() -> String {
    let millis = SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0);
    format!("thread-{}", millis)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    load_dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let config = WorkflowConfig::from_env();

    let llm: Arc<dyn LlmClient> = if args.offline {
        Arc::new(MockLlm::new(
            "(offline) no live model configured; this is a canned reply.",
        ))
    } else {
        live_llm(&args.model)
    };

    let checkpointer = build_checkpointer(&args.db_path)?;
    let engine = WorkflowEngine::new(
        Arc::clone(&llm),
        Arc::new(MockToolSource::new("")),
        checkpointer,
        config,
    );
    let titles = TitleGenerator::new(llm);

    let thread_id = args.thread_id.unwrap_or_else(mint_thread_id);
    println!("conversation: {}  (ctrl-d or \"exit\" to quit)", thread_id);

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    loop {
        print!("> ");
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line == "exit" {
            break;
        }

        let mut stream = engine.run(&thread_id, line.into());
        while let Some(event) = stream.next().await {
            match event {
                Ok(fragment) => {
                    print!("{}", fragment);
                    stdout.flush()?;
                }
                Err(err) => {
                    eprintln!("\nerror: {}", err);
                    break;
                }
            }
        }
        println!();

        if let Some(state) = engine.get_state(&thread_id).await? {
            let lines = message_lines(&state.messages);
            if let Some(title) = titles.maybe_title(&lines).await? {
                println!("── {} ──", title);
            }
        }
    }

    Ok(())
}
