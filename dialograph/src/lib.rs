//! # dialograph
//!
//! A conversational-agent workflow engine. One user message flows through a
//! small directed graph (decide whether to fetch context, fetch it, validate
//! it, generate a reply, optionally compress history) and the reply streams
//! back token-by-token while the conversation state is checkpointed per
//! `thread_id` so any turn can resume it.
//!
//! ## Design
//!
//! - **Snapshot in, delta out**: every node reads an immutable
//!   [`ConversationState`] and returns a [`StateDelta`] plus the next
//!   [`Step`]; the driver merges the delta and pattern-matches the step. No
//!   string-keyed dispatch, no shared mutable state between nodes.
//! - **Bounded retrieval loop**: router → retriever → validator is the only
//!   cycle, and the router's tool-iteration budget alone terminates it. Budget
//!   exhaustion injects a fallback reply instead of failing the run.
//! - **Streaming side channel**: only the generator's chunks reach the
//!   caller; a dropped consumer stops forwarding but the run still completes
//!   and persists.
//!
//! ## Main modules
//!
//! - [`graph`]: the nodes, the `Step` FSM and [`WorkflowEngine`].
//! - [`llm`] / [`tool_source`]: gateway traits with mock implementations
//!   (plus `ChatOpenAI` behind the `openai` feature).
//! - [`memory`]: checkpoint types, in-memory and SQLite checkpointers.
//! - [`input`]: heterogeneous run input, resolved once at the entry point.
//! - [`title`]: cadence-gated conversation titles (side channel).
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use tokio_stream::StreamExt;
//! use dialograph::{
//!     MemorySaver, MockLlm, MockToolSource, WorkflowConfig, WorkflowEngine,
//! };
//!
//! # #[tokio::main]
//! # async fn main() {
//! let engine = WorkflowEngine::new(
//!     Arc::new(MockLlm::default().push_response("hi!").push_response("hello!")),
//!     Arc::new(MockToolSource::default()),
//!     Arc::new(MemorySaver::new()),
//!     WorkflowConfig::default(),
//! );
//!
//! let mut stream = engine.run("thread-1", "hello".into());
//! while let Some(fragment) = stream.next().await {
//!     print!("{}", fragment.unwrap());
//! }
//! # }
//! ```

pub mod config;
pub mod error;
pub mod graph;
pub mod input;
pub mod llm;
pub mod memory;
pub mod message;
pub mod prompts;
pub mod state;
pub mod title;
pub mod tool_source;

pub use config::WorkflowConfig;
pub use error::WorkflowError;
pub use graph::{
    GeneratorNode, Node, ResponseStream, RetrieverNode, RouterNode, RunContext, Step,
    SummarizerNode, ValidatorNode, WorkflowEngine,
};
pub use input::{InputEntry, InputPayload};
pub use llm::{LlmClient, LlmResponse, MessageChunk, MockLlm};
#[cfg(feature = "openai")]
pub use llm::ChatOpenAI;
pub use memory::{
    Checkpoint, CheckpointError, CheckpointMetadata, CheckpointSource, Checkpointer,
    JsonSerializer, MemorySaver,
};
#[cfg(feature = "sqlite")]
pub use memory::SqliteSaver;
pub use message::{Message, Role, ToolCall};
pub use state::{ConversationState, StateDelta, ValidationStatus};
pub use title::TitleGenerator;
pub use tool_source::{
    retrieval_tool_specs, MockToolSource, ToolCallContent, ToolSource, ToolSourceError, ToolSpec,
};
