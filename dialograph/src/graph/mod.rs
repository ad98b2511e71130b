//! The workflow graph: nodes, the tagged next-step type, and the driver.
//!
//! The graph is a fixed finite-state machine rather than a runtime-wired node
//! table: each node returns a [`Step`] variant and the driver in
//! [`engine`] pattern-matches it to pick the next node. The only cycle is
//! router → retriever → validator → router, terminated by the router's
//! iteration cap.

mod engine;
mod generator;
mod retriever;
mod router;
mod summarizer;
mod validator;

pub use engine::{ResponseStream, WorkflowEngine};
pub use generator::GeneratorNode;
pub use retriever::RetrieverNode;
pub use router::RouterNode;
pub use summarizer::SummarizerNode;
pub use validator::ValidatorNode;

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::error::WorkflowError;
use crate::state::{ConversationState, StateDelta};

/// Next step chosen by a node.
///
/// Closed set of variants; there is no string-keyed dispatch and no way to
/// route to a node the driver does not know about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Router,
    Retrieve,
    Validate,
    Generate,
    Summarize,
    End,
}

/// Per-run context handed to every node.
#[derive(Clone)]
pub struct RunContext {
    /// Conversation identifier for this run.
    pub thread_id: String,
    /// Output channel for response fragments. Only the generator writes to
    /// it; send failures mean the caller went away and are ignored.
    pub fragment_tx: Option<mpsc::Sender<Result<String, WorkflowError>>>,
}

impl RunContext {
    /// Context without a fragment channel (non-streaming execution).
    pub fn detached(thread_id: impl Into<String>) -> Self {
        Self {
            thread_id: thread_id.into(),
            fragment_tx: None,
        }
    }
}

/// One graph node: reads a state snapshot, returns a field-level patch and
/// the next step.
///
/// **Interaction**: Implemented by the five node types; driven by
/// [`WorkflowEngine`]. Nodes never mutate state directly and never touch the
/// checkpointer.
#[async_trait]
pub trait Node: Send + Sync {
    fn id(&self) -> &str;

    async fn run(
        &self,
        state: &ConversationState,
        ctx: &RunContext,
    ) -> Result<(StateDelta, Step), WorkflowError>;
}
