//! The workflow engine: loads state, drives the node FSM to completion and
//! streams the generator's fragments back to the caller.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tracing::{debug, error};

use crate::config::WorkflowConfig;
use crate::error::WorkflowError;
use crate::input::InputPayload;
use crate::llm::LlmClient;
use crate::memory::{Checkpoint, CheckpointSource, Checkpointer};
use crate::state::{ConversationState, StateDelta};
use crate::tool_source::{retrieval_tool_specs, ToolSource};

use super::{
    GeneratorNode, Node, RetrieverNode, RouterNode, RunContext, Step, SummarizerNode,
    ValidatorNode,
};

/// Lazy, single-pass sequence of response fragments. Ends after the final
/// fragment, or after exactly one `Err` item when the run aborts. Consuming
/// it twice is undefined (it is a one-shot channel receiver).
pub type ResponseStream = ReceiverStream<Result<String, WorkflowError>>;

/// The workflow engine.
///
/// One engine serves any number of conversations; each [`run`](Self::run) is
/// an independent strict pipeline over one `thread_id`. The checkpointer is
/// the only shared mutable resource, and it is atomic per key.
///
/// **Interaction**: Constructed once from the gateways and config; consumed
/// by the transport layer through `run` / `get_state`.
#[derive(Clone)]
pub struct WorkflowEngine {
    router: RouterNode,
    retriever: RetrieverNode,
    validator: ValidatorNode,
    generator: GeneratorNode,
    summarizer: SummarizerNode,
    checkpointer: Arc<dyn Checkpointer<ConversationState>>,
}

impl WorkflowEngine {
    /// Wires the node set from the gateways and config. The router binds the
    /// retrieval capability set; the generator runs unbound.
    pub fn new(
        llm: Arc<dyn LlmClient>,
        tools: Arc<dyn ToolSource>,
        checkpointer: Arc<dyn Checkpointer<ConversationState>>,
        config: WorkflowConfig,
    ) -> Self {
        Self {
            router: RouterNode::new(
                Arc::clone(&llm),
                retrieval_tool_specs(),
                config.max_tool_iterations,
            ),
            retriever: RetrieverNode::new(tools),
            validator: ValidatorNode::new(Arc::clone(&llm)),
            generator: GeneratorNode::new(Arc::clone(&llm), config.summary_trigger_count),
            summarizer: SummarizerNode::new(llm, config.summary_retain_count),
            checkpointer,
        }
    }

    /// Executes one full graph pass for the turn and returns the fragment
    /// stream immediately.
    ///
    /// The run continues in the background even if the returned stream is
    /// dropped, so the final state (including the full assistant message) is
    /// persisted either way.
    pub fn run(&self, thread_id: &str, payload: InputPayload) -> ResponseStream {
        let (tx, rx) = mpsc::channel(128);
        let engine = self.clone();
        let thread_id = thread_id.to_string();

        tokio::spawn(async move {
            if let Err(err) = engine.run_inner(&thread_id, payload, &tx).await {
                error!(thread_id = %thread_id, error = %err, "run aborted");
                let _ = tx.send(Err(err)).await;
            }
        });

        ReceiverStream::new(rx)
    }

    /// Point-in-time snapshot of the conversation, or `None` for an unknown
    /// `thread_id`. Read-only: calling it twice with no intervening run
    /// returns identical snapshots.
    pub async fn get_state(
        &self,
        thread_id: &str,
    ) -> Result<Option<ConversationState>, WorkflowError> {
        let checkpoint = self.checkpointer.load(thread_id).await?;
        Ok(checkpoint.map(|cp| cp.state))
    }

    async fn run_inner(
        &self,
        thread_id: &str,
        payload: InputPayload,
        tx: &mpsc::Sender<Result<String, WorkflowError>>,
    ) -> Result<(), WorkflowError> {
        let new_messages = payload.into_messages();
        if new_messages.is_empty() {
            // Run not started: no load, no save, no state mutation.
            return Err(WorkflowError::MalformedInput);
        }

        let mut state = match self.checkpointer.load(thread_id).await? {
            Some(checkpoint) => checkpoint.state,
            None => ConversationState::default(),
        };

        state = state.apply(StateDelta::append(new_messages));
        self.save(thread_id, &state, CheckpointSource::Input, 0)
            .await?;

        let ctx = RunContext {
            thread_id: thread_id.to_string(),
            fragment_tx: Some(tx.clone()),
        };

        let mut step = Step::Router;
        let mut ordinal: u64 = 1;
        while step != Step::End {
            let node: &dyn Node = match step {
                Step::Router => &self.router,
                Step::Retrieve => &self.retriever,
                Step::Validate => &self.validator,
                Step::Generate => &self.generator,
                Step::Summarize => &self.summarizer,
                Step::End => unreachable!("loop guard"),
            };

            debug!(thread_id = %thread_id, node = node.id(), "entering node");
            let (delta, next) = node.run(&state, &ctx).await?;
            state = state.apply(delta);
            self.save(thread_id, &state, CheckpointSource::Step, ordinal)
                .await?;

            debug!(thread_id = %thread_id, node = node.id(), next = ?next, "node complete");
            step = next;
            ordinal += 1;
        }

        Ok(())
    }

    async fn save(
        &self,
        thread_id: &str,
        state: &ConversationState,
        source: CheckpointSource,
        step: u64,
    ) -> Result<(), WorkflowError> {
        let checkpoint = Checkpoint::from_state(state.clone(), source, step);
        self.checkpointer.save(thread_id, &checkpoint).await?;
        Ok(())
    }
}
