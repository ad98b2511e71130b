//! Shared test fixtures: scripted gateways and a recording checkpointer.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use dialograph::{
    Checkpoint, CheckpointError, Checkpointer, ConversationState, MemorySaver, MockLlm,
    MockToolSource, Role, WorkflowConfig, WorkflowEngine,
};

/// Checkpointer that records every saved state, so tests can assert
/// per-transition invariants, delegating storage to a `MemorySaver`.
pub struct RecordingSaver {
    inner: MemorySaver<ConversationState>,
    saved: Mutex<Vec<ConversationState>>,
}

impl RecordingSaver {
    pub fn new() -> Self {
        Self {
            inner: MemorySaver::new(),
            saved: Mutex::new(Vec::new()),
        }
    }

    /// All states saved so far, in save order.
    pub fn saved_states(&self) -> Vec<ConversationState> {
        self.saved.lock().unwrap().clone()
    }
}

#[async_trait]
impl Checkpointer<ConversationState> for RecordingSaver {
    async fn load(
        &self,
        thread_id: &str,
    ) -> Result<Option<Checkpoint<ConversationState>>, CheckpointError> {
        self.inner.load(thread_id).await
    }

    async fn save(
        &self,
        thread_id: &str,
        checkpoint: &Checkpoint<ConversationState>,
    ) -> Result<(), CheckpointError> {
        self.saved.lock().unwrap().push(checkpoint.state.clone());
        self.inner.save(thread_id, checkpoint).await
    }
}

/// Engine wired from scripted gateways and a shared recording checkpointer.
pub fn engine_with(
    llm: MockLlm,
    tools: MockToolSource,
    config: WorkflowConfig,
) -> (WorkflowEngine, Arc<RecordingSaver>) {
    let saver = Arc::new(RecordingSaver::new());
    let engine = WorkflowEngine::new(
        Arc::new(llm),
        Arc::new(tools),
        Arc::clone(&saver) as Arc<dyn Checkpointer<ConversationState>>,
        config,
    );
    (engine, saver)
}

/// Number of tool-result messages in the state (= retrieval attempts).
pub fn tool_message_count(state: &ConversationState) -> usize {
    state.messages.iter().filter(|m| m.role == Role::Tool).count()
}

/// Assistant messages that are plain replies (no tool-call request).
pub fn reply_contents(state: &ConversationState) -> Vec<String> {
    state
        .messages
        .iter()
        .filter(|m| m.role == Role::Assistant && m.tool_calls.is_empty())
        .map(|m| m.content.clone())
        .collect()
}
