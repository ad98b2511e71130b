//! Generator node: renders the persona, summary, context and history into
//! one streaming completion and appends the turn's assistant reply.
//!
//! This is the only node whose output reaches the caller as fragments.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tracing::debug;

use crate::error::WorkflowError;
use crate::llm::{LlmClient, MessageChunk};
use crate::message::Message;
use crate::prompts::CHARACTER_CARD;
use crate::state::{ConversationState, StateDelta, ValidationStatus};

use super::{Node, RunContext, Step};

/// Generator node.
///
/// Appends exactly one assistant message and clears the turn-scoped fields
/// (`user_query`, `context`, `retry_count`, `validation_status`) so the next
/// turn starts clean. Routes to the summarizer when the history has grown
/// past the trigger, otherwise ends the run.
#[derive(Clone)]
pub struct GeneratorNode {
    llm: Arc<dyn LlmClient>,
    summary_trigger_count: usize,
}

impl GeneratorNode {
    pub fn new(llm: Arc<dyn LlmClient>, summary_trigger_count: usize) -> Self {
        Self {
            llm,
            summary_trigger_count,
        }
    }

    /// One system block: persona, then the running summary and the retrieved
    /// context when present.
    fn render_prompt(state: &ConversationState) -> String {
        let mut prompt = String::from(CHARACTER_CARD);
        if !state.summary.is_empty() {
            prompt.push_str("\n\nSummary of the conversation so far:\n");
            prompt.push_str(&state.summary);
        }
        if !state.context.is_empty() {
            prompt.push_str("\n\nRetrieved context:\n");
            prompt.push_str(&state.context);
        }
        prompt
    }
}

#[async_trait]
impl Node for GeneratorNode {
    fn id(&self) -> &str {
        "generator"
    }

    async fn run(
        &self,
        state: &ConversationState,
        ctx: &RunContext,
    ) -> Result<(StateDelta, Step), WorkflowError> {
        let prompt = Self::render_prompt(state);

        let response = if let Some(out) = &ctx.fragment_tx {
            // Internal chunk channel; a forwarding task turns chunks into
            // response fragments. Send failures mean the caller disconnected;
            // the completion still runs so the final state gets persisted.
            let (chunk_tx, mut chunk_rx) = mpsc::channel::<MessageChunk>(128);
            let out = out.clone();
            let forward = tokio::spawn(async move {
                while let Some(chunk) = chunk_rx.recv().await {
                    if chunk.content.is_empty() {
                        continue;
                    }
                    let _ = out.send(Ok(chunk.content)).await;
                }
            });

            let result = self
                .llm
                .invoke_stream(&prompt, &state.messages, &[], Some(chunk_tx))
                .await;

            let _ = forward.await;
            result?
        } else {
            self.llm.invoke(&prompt, &state.messages, &[]).await?
        };

        debug!(content_len = response.content.len(), "reply generated");

        let delta = StateDelta {
            append: vec![Message::assistant(response.content)],
            user_query: Some(String::new()),
            context: Some(String::new()),
            retry_count: Some(0),
            validation_status: Some(ValidationStatus::Unset),
            ..StateDelta::default()
        };

        // +1 for the reply appended by this delta.
        let next = if state.messages.len() + 1 > self.summary_trigger_count {
            Step::Summarize
        } else {
            Step::End
        };
        Ok((delta, next))
    }
}
