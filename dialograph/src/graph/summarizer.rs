//! Summarizer node: compacts older history into the running summary.
//!
//! Destructive one-way compaction: removed message content is only
//! recoverable through the summary text.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::error::WorkflowError;
use crate::llm::LlmClient;
use crate::prompts::{EXTEND_SUMMARY_PROMPT, SUMMARY_PROMPT};
use crate::state::{ConversationState, StateDelta};

use super::{Node, RunContext, Step};

/// Summarizer node.
///
/// Extends the prior summary (or creates one) from the messages about to be
/// removed, then retains only the most recent `summary_retain_count`
/// messages. An empty model output keeps the prior summary, so the summary
/// never loses information it already had.
#[derive(Clone)]
pub struct SummarizerNode {
    llm: Arc<dyn LlmClient>,
    summary_retain_count: usize,
}

impl SummarizerNode {
    pub fn new(llm: Arc<dyn LlmClient>, summary_retain_count: usize) -> Self {
        Self {
            llm,
            summary_retain_count,
        }
    }

    fn render_prompt(state: &ConversationState, removed_lines: &str) -> String {
        if state.summary.is_empty() {
            format!("{}\n\n{}", SUMMARY_PROMPT, removed_lines)
        } else {
            format!(
                "{}\n\nExisting summary:\n{}\n\nNew messages:\n{}",
                EXTEND_SUMMARY_PROMPT, state.summary, removed_lines
            )
        }
    }
}

#[async_trait]
impl Node for SummarizerNode {
    fn id(&self) -> &str {
        "summarizer"
    }

    async fn run(
        &self,
        state: &ConversationState,
        _ctx: &RunContext,
    ) -> Result<(StateDelta, Step), WorkflowError> {
        let mut delta = StateDelta {
            retain_last: Some(self.summary_retain_count),
            ..StateDelta::default()
        };

        if state.messages.len() <= self.summary_retain_count {
            return Ok((delta, Step::End));
        }

        let cut = state.messages.len() - self.summary_retain_count;
        let removed_lines = state.messages[..cut]
            .iter()
            .map(|m| format!("{}: {}", m.role.as_str(), m.content))
            .collect::<Vec<_>>()
            .join("\n");

        let prompt = Self::render_prompt(state, &removed_lines);
        let response = self.llm.invoke(&prompt, &[], &[]).await?;

        let new_summary = response.content.trim();
        if new_summary.is_empty() {
            debug!("summarizer returned empty output, keeping prior summary");
        } else {
            debug!(removed = cut, "history compacted");
            delta.summary = Some(new_summary.to_string());
        }

        Ok((delta, Step::End))
    }
}
