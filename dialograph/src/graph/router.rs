//! Router node: decides whether the turn needs retrieval before answering,
//! and enforces the tool-iteration budget that makes the retrieval loop
//! finite.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::error::WorkflowError;
use crate::llm::LlmClient;
use crate::message::Message;
use crate::prompts::{CHARACTER_CARD, ITERATION_LIMIT_MESSAGE};
use crate::state::{ConversationState, StateDelta};
use crate::tool_source::ToolSpec;

use super::{Node, RunContext, Step};

/// Upper bound on the backward scan for tool-invoking assistant turns. The
/// scan normally stops at the previous user message after a handful of
/// entries; the cap keeps a long unsummarized history from turning the count
/// into a full-history walk.
const MAX_ROUTER_SCAN: usize = 64;

/// Router node.
///
/// Counts consecutive tool-invoking assistant messages since the last user
/// message. At or over the budget it appends the iteration-limit fallback
/// and forces generation; otherwise it asks the model, bound to the
/// retrieval tools, whether to retrieve or answer directly.
///
/// **Interaction**: Entry node of every run; loops back here from the
/// validator on FAILED. The router alone terminates the retrieval loop.
#[derive(Clone)]
pub struct RouterNode {
    llm: Arc<dyn LlmClient>,
    tools: Vec<ToolSpec>,
    max_tool_iterations: u32,
}

impl RouterNode {
    pub fn new(llm: Arc<dyn LlmClient>, tools: Vec<ToolSpec>, max_tool_iterations: u32) -> Self {
        Self {
            llm,
            tools,
            max_tool_iterations,
        }
    }

    /// Consecutive tool-invoking assistant turns since the last user message,
    /// scanning backward from the newest message, at most [`MAX_ROUTER_SCAN`]
    /// entries deep.
    fn tool_turns_since_user(state: &ConversationState) -> u32 {
        let mut count = 0;
        for message in state.messages.iter().rev().take(MAX_ROUTER_SCAN) {
            match message.role {
                crate::message::Role::User => break,
                crate::message::Role::Assistant if message.requests_tools() => count += 1,
                _ => {}
            }
        }
        count
    }
}

#[async_trait]
impl Node for RouterNode {
    fn id(&self) -> &str {
        "router"
    }

    async fn run(
        &self,
        state: &ConversationState,
        _ctx: &RunContext,
    ) -> Result<(StateDelta, Step), WorkflowError> {
        let mut delta = StateDelta::default();

        // Cache the turn's query for the validator and generator; generation
        // cleared it at the end of the previous turn.
        if state.user_query.is_empty() {
            if let Some(query) = state.latest_user_content() {
                delta.user_query = Some(query.to_string());
            }
        }

        let tool_turns = Self::tool_turns_since_user(state);
        if tool_turns >= self.max_tool_iterations {
            debug!(tool_turns, budget = self.max_tool_iterations, "iteration budget exhausted");
            delta.append.push(Message::assistant(ITERATION_LIMIT_MESSAGE));
            delta.retry_count = Some(0);
            return Ok((delta, Step::Generate));
        }

        let response = self
            .llm
            .invoke(CHARACTER_CARD, &state.messages, &self.tools)
            .await?;

        if response.tool_calls.is_empty() {
            // Direct answer: the reply itself is produced by the generator,
            // which renders summary and context into the prompt.
            debug!("no tool call requested, proceeding to generation");
            return Ok((delta, Step::Generate));
        }

        debug!(calls = response.tool_calls.len(), "tool call requested");
        delta
            .append
            .push(Message::assistant_with_tool_calls(
                response.content,
                response.tool_calls,
            ));
        Ok((delta, Step::Retrieve))
    }
}
