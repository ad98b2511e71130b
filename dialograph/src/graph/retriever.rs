//! Retriever node: executes the tool calls requested by the router and
//! overwrites the turn's context with the results.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::WorkflowError;
use crate::message::Message;
use crate::state::{ConversationState, StateDelta};
use crate::tool_source::ToolSource;

use super::{Node, RunContext, Step};

/// Retriever node.
///
/// Reads the newest assistant message's tool calls, executes each through
/// the tool gateway, appends one tool message per result and sets `context`
/// to the joined result text. Context is overwritten on every attempt; a
/// failed attempt's leftovers never leak into the next one. Empty results
/// are normal (the validator will judge them), gateway errors abort the run.
#[derive(Clone)]
pub struct RetrieverNode {
    tools: Arc<dyn ToolSource>,
}

impl RetrieverNode {
    pub fn new(tools: Arc<dyn ToolSource>) -> Self {
        Self { tools }
    }
}

#[async_trait]
impl Node for RetrieverNode {
    fn id(&self) -> &str {
        "retriever"
    }

    async fn run(
        &self,
        state: &ConversationState,
        _ctx: &RunContext,
    ) -> Result<(StateDelta, Step), WorkflowError> {
        let calls = state
            .messages
            .iter()
            .rev()
            .find(|m| m.requests_tools())
            .map(|m| m.tool_calls.clone())
            .unwrap_or_default();

        let mut delta = StateDelta::default();
        let mut fetched: Vec<String> = Vec::with_capacity(calls.len());

        for call in &calls {
            let args: Value = if call.arguments.trim().is_empty() {
                serde_json::json!({})
            } else {
                serde_json::from_str(&call.arguments).unwrap_or(serde_json::json!({}))
            };

            debug!(tool = %call.name, "executing tool call");
            let content = self
                .tools
                .call_tool(&call.name, args)
                .await
                .map_err(|e| WorkflowError::Tool(e.to_string()))?;

            if content.text.is_empty() {
                warn!(tool = %call.name, "tool returned empty result");
            }
            delta.append.push(Message::tool(content.text.clone()));
            if !content.text.is_empty() {
                fetched.push(content.text);
            }
        }

        delta.context = Some(fetched.join("\n\n"));
        Ok((delta, Step::Validate))
    }
}
