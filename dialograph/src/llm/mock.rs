//! Scripted mock gateway for tests and offline runs.
//!
//! Queue completions with [`MockLlm::push_response`] and classification
//! verdicts with [`MockLlm::push_verdict`]; each call pops the next entry.
//! Exhausted queues fall back to a fixed answer / `PASS`, so a mock never
//! fails a run by under-scripting.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::WorkflowError;
use crate::message::{Message, ToolCall};
use crate::tool_source::ToolSpec;

use super::{LlmClient, LlmResponse};

/// Scripted gateway: pops queued responses and verdicts in order.
///
/// **Interaction**: Implements [`LlmClient`]; used by the integration tests
/// and the CLI's offline mode.
pub struct MockLlm {
    responses: Mutex<VecDeque<LlmResponse>>,
    verdicts: Mutex<VecDeque<String>>,
    fallback: String,
}

impl MockLlm {
    /// Mock with an empty script; every completion returns `fallback`.
    pub fn new(fallback: impl Into<String>) -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            verdicts: Mutex::new(VecDeque::new()),
            fallback: fallback.into(),
        }
    }

    /// Queues a plain-text completion.
    pub fn push_response(self, content: impl Into<String>) -> Self {
        self.responses.lock().unwrap().push_back(LlmResponse {
            content: content.into(),
            tool_calls: Vec::new(),
        });
        self
    }

    /// Queues a tool-call completion.
    pub fn push_tool_call(self, name: impl Into<String>, arguments: impl Into<String>) -> Self {
        let name = name.into();
        self.responses.lock().unwrap().push_back(LlmResponse {
            content: String::new(),
            tool_calls: vec![ToolCall {
                id: Some(format!("call-{}", name)),
                name,
                arguments: arguments.into(),
            }],
        });
        self
    }

    /// Queues a classification verdict (`PASS` / `FAILED`).
    pub fn push_verdict(self, verdict: impl Into<String>) -> Self {
        self.verdicts.lock().unwrap().push_back(verdict.into());
        self
    }

    /// Completions consumed so far is not tracked; remaining script length is.
    pub fn remaining_responses(&self) -> usize {
        self.responses.lock().unwrap().len()
    }
}

impl Default for MockLlm {
    fn default() -> Self {
        Self::new("(mock reply)")
    }
}

#[async_trait]
impl LlmClient for MockLlm {
    async fn invoke(
        &self,
        _prompt: &str,
        _history: &[Message],
        _tools: &[ToolSpec],
    ) -> Result<LlmResponse, WorkflowError> {
        let next = self.responses.lock().unwrap().pop_front();
        Ok(next.unwrap_or_else(|| LlmResponse {
            content: self.fallback.clone(),
            tool_calls: Vec::new(),
        }))
    }

    async fn classify(&self, _prompt: &str) -> Result<String, WorkflowError> {
        let next = self.verdicts.lock().unwrap().pop_front();
        Ok(next.unwrap_or_else(|| "PASS".to_string()))
    }
}
