//! Mock ToolSource for tests and offline runs.
//!
//! Returns the retrieval capability set and scripted call results; no real
//! retriever or search backend required.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use super::{retrieval_tool_specs, ToolCallContent, ToolSource, ToolSourceError, ToolSpec};

/// Mock tool gateway: fixed tool list, scripted call results.
///
/// `call_tool` pops queued results in order; when the queue is empty it
/// returns the fixed fallback text (same for every tool).
///
/// **Interaction**: Implements [`ToolSource`]; used by the retriever node in
/// tests and by the CLI's offline mode.
pub struct MockToolSource {
    tools: Vec<ToolSpec>,
    results: Mutex<VecDeque<String>>,
    fallback: String,
}

impl MockToolSource {
    /// Mock listing the retrieval capability set with a fixed call result.
    pub fn new(fallback: impl Into<String>) -> Self {
        Self {
            tools: retrieval_tool_specs(),
            results: Mutex::new(VecDeque::new()),
            fallback: fallback.into(),
        }
    }

    /// Queues a result for the next call (builder style).
    pub fn push_result(self, text: impl Into<String>) -> Self {
        self.results.lock().unwrap().push_back(text.into());
        self
    }

    /// Replaces the tool list (builder style).
    pub fn with_tools(mut self, tools: Vec<ToolSpec>) -> Self {
        self.tools = tools;
        self
    }
}

impl Default for MockToolSource {
    fn default() -> Self {
        Self::new("nothing found")
    }
}

#[async_trait]
impl ToolSource for MockToolSource {
    async fn list_tools(&self) -> Result<Vec<ToolSpec>, ToolSourceError> {
        Ok(self.tools.clone())
    }

    async fn call_tool(
        &self,
        _name: &str,
        _arguments: Value,
    ) -> Result<ToolCallContent, ToolSourceError> {
        let next = self.results.lock().unwrap().pop_front();
        Ok(ToolCallContent {
            text: next.unwrap_or_else(|| self.fallback.clone()),
        })
    }
}
