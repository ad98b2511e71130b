//! Tool gateway abstraction: the retrieval capabilities the router may bind
//! and the retriever executes.
//!
//! The real backend (hybrid retriever, web search engine) lives outside this
//! crate; it plugs in by implementing [`ToolSource`].

mod mock;

pub use mock::MockToolSource;

use async_trait::async_trait;
use serde_json::{json, Value};
use thiserror::Error;

/// Declared capability: name, human description, JSON schema of arguments.
///
/// **Interaction**: Returned by [`ToolSource::list_tools`]; passed to the
/// model gateway so it can emit matching tool calls.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolSpec {
    pub name: String,
    pub description: Option<String>,
    pub input_schema: Value,
}

/// Text content returned by one tool call. Empty text is a valid result
/// (nothing found); callers must tolerate it.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolCallContent {
    pub text: String,
}

/// Tool gateway failure.
#[derive(Debug, Error)]
pub enum ToolSourceError {
    #[error("unknown tool: {0}")]
    UnknownTool(String),
    #[error("tool execution failed: {0}")]
    Execution(String),
}

/// Tool gateway: lists capabilities and executes calls.
///
/// Implementations may perform network I/O and be slow or unreliable; the
/// workflow treats an `Err` as fatal for the run and an empty result as a
/// normal outcome.
#[async_trait]
pub trait ToolSource: Send + Sync {
    async fn list_tools(&self) -> Result<Vec<ToolSpec>, ToolSourceError>;

    async fn call_tool(
        &self,
        name: &str,
        arguments: Value,
    ) -> Result<ToolCallContent, ToolSourceError>;
}

/// The retrieval capability set: curated database search, live web search,
/// and the combined context retriever.
///
/// Descriptions instruct the model to reach for retrieval on post-cutoff
/// facts instead of guessing.
pub fn retrieval_tool_specs() -> Vec<ToolSpec> {
    let query_schema = json!({
        "type": "object",
        "properties": {
            "query": { "type": "string", "description": "What to look up." }
        },
        "required": ["query"]
    });
    vec![
        ToolSpec {
            name: "search_database".to_string(),
            description: Some(
                "Search the curated document store for background material on the query."
                    .to_string(),
            ),
            input_schema: query_schema.clone(),
        },
        ToolSpec {
            name: "web_search".to_string(),
            description: Some(
                "Search the live web. Use for news, current events, sports results or any \
                 fact from after your training cutoff. Do not guess current information."
                    .to_string(),
            ),
            input_schema: query_schema.clone(),
        },
        ToolSpec {
            name: "retrieve_context".to_string(),
            description: Some(
                "Retrieve supporting context for the query from all available sources. \
                 Always use this instead of relying on internal knowledge for recent facts."
                    .to_string(),
            ),
            input_schema: query_schema,
        },
    ]
}
