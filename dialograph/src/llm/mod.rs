//! Language model gateway abstraction.
//!
//! The router, validator, generator, summarizer and title helper all talk to
//! the model through [`LlmClient`]. Implementations: [`MockLlm`] (scripted,
//! for tests and offline runs) and `ChatOpenAI` (feature `openai`).

mod mock;

#[cfg(feature = "openai")]
mod openai;

pub use mock::MockLlm;

#[cfg(feature = "openai")]
pub use openai::ChatOpenAI;

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::error::WorkflowError;
use crate::message::{Message, ToolCall};
use crate::tool_source::ToolSpec;

/// One chunk of streamed completion content.
#[derive(Debug, Clone)]
pub struct MessageChunk {
    pub content: String,
}

/// Response from one completion: assistant text and optional tool calls.
///
/// **Interaction**: Returned by [`LlmClient::invoke`]; the router turns
/// non-empty `tool_calls` into an assistant tool-call message, the generator
/// writes `content` into the turn's reply.
#[derive(Debug, Clone, Default)]
pub struct LlmResponse {
    /// Assistant message content (may be empty when the response is a
    /// tool-call request).
    pub content: String,
    /// Requested tool invocations; empty means a direct answer.
    pub tool_calls: Vec<ToolCall>,
}

/// Language model gateway.
///
/// `prompt` is the rendered system block (persona, summary, context or a
/// task instruction); `history` is the conversation so far; `tools` is the
/// capability set the model may request (empty disables tool use).
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// One completion: returns assistant text and optional tool calls.
    async fn invoke(
        &self,
        prompt: &str,
        history: &[Message],
        tools: &[ToolSpec],
    ) -> Result<LlmResponse, WorkflowError>;

    /// Streaming completion: forwards content chunks through `chunk_tx` as
    /// they arrive, then returns the complete response.
    ///
    /// The default forwards the full content as a single chunk, which keeps
    /// non-streaming implementations correct for callers that only need the
    /// streaming contract, not token granularity.
    async fn invoke_stream(
        &self,
        prompt: &str,
        history: &[Message],
        tools: &[ToolSpec],
        chunk_tx: Option<mpsc::Sender<MessageChunk>>,
    ) -> Result<LlmResponse, WorkflowError> {
        let response = self.invoke(prompt, history, tools).await?;
        if let Some(tx) = chunk_tx {
            if !response.content.is_empty() {
                let _ = tx
                    .send(MessageChunk {
                        content: response.content.clone(),
                    })
                    .await;
            }
        }
        Ok(response)
    }

    /// One-shot classification; the returned label is the raw model output
    /// (for context validation: the literal `PASS` or `FAILED`).
    async fn classify(&self, prompt: &str) -> Result<String, WorkflowError>;
}
