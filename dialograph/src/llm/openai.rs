//! OpenAI Chat Completions client implementing `LlmClient` (ChatOpenAI).
//!
//! Uses the real Chat Completions API. Requires `OPENAI_API_KEY` (or explicit
//! config). Tool specs are passed per call; when present, the API may return
//! `tool_calls` in the response.
//!
//! **Interaction**: Implements [`LlmClient`]; constructed by the CLI, used by
//! every node through the engine. Depends on `async_openai` (feature
//! `openai`).

use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio_stream::StreamExt;

use crate::error::WorkflowError;
use crate::llm::{LlmClient, LlmResponse, MessageChunk};
use crate::message::{Message, Role, ToolCall};
use crate::tool_source::ToolSpec;

use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionMessageToolCalls, ChatCompletionRequestMessage,
        ChatCompletionRequestSystemMessage, ChatCompletionRequestUserMessage, ChatCompletionTool,
        ChatCompletionTools, CreateChatCompletionRequestArgs, FunctionObject,
    },
    Client,
};

/// Chat Completions client for the model gateway.
///
/// Uses `OPENAI_API_KEY` from the environment by default; or provide config
/// via [`ChatOpenAI::with_config`].
pub struct ChatOpenAI {
    client: Client<OpenAIConfig>,
    model: String,
    temperature: Option<f32>,
}

impl ChatOpenAI {
    /// Build client with default config (API key from `OPENAI_API_KEY` env).
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            model: model.into(),
            temperature: None,
        }
    }

    /// Build client with custom config (e.g. custom API key or base URL).
    pub fn with_config(config: OpenAIConfig, model: impl Into<String>) -> Self {
        Self {
            client: Client::with_config(config),
            model: model.into(),
            temperature: None,
        }
    }

    /// Set temperature (0–2). Lower values are more deterministic.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Convert the system prompt plus our `Message` history to request
    /// messages. Tool results and tool-call markers are folded into plain
    /// text; the wire tool protocol is not replayed across turns.
    fn request_messages(prompt: &str, history: &[Message]) -> Vec<ChatCompletionRequestMessage> {
        let mut out = Vec::with_capacity(history.len() + 1);
        out.push(ChatCompletionRequestMessage::System(
            ChatCompletionRequestSystemMessage::from(prompt),
        ));
        for m in history {
            match m.role {
                Role::User => out.push(ChatCompletionRequestMessage::User(
                    ChatCompletionRequestUserMessage::from(m.content.as_str()),
                )),
                Role::Assistant => {
                    let text = if m.tool_calls.is_empty() {
                        m.content.clone()
                    } else {
                        let names: Vec<&str> =
                            m.tool_calls.iter().map(|c| c.name.as_str()).collect();
                        format!("[requested tools: {}] {}", names.join(", "), m.content)
                    };
                    out.push(ChatCompletionRequestMessage::Assistant(text.as_str().into()));
                }
                Role::Tool => out.push(ChatCompletionRequestMessage::User(
                    ChatCompletionRequestUserMessage::from(
                        format!("[tool result] {}", m.content).as_str(),
                    ),
                )),
            }
        }
        out
    }

    fn build_request(
        &self,
        prompt: &str,
        history: &[Message],
        tools: &[ToolSpec],
        stream: bool,
    ) -> Result<async_openai::types::chat::CreateChatCompletionRequest, WorkflowError> {
        let mut args = CreateChatCompletionRequestArgs::default();
        args.model(self.model.clone());
        args.messages(Self::request_messages(prompt, history));
        if stream {
            args.stream(true);
        }
        if !tools.is_empty() {
            let chat_tools: Vec<ChatCompletionTools> = tools
                .iter()
                .map(|t| {
                    ChatCompletionTools::Function(ChatCompletionTool {
                        function: FunctionObject {
                            name: t.name.clone(),
                            description: t.description.clone(),
                            parameters: Some(t.input_schema.clone()),
                            ..Default::default()
                        },
                    })
                })
                .collect();
            args.tools(chat_tools);
        }
        if let Some(t) = self.temperature {
            args.temperature(t);
        }
        args.build()
            .map_err(|e| WorkflowError::Gateway(format!("request build failed: {}", e)))
    }
}

#[async_trait]
impl LlmClient for ChatOpenAI {
    async fn invoke(
        &self,
        prompt: &str,
        history: &[Message],
        tools: &[ToolSpec],
    ) -> Result<LlmResponse, WorkflowError> {
        let request = self.build_request(prompt, history, tools, false)?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| WorkflowError::Gateway(format!("chat completion error: {}", e)))?;

        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| WorkflowError::Gateway("completion returned no choices".to_string()))?;

        let msg = choice.message;
        let content = msg.content.unwrap_or_default();
        let tool_calls: Vec<ToolCall> = msg
            .tool_calls
            .unwrap_or_default()
            .into_iter()
            .filter_map(|tc| {
                if let ChatCompletionMessageToolCalls::Function(f) = tc {
                    Some(ToolCall {
                        name: f.function.name,
                        arguments: f.function.arguments,
                        id: Some(f.id),
                    })
                } else {
                    None
                }
            })
            .collect();

        Ok(LlmResponse {
            content,
            tool_calls,
        })
    }

    /// Token-granular streaming. Used by the generator, which never binds
    /// tools, so tool-call deltas are not accumulated here; callers that need
    /// tool calls use `invoke`.
    async fn invoke_stream(
        &self,
        prompt: &str,
        history: &[Message],
        tools: &[ToolSpec],
        chunk_tx: Option<mpsc::Sender<MessageChunk>>,
    ) -> Result<LlmResponse, WorkflowError> {
        let request = self.build_request(prompt, history, tools, true)?;

        let mut stream = self
            .client
            .chat()
            .create_stream(request)
            .await
            .map_err(|e| WorkflowError::Gateway(format!("chat stream error: {}", e)))?;

        let mut content = String::new();
        while let Some(item) = stream.next().await {
            let chunk = item
                .map_err(|e| WorkflowError::Gateway(format!("chat stream error: {}", e)))?;
            for choice in &chunk.choices {
                if let Some(delta) = choice.delta.content.as_deref() {
                    if delta.is_empty() {
                        continue;
                    }
                    content.push_str(delta);
                    if let Some(tx) = &chunk_tx {
                        let _ = tx
                            .send(MessageChunk {
                                content: delta.to_string(),
                            })
                            .await;
                    }
                }
            }
        }

        Ok(LlmResponse {
            content,
            tool_calls: Vec::new(),
        })
    }

    async fn classify(&self, prompt: &str) -> Result<String, WorkflowError> {
        let response = self.invoke(prompt, &[], &[]).await?;
        Ok(response.content.trim().to_string())
    }
}
