//! Conversation message records.
//!
//! A `Message` is immutable once appended to the state; the summarizer may
//! drop whole messages during compaction but never edits one in place.

use serde::{Deserialize, Serialize};

/// Author of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Human-authored input.
    User,
    /// Model output, either reply text or a tool-call request.
    Assistant,
    /// Result text returned by the tool gateway.
    Tool,
}

impl Role {
    /// Lowercase label used when rendering `"role: content"` lines.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::Tool => "tool",
        }
    }
}

/// One requested tool invocation, as returned by the model gateway.
///
/// `arguments` is the raw JSON string from the model; the retriever parses it
/// (empty or invalid arguments degrade to `{}`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolCall {
    /// Gateway-assigned call id, echoed back on the tool result when present.
    pub id: Option<String>,
    pub name: String,
    pub arguments: String,
}

/// One conversation message.
///
/// `id` is unique within a conversation; ids are minted by
/// [`ConversationState::apply`](crate::state::ConversationState::apply) when a
/// node's delta is merged, so messages are built with an empty id.
/// `tool_calls` is non-empty only on assistant messages that request tool use
/// (such messages may carry empty `content`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    #[serde(default)]
    pub id: String,
    pub role: Role,
    pub content: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<ToolCall>,
}

impl Message {
    /// New user message (id assigned on append).
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            id: String::new(),
            role: Role::User,
            content: content.into(),
            tool_calls: Vec::new(),
        }
    }

    /// New assistant reply message (id assigned on append).
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            id: String::new(),
            role: Role::Assistant,
            content: content.into(),
            tool_calls: Vec::new(),
        }
    }

    /// New assistant message carrying tool-call requests.
    pub fn assistant_with_tool_calls(content: impl Into<String>, tool_calls: Vec<ToolCall>) -> Self {
        Self {
            id: String::new(),
            role: Role::Assistant,
            content: content.into(),
            tool_calls,
        }
    }

    /// New tool-result message.
    pub fn tool(content: impl Into<String>) -> Self {
        Self {
            id: String::new(),
            role: Role::Tool,
            content: content.into(),
            tool_calls: Vec::new(),
        }
    }

    /// True for assistant messages that request tool use.
    pub fn requests_tools(&self) -> bool {
        self.role == Role::Assistant && !self.tool_calls.is_empty()
    }
}
