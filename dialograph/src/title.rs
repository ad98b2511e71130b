//! Conversation title helper (request/response side channel, not a graph
//! node).
//!
//! Titles are recomputed only at defined checkpoints (after the 1st message,
//! after the 2nd, and every 10th thereafter), so the transport layer can call
//! this on every turn without paying for a model call each time.

use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use crate::error::WorkflowError;
use crate::llm::LlmClient;
use crate::message::Message;
use crate::prompts::TITLE_PROMPT;

/// Longest title returned; model output beyond this is cut at a word
/// boundary where possible.
const MAX_TITLE_LEN: usize = 80;

/// Derives short human-readable conversation labels.
#[derive(Clone)]
pub struct TitleGenerator {
    llm: Arc<dyn LlmClient>,
}

impl TitleGenerator {
    pub fn new(llm: Arc<dyn LlmClient>) -> Self {
        Self { llm }
    }

    /// Recomputes the title when `lines` is at a cadence checkpoint, else
    /// returns `None` without a model call.
    pub async fn maybe_title(&self, lines: &[String]) -> Result<Option<String>, WorkflowError> {
        if !at_checkpoint(lines.len()) {
            return Ok(None);
        }

        let conversation = lines.join("\n");
        let response = self
            .llm
            .invoke(TITLE_PROMPT, &[Message::user(conversation)], &[])
            .await?;

        let title = clip_title(response.content.trim());
        if title.is_empty() {
            return Ok(None);
        }
        debug!(title = %title, "conversation title derived");
        Ok(Some(title))
    }
}

/// Cadence rule: 1st message, 2nd message, every 10th thereafter.
fn at_checkpoint(count: usize) -> bool {
    count == 1 || count == 2 || (count > 0 && count % 10 == 0)
}

fn clip_title(title: &str) -> String {
    if title.len() <= MAX_TITLE_LEN {
        return title.to_string();
    }
    let cut = title
        .char_indices()
        .take_while(|(i, _)| *i <= MAX_TITLE_LEN)
        .last()
        .map(|(i, _)| i)
        .unwrap_or(0);
    let head = &title[..cut];
    match head.rfind(' ') {
        Some(space) if space > 0 => head[..space].to_string(),
        _ => head.to_string(),
    }
}

/// `"role: content"` lines for structured messages.
pub fn message_lines(messages: &[Message]) -> Vec<String> {
    messages
        .iter()
        .map(|m| format!("{}: {}", m.role.as_str(), m.content))
        .collect()
}

/// `"role: content"` lines for heterogeneous JSON input: an array of
/// role/content maps, an array of bare strings (role defaults to `user`), or
/// a bare string. Unrecognized entries are skipped.
pub fn value_lines(value: &Value) -> Vec<String> {
    match value {
        Value::String(s) => vec![format!("user: {}", s)],
        Value::Array(items) => items
            .iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(format!("user: {}", s)),
                Value::Object(map) => {
                    let role = map.get("role").and_then(Value::as_str)?;
                    let content = map.get("content").and_then(Value::as_str)?;
                    Some(format!("{}: {}", role, content))
                }
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    }
}
