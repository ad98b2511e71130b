//! Conversation state and the per-node delta merged by the driver.
//!
//! The state is an immutable snapshot between nodes: each node receives a
//! reference and returns a [`StateDelta`] (field-level patch); the driver
//! produces the next snapshot with [`ConversationState::apply`]. Nothing is
//! mutated behind the driver's back.

use serde::{Deserialize, Serialize};

use crate::message::Message;

/// Last context-validation verdict for the current turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationStatus {
    /// No validation has run this turn.
    #[default]
    Unset,
    Pass,
    Failed,
}

/// The unit of data passed between graph steps and persisted between runs,
/// keyed by a conversation identifier (`thread_id`).
///
/// **Interaction**: Loaded/saved through a
/// [`Checkpointer`](crate::memory::Checkpointer) after every node transition;
/// read by every node; advanced only via [`apply`](Self::apply).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConversationState {
    /// Ordered conversation history. Append-only except for bulk removal
    /// during summarization; order is arrival order and survives persistence.
    pub messages: Vec<Message>,
    /// Compressed representation of removed history; empty until the first
    /// summarization, afterwards only ever extended.
    #[serde(default)]
    pub summary: String,
    /// Most recent human query, cached for the validator and generator.
    /// Turn-scoped: cleared after generation.
    #[serde(default)]
    pub user_query: String,
    /// Retrieved supporting material for the current turn. Overwritten per
    /// retrieval attempt; cleared after generation.
    #[serde(default)]
    pub context: String,
    /// Consecutive failed validation attempts this turn. Never exceeds the
    /// configured tool-iteration budget.
    #[serde(default)]
    pub retry_count: u32,
    #[serde(default)]
    pub validation_status: ValidationStatus,
    /// Counter minting message ids (`m0`, `m1`, ...). Persisted so ids stay
    /// unique within the conversation across runs.
    #[serde(default)]
    pub next_message_id: u64,
}

impl ConversationState {
    /// Merges a node's delta into this snapshot and returns the next one.
    ///
    /// Order: `retain_last` trims the history to its most recent K messages
    /// first, then `append` adds new messages (minting ids for any message
    /// appended without one), then scalar fields are overwritten where the
    /// delta sets them.
    pub fn apply(mut self, delta: StateDelta) -> ConversationState {
        if let Some(keep) = delta.retain_last {
            if self.messages.len() > keep {
                let cut = self.messages.len() - keep;
                self.messages.drain(..cut);
            }
        }
        for mut message in delta.append {
            if message.id.is_empty() {
                message.id = format!("m{}", self.next_message_id);
                self.next_message_id += 1;
            }
            self.messages.push(message);
        }
        if let Some(summary) = delta.summary {
            self.summary = summary;
        }
        if let Some(user_query) = delta.user_query {
            self.user_query = user_query;
        }
        if let Some(context) = delta.context {
            self.context = context;
        }
        if let Some(retry_count) = delta.retry_count {
            self.retry_count = retry_count;
        }
        if let Some(status) = delta.validation_status {
            self.validation_status = status;
        }
        self
    }

    /// Content of the most recent user message, if any.
    pub fn latest_user_content(&self) -> Option<&str> {
        self.messages
            .iter()
            .rev()
            .find(|m| m.role == crate::message::Role::User)
            .map(|m| m.content.as_str())
    }
}

/// Field-level patch returned by each node.
///
/// Unset fields leave the snapshot untouched; `append` and `retain_last`
/// compose (trim first, then append).
#[derive(Debug, Clone, Default)]
pub struct StateDelta {
    /// Messages to append, in order.
    pub append: Vec<Message>,
    /// Keep only the most recent K messages before appending.
    pub retain_last: Option<usize>,
    pub summary: Option<String>,
    pub user_query: Option<String>,
    pub context: Option<String>,
    pub retry_count: Option<u32>,
    pub validation_status: Option<ValidationStatus>,
}

impl StateDelta {
    /// Delta that only appends the given messages.
    pub fn append(messages: Vec<Message>) -> Self {
        Self {
            append: messages,
            ..Self::default()
        }
    }
}
