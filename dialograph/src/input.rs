//! Heterogeneous run input, resolved once at the entry point.
//!
//! The transport layer may hand the engine a bare string, a list of strings,
//! or a list of role/content pairs. `InputPayload` is the tagged union of
//! those shapes; [`InputPayload::parse`] resolves arbitrary JSON into it,
//! yielding an empty message list for unrecognized shapes (the engine then
//! refuses to start the run, see
//! [`WorkflowError::MalformedInput`](crate::WorkflowError::MalformedInput)).

use serde::Deserialize;
use serde_json::Value;

use crate::message::Message;

/// One role/content pair from a structured input list.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct InputEntry {
    pub role: String,
    pub content: String,
}

/// The accepted input shapes.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum InputPayload {
    /// A single user utterance.
    Text(String),
    /// Several user utterances, appended in order.
    Texts(Vec<String>),
    /// Explicit role/content pairs (e.g. imported history).
    Entries(Vec<InputEntry>),
}

impl InputPayload {
    /// Resolves arbitrary JSON into a payload. Unrecognized shapes produce
    /// an empty entry list rather than an error.
    pub fn parse(value: &Value) -> InputPayload {
        serde_json::from_value(value.clone()).unwrap_or(InputPayload::Entries(Vec::new()))
    }

    /// Canonical message sequence for this payload.
    ///
    /// Bare strings become user messages. Role strings other than `user` and
    /// `assistant` are skipped.
    pub fn into_messages(self) -> Vec<Message> {
        match self {
            InputPayload::Text(text) => vec![Message::user(text)],
            InputPayload::Texts(texts) => texts.into_iter().map(Message::user).collect(),
            InputPayload::Entries(entries) => entries
                .into_iter()
                .filter_map(|e| match e.role.as_str() {
                    "user" => Some(Message::user(e.content)),
                    "assistant" => Some(Message::assistant(e.content)),
                    _ => None,
                })
                .collect(),
        }
    }
}

impl From<&str> for InputPayload {
    fn from(text: &str) -> Self {
        InputPayload::Text(text.to_string())
    }
}

impl From<String> for InputPayload {
    fn from(text: String) -> Self {
        InputPayload::Text(text)
    }
}

impl From<Vec<String>> for InputPayload {
    fn from(texts: Vec<String>) -> Self {
        InputPayload::Texts(texts)
    }
}
