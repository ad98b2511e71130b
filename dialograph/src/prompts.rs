//! Prompt cards used by the nodes.
//!
//! One named constant per card, so prompt text lives in one place and node
//! code stays free of string literals.

/// Persona and ground rules rendered at the top of every generation prompt.
pub const CHARACTER_CARD: &str = "\
You are a helpful, plain-spoken conversational assistant.
Answer the user's latest message directly, using the conversation so far.
When a 'Retrieved context' section is present, prefer it over your own
recollection for facts, and say so briefly when it does not cover the
question. Do not invent sources. Keep answers concise unless the user asks
for depth.";

/// Create-summary prompt, used when no prior summary exists.
pub const SUMMARY_PROMPT: &str = "\
Create a summary of the conversation between you and the user.
The summary must be a short description of the conversation so far, but one
that also captures all the relevant information shared between you and the
user:";

/// Extend-summary prompt, used when a prior summary exists. The prior summary
/// is appended after this text, then the messages being removed.
pub const EXTEND_SUMMARY_PROMPT: &str = "\
This is the summary of the conversation so far. Extend it with the new
messages below, keeping everything still relevant from the existing summary:";

/// Classification prompt for the context validator. Rendered with the user
/// query and the retrieved context; the gateway must answer with exactly
/// PASS or FAILED.
pub const CONTEXT_VALIDATION_PROMPT: &str = "\
You are judging retrieved context. Reply with exactly one word: PASS if the
context below contains the information needed to answer the user query,
FAILED otherwise. No other output.";

/// Title prompt. Rendered with normalized `role: content` lines.
pub const TITLE_PROMPT: &str = "\
Generate a very short title (3-6 words) for this conversation. Output only
the title, no quotes or trailing punctuation.";

/// Assistant message injected by the router when the tool-iteration budget is
/// exhausted. Stays in the history; generation still runs afterwards.
pub const ITERATION_LIMIT_MESSAGE: &str = "\
I was unable to verify supporting material after several retrieval attempts; \
answering with what I have.";
