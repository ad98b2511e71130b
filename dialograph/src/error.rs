//! Run-boundary error types.
//!
//! Every failure that aborts a run surfaces as exactly one `WorkflowError`
//! event on the response stream. Validation failures and iteration-budget
//! exhaustion are control flow, not errors, and never appear here.

use thiserror::Error;

use crate::memory::CheckpointError;

/// Error terminating a workflow run.
///
/// **Interaction**: Produced by nodes and the engine driver; sent as the
/// single terminal `Err` item of the response stream. State persisted up to
/// the last completed node remains valid for the next turn.
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// Input normalized to zero messages; the run was not started and no
    /// state was touched.
    #[error("input contains no readable message")]
    MalformedInput,

    /// The language model gateway failed (unreachable, rejected request,
    /// malformed response).
    #[error("model gateway error: {0}")]
    Gateway(String),

    /// The tool gateway failed while executing a requested call.
    #[error("tool gateway error: {0}")]
    Tool(String),

    /// Loading or saving a checkpoint failed. The caller must assume the
    /// response is not resumable.
    #[error("checkpoint error: {0}")]
    Checkpoint(#[from] CheckpointError),
}
