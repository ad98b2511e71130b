//! Checkpointer trait and error type.

use async_trait::async_trait;
use thiserror::Error;

use super::Checkpoint;

/// Checkpoint storage failure.
#[derive(Debug, Error)]
pub enum CheckpointError {
    /// State could not be serialized or deserialized.
    #[error("serialization error: {0}")]
    Serialization(String),
    /// The backing store failed (I/O, SQL).
    #[error("storage backend error: {0}")]
    Backend(String),
}

/// Durable keyed storage of the latest checkpoint per conversation.
///
/// Implementations must be atomic per key: concurrent saves for the same
/// `thread_id` resolve to one winner (last checkpoint wins), never to a torn
/// state.
#[async_trait]
pub trait Checkpointer<S>: Send + Sync
where
    S: Clone + Send + Sync + 'static,
{
    /// Latest checkpoint for the thread, or `None` for a new conversation.
    async fn load(&self, thread_id: &str) -> Result<Option<Checkpoint<S>>, CheckpointError>;

    /// Replaces the thread's checkpoint.
    async fn save(&self, thread_id: &str, checkpoint: &Checkpoint<S>)
        -> Result<(), CheckpointError>;
}
