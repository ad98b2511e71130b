//! Checkpoint and metadata types.

use std::time::SystemTime;

/// Where in the run a checkpoint was taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckpointSource {
    /// After appending the turn's user input, before the first node.
    Input,
    /// After a node transition.
    Step,
}

impl CheckpointSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckpointSource::Input => "input",
            CheckpointSource::Step => "step",
        }
    }
}

/// Metadata for a single checkpoint (source, step ordinal, created_at).
#[derive(Debug, Clone)]
pub struct CheckpointMetadata {
    pub source: CheckpointSource,
    /// Node ordinal within the run; 0 for the input checkpoint.
    pub step: u64,
    pub created_at: Option<SystemTime>,
}

/// One checkpoint: a state snapshot plus id/ts/metadata.
///
/// **Interaction**: Produced by the engine after each transition; consumed by
/// [`Checkpointer::save`](super::Checkpointer::save), returned by
/// [`Checkpointer::load`](super::Checkpointer::load).
#[derive(Debug, Clone)]
pub struct Checkpoint<S> {
    pub id: String,
    pub ts: String,
    pub state: S,
    pub metadata: CheckpointMetadata,
}

impl<S> Checkpoint<S> {
    /// Creates a checkpoint from the current state. Uses current time for
    /// id/ts.
    pub fn from_state(state: S, source: CheckpointSource, step: u64) -> Self {
        let now = SystemTime::now();
        let ts = format!(
            "{}",
            now.duration_since(SystemTime::UNIX_EPOCH)
                .map(|d| d.as_millis())
                .unwrap_or(0)
        );
        let id = format!("{}-{}", ts, step);
        Self {
            id,
            ts,
            state,
            metadata: CheckpointMetadata {
                source,
                step,
                created_at: Some(now),
            },
        }
    }
}
