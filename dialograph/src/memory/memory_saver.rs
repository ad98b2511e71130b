//! In-memory checkpointer for dev and tests.

use async_trait::async_trait;
use dashmap::DashMap;

use super::{Checkpoint, CheckpointError, Checkpointer};

/// In-memory checkpointer: one latest checkpoint per thread.
///
/// Backed by a `DashMap`, so saves on the same key are atomic (last
/// checkpoint wins) and different conversations never contend.
///
/// **Interaction**: Implements [`Checkpointer`]; state does not survive the
/// process. Use [`SqliteSaver`](super::SqliteSaver) for that.
pub struct MemorySaver<S> {
    checkpoints: DashMap<String, Checkpoint<S>>,
}

impl<S> MemorySaver<S> {
    pub fn new() -> Self {
        Self {
            checkpoints: DashMap::new(),
        }
    }

    /// Number of threads with a stored checkpoint.
    pub fn len(&self) -> usize {
        self.checkpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checkpoints.is_empty()
    }
}

impl<S> Default for MemorySaver<S> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<S> Checkpointer<S> for MemorySaver<S>
where
    S: Clone + Send + Sync + 'static,
{
    async fn load(&self, thread_id: &str) -> Result<Option<Checkpoint<S>>, CheckpointError> {
        Ok(self.checkpoints.get(thread_id).map(|e| e.value().clone()))
    }

    async fn save(
        &self,
        thread_id: &str,
        checkpoint: &Checkpoint<S>,
    ) -> Result<(), CheckpointError> {
        self.checkpoints
            .insert(thread_id.to_string(), checkpoint.clone());
        Ok(())
    }
}
