//! Checkpointing: durable per-thread state snapshots.
//!
//! A [`Checkpointer`] stores the latest [`Checkpoint`] per `thread_id`; the
//! engine saves one after the input append and after every node transition,
//! so a crash mid-run resumes from the last completed node.
//!
//! | Type          | Persistence | Use case                | Feature  |
//! |---------------|-------------|-------------------------|----------|
//! | [`MemorySaver`] | In-memory | Dev, tests              | —        |
//! | [`SqliteSaver`] | SQLite file | Single-node, production | `sqlite` |
//!
//! Both are atomic per key (last checkpoint wins), which is the whole
//! cross-run consistency contract: the engine itself never locks across
//! conversations.

mod checkpoint;
mod checkpointer;
mod memory_saver;
mod serializer;

#[cfg(feature = "sqlite")]
mod sqlite_saver;

pub use checkpoint::{Checkpoint, CheckpointMetadata, CheckpointSource};
pub use checkpointer::{CheckpointError, Checkpointer};
pub use memory_saver::MemorySaver;
pub use serializer::{JsonSerializer, Serializer};

#[cfg(feature = "sqlite")]
pub use sqlite_saver::SqliteSaver;
