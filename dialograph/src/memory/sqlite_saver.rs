//! SQLite checkpointer: durable latest-checkpoint-per-thread storage.
//!
//! One row per `thread_id`, replaced on every save (`INSERT OR REPLACE`), so
//! concurrent saves on the same key serialize to last-checkpoint-wins.

use std::marker::PhantomData;
use std::path::Path;
use std::sync::Mutex;

use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};

use super::{
    Checkpoint, CheckpointError, CheckpointMetadata, CheckpointSource, Checkpointer,
    JsonSerializer, Serializer,
};

/// SQLite-backed checkpointer.
///
/// **Interaction**: Implements [`Checkpointer`] for any JSON-serializable
/// state via [`JsonSerializer`].
pub struct SqliteSaver<S> {
    conn: Mutex<Connection>,
    serializer: JsonSerializer,
    _state: PhantomData<fn() -> S>,
}

impl<S> SqliteSaver<S> {
    /// Opens (or creates) the database file and the checkpoints table.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, CheckpointError> {
        let conn = Connection::open(path).map_err(|e| CheckpointError::Backend(e.to_string()))?;
        Self::with_connection(conn)
    }

    /// In-memory database, handy for tests.
    pub fn open_in_memory() -> Result<Self, CheckpointError> {
        let conn =
            Connection::open_in_memory().map_err(|e| CheckpointError::Backend(e.to_string()))?;
        Self::with_connection(conn)
    }

    fn with_connection(conn: Connection) -> Result<Self, CheckpointError> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS checkpoints (
                thread_id     TEXT PRIMARY KEY,
                checkpoint_id TEXT NOT NULL,
                ts            TEXT NOT NULL,
                source        TEXT NOT NULL,
                step          INTEGER NOT NULL,
                state         BLOB NOT NULL
            )",
            [],
        )
        .map_err(|e| CheckpointError::Backend(e.to_string()))?;
        Ok(Self {
            conn: Mutex::new(conn),
            serializer: JsonSerializer,
            _state: PhantomData,
        })
    }
}

#[async_trait]
impl<S> Checkpointer<S> for SqliteSaver<S>
where
    S: Clone + Send + Sync + 'static + serde::Serialize + serde::de::DeserializeOwned,
{
    async fn load(&self, thread_id: &str) -> Result<Option<Checkpoint<S>>, CheckpointError> {
        let conn = self
            .conn
            .lock()
            .map_err(|_| CheckpointError::Backend("connection lock poisoned".into()))?;
        let row = conn
            .query_row(
                "SELECT checkpoint_id, ts, source, step, state
                 FROM checkpoints WHERE thread_id = ?1",
                params![thread_id],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, i64>(3)?,
                        row.get::<_, Vec<u8>>(4)?,
                    ))
                },
            )
            .optional()
            .map_err(|e| CheckpointError::Backend(e.to_string()))?;

        let Some((id, ts, source, step, bytes)) = row else {
            return Ok(None);
        };
        let state = self.serializer.deserialize(&bytes)?;
        let source = match source.as_str() {
            "input" => CheckpointSource::Input,
            _ => CheckpointSource::Step,
        };
        Ok(Some(Checkpoint {
            id,
            ts,
            state,
            metadata: CheckpointMetadata {
                source,
                step: step as u64,
                created_at: None,
            },
        }))
    }

    async fn save(
        &self,
        thread_id: &str,
        checkpoint: &Checkpoint<S>,
    ) -> Result<(), CheckpointError> {
        let bytes = self.serializer.serialize(&checkpoint.state)?;
        let conn = self
            .conn
            .lock()
            .map_err(|_| CheckpointError::Backend("connection lock poisoned".into()))?;
        conn.execute(
            "INSERT OR REPLACE INTO checkpoints
             (thread_id, checkpoint_id, ts, source, step, state)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                thread_id,
                checkpoint.id,
                checkpoint.ts,
                checkpoint.metadata.source.as_str(),
                checkpoint.metadata.step as i64,
                bytes
            ],
        )
        .map_err(|e| CheckpointError::Backend(e.to_string()))?;
        Ok(())
    }
}
