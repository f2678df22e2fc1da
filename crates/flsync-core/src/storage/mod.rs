//! Persistent record store for task baselines
//!
//! A record is an opaque integer handle to the last saved [`TaskFileState`]
//! of one task. Updating a record supersedes its previous content; records
//! are never deleted.

use crate::error::FlResult;
use crate::state::TaskFileState;
use async_trait::async_trait;

mod encoding;
mod file_storage;
mod memory_storage;
mod record;
mod record_table;


pub use file_storage::FileRecordStorage;
pub use memory_storage::MemoryRecordStorage;
pub use record::RecordId;
pub use record_table::RecordTable;

/// Trait for record storage backends
#[async_trait]
pub trait RecordStorage: Send + Sync {
    /// Load the state stored under `record`; `None` yields an empty state
    async fn get_state(&self, record: Option<RecordId>) -> FlResult<TaskFileState>;

    /// Store `state`, superseding `record` or allocating a new one
    async fn update_state(
        &self,
        record: Option<RecordId>,
        state: &TaskFileState,
    ) -> FlResult<RecordId>;

    /// Flush pending writes to durable storage
    async fn force(&self) -> FlResult<()>;

    /// Flush and close; the storage is unusable afterwards
    async fn dispose(&self) -> FlResult<()>;
}
