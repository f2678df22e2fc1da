//! In-memory record storage implementation

use crate::error::{FlError, FlResult};
use crate::state::TaskFileState;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;

use super::{RecordId, RecordStorage};

/// In-memory record storage (for tests and dry runs)
pub struct MemoryRecordStorage {
    records: RwLock<(u32, HashMap<u32, TaskFileState>)>,
    disposed: AtomicBool,
}

impl MemoryRecordStorage {
    /// Create a new in-memory storage
    pub fn new() -> Self {
        Self {
            records: RwLock::new((0, HashMap::new())),
            disposed: AtomicBool::new(false),
        }
    }

    fn check_open(&self) -> FlResult<()> {
        if self.disposed.load(Ordering::Acquire) {
            return Err(FlError::storage("Storage is disposed"));
        }
        Ok(())
    }
}

impl Default for MemoryRecordStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RecordStorage for MemoryRecordStorage {
    async fn get_state(&self, record: Option<RecordId>) -> FlResult<TaskFileState> {
        self.check_open()?;
        let Some(record) = record else {
            return Ok(TaskFileState::new());
        };
        let records = self.records.read().await;
        records
            .1
            .get(&record.0)
            .cloned()
            .ok_or_else(|| FlError::storage(format!("Unknown record {}", record)))
    }

    async fn update_state(
        &self,
        record: Option<RecordId>,
        state: &TaskFileState,
    ) -> FlResult<RecordId> {
        self.check_open()?;
        let mut records = self.records.write().await;
        let id = match record {
            Some(record) => record.0,
            None => {
                records.0 += 1;
                records.0
            }
        };
        records.1.insert(id, state.clone());
        Ok(RecordId(id))
    }

    async fn force(&self) -> FlResult<()> {
        self.check_open()
    }

    async fn dispose(&self) -> FlResult<()> {
        self.disposed.store(true, Ordering::Release);
        Ok(())
    }
}
