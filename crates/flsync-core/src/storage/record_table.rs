//! Task to record mapping owned by the framework lesson manager

use crate::course::TaskId;
use crate::error::{FlResult, ResultExt};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tokio::fs;

use super::RecordId;

/// Which record holds the baseline of which task
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordTable {
    records: BTreeMap<TaskId, RecordId>,
}

impl RecordTable {
    pub fn get(&self, task: TaskId) -> Option<RecordId> {
        self.records.get(&task).copied()
    }

    /// Returns true when the mapping changed
    pub fn set(&mut self, task: TaskId, record: RecordId) -> bool {
        self.records.insert(task, record) != Some(record)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Load the table from `path`; a missing file yields an empty table
    pub async fn load(path: &Path) -> FlResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read(path)
            .await
            .storage_context(format!("Failed to read record table {:?}", path))?;
        serde_json::from_slice(&content).storage_context("Failed to parse record table")
    }

    /// Persist the table to `path` atomically
    pub async fn save(&self, path: &Path) -> FlResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .await
                .storage_context("Failed to create record table directory")?;
        }
        let json = serde_json::to_vec_pretty(self).storage_context("Failed to serialize record table")?;
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, json)
            .await
            .storage_context("Failed to write record table")?;
        fs::rename(&tmp, path)
            .await
            .storage_context("Failed to replace record table")
    }
}
