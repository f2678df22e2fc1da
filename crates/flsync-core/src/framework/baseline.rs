//! Baseline bookkeeping for framework lesson tasks

use crate::course::TaskId;
use crate::error::FlResult;
use crate::state::{capture_state, TaskFileState, UserChanges};
use crate::storage::RecordId;
use tracing::{debug, error};

use super::types::FrameworkLessonManager;

impl FrameworkLessonManager {
    /// Last saved state of `task`, empty if none was saved or it cannot be read
    pub async fn baseline(&self, task: TaskId) -> TaskFileState {
        let name = self.task_name(task);
        self.load_baseline(task, &name).await
    }

    pub(super) async fn load_baseline(&self, task: TaskId, task_name: &str) -> TaskFileState {
        match self.storage.get_state(self.record(task)).await {
            Ok(state) => state,
            Err(e) => {
                error!("Failed to get user changes for task `{}`: {}", task_name, e);
                TaskFileState::new()
            }
        }
    }

    /// Capture the propagatable files of `task` from disk and store them as
    /// its new baseline
    ///
    /// Storage failures are logged; the previous record is returned then.
    pub async fn save_baseline(&self, task: TaskId) -> Option<RecordId> {
        let Some(location) = self.locate(task) else {
            error!("Failed to find task directory for task #{}", task);
            return self.record(task);
        };
        let state = capture_state(&location.paths, &location.dir).await;
        self.update_record(task, &location.name, &state).await
    }

    /// Propagatable files of `task` created or modified since its baseline
    pub async fn changed_files(&self, task: TaskId) -> Vec<String> {
        let Some(location) = self.locate(task) else {
            return Vec::new();
        };
        let baseline = self.load_baseline(task, &location.name).await;
        let current = capture_state(&location.paths, &location.dir).await;

        UserChanges::calculate(&baseline, &current)
            .iter()
            .filter(|change| !change.is_deleted())
            .map(|change| change.path().to_string())
            .collect()
    }

    /// Flush the record table and release the record store
    pub async fn dispose(&self) -> FlResult<()> {
        let _guard = self.write_lock.lock().await;
        self.persist_records().await?;
        self.storage.dispose().await
    }

    async fn update_record(
        &self,
        task: TaskId,
        task_name: &str,
        state: &TaskFileState,
    ) -> Option<RecordId> {
        let _guard = self.write_lock.lock().await;
        let previous = self.record(task);

        let stored = match self.storage.update_state(previous, state).await {
            Ok(record) => self.storage.force().await.map(|_| record),
            Err(e) => Err(e),
        };

        match stored {
            Ok(record) => {
                let changed = self.records.write().set(task, record);
                if changed {
                    if let Err(e) = self.persist_records().await {
                        error!("Failed to save record table: {}", e);
                    }
                }
                debug!("Saved baseline of `{}` in record {}", task_name, record);
                Some(record)
            }
            Err(e) => {
                error!("Failed to save user changes for task `{}`: {}", task_name, e);
                previous
            }
        }
    }

    async fn persist_records(&self) -> FlResult<()> {
        let Some(path) = &self.records_path else {
            return Ok(());
        };
        let table = self.records.read().clone();
        table.save(path).await
    }
}
