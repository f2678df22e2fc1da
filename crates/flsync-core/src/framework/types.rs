//! Framework lesson manager types and construction

use crate::config::FlsyncConfig;
use crate::conflict::{ConflictResolveStrategy, SimpleConflictResolveStrategy};
use crate::course::{SharedCourse, TaskId};
use crate::error::FlResult;
use crate::storage::{FileRecordStorage, RecordId, RecordStorage, RecordTable};
use parking_lot::RwLock;
use std::path::PathBuf;
use std::sync::Arc;

use super::collaborators::{MergeResolver, ProjectNotifier};

/// File name of the record log inside the storage directory
pub const STORAGE_FILE: &str = "storage";
/// File name of the task to record mapping inside the storage directory
pub const RECORD_TABLE_FILE: &str = "records.json";

/// Result of a propagation run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropagationOutcome {
    /// Every successor was updated and all baselines were saved
    Completed { steps: usize },
    /// The run stopped at the step whose source task is `cancelled_at`
    Cancelled { cancelled_at: String },
}

impl PropagationOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed { .. })
    }
}

/// A task resolved against the course and the file system
#[derive(Debug, Clone)]
pub(super) struct TaskLocation {
    pub id: TaskId,
    pub name: String,
    pub dir: PathBuf,
    pub paths: Vec<String>,
}

/// Propagates changes along framework lesson chains and owns their baselines
pub struct FrameworkLessonManager {
    pub(super) course: SharedCourse,
    pub(super) storage: Arc<dyn RecordStorage>,
    pub(super) records: RwLock<RecordTable>,
    pub(super) records_path: Option<PathBuf>,
    pub(super) strategy: Arc<dyn ConflictResolveStrategy>,
    pub(super) merge_resolver: Arc<dyn MergeResolver>,
    pub(super) notifier: Arc<dyn ProjectNotifier>,
    /// Serializes every baseline write of this manager
    pub(super) write_lock: tokio::sync::Mutex<()>,
}

impl FrameworkLessonManager {
    /// Open the manager with the file-backed record store from `config`
    pub async fn open(
        config: &FlsyncConfig,
        course: SharedCourse,
        merge_resolver: Arc<dyn MergeResolver>,
        notifier: Arc<dyn ProjectNotifier>,
    ) -> FlResult<Self> {
        let storage_dir = config.storage_dir(&course.read().root);
        let storage = FileRecordStorage::open(storage_dir.join(STORAGE_FILE)).await?;
        let records_path = storage_dir.join(RECORD_TABLE_FILE);
        let records = RecordTable::load(&records_path).await?;

        tracing::info!(
            "Framework lesson storage at {:?} ({} task baselines)",
            storage_dir,
            records.len()
        );

        Ok(Self {
            course,
            storage: Arc::new(storage),
            records: RwLock::new(records),
            records_path: Some(records_path),
            strategy: Arc::new(SimpleConflictResolveStrategy),
            merge_resolver,
            notifier,
            write_lock: tokio::sync::Mutex::new(()),
        })
    }

    /// Create with custom storage; the record table lives in memory only
    pub fn with_storage(
        course: SharedCourse,
        storage: Arc<dyn RecordStorage>,
        merge_resolver: Arc<dyn MergeResolver>,
        notifier: Arc<dyn ProjectNotifier>,
    ) -> Self {
        Self {
            course,
            storage,
            records: RwLock::new(RecordTable::default()),
            records_path: None,
            strategy: Arc::new(SimpleConflictResolveStrategy),
            merge_resolver,
            notifier,
            write_lock: tokio::sync::Mutex::new(()),
        }
    }

    /// Replace the conflict resolution strategy
    pub fn with_strategy(mut self, strategy: Arc<dyn ConflictResolveStrategy>) -> Self {
        self.strategy = strategy;
        self
    }

    /// The course this manager works on
    pub fn course(&self) -> &SharedCourse {
        &self.course
    }

    /// Record currently holding the baseline of `task`
    pub fn record(&self, task: TaskId) -> Option<RecordId> {
        self.records.read().get(task)
    }

    pub(super) fn task_name(&self, task: TaskId) -> String {
        self.course
            .read()
            .task(task)
            .map(|t| t.name.clone())
            .unwrap_or_else(|| format!("#{}", task))
    }

    /// Resolve a task's directory and propagatable files
    pub(super) fn locate(&self, task: TaskId) -> Option<TaskLocation> {
        let course = self.course.read();
        let t = course.task(task)?;
        let dir = course.task_dir(task)?;
        Some(TaskLocation {
            id: task,
            name: t.name.clone(),
            dir,
            paths: t.propagatable_paths(),
        })
    }
}
