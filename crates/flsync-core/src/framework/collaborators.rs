//! Collaborators consumed by the manager: merge dialog and notifications

use crate::state::TaskFileState;
use async_trait::async_trait;
use std::collections::BTreeSet;
use std::path::PathBuf;

/// Everything a merge dialog needs to settle the conflicts of one step
#[derive(Debug, Clone)]
pub struct MergeRequest {
    /// Source task's edited files
    pub current_state: TaskFileState,
    /// Automatically resolved state, already written to the target task
    pub resolved_state: TaskFileState,
    /// Target task's files before this step
    pub target_state: TaskFileState,
    /// Source task's baseline, used to tell additions from deletions
    pub base_state: TaskFileState,
    pub current_task_name: String,
    pub target_task_name: String,
    pub task_dir: PathBuf,
    /// Paths the strategy could not decide
    pub conflicts: Vec<String>,
}

impl MergeRequest {
    /// Every path the merge may touch
    pub fn paths(&self) -> BTreeSet<String> {
        self.current_state
            .paths()
            .chain(self.resolved_state.paths())
            .chain(self.target_state.paths())
            .map(str::to_string)
            .collect()
    }
}

/// Answer of a merge dialog
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeOutcome {
    /// Final content of the target task for [`MergeRequest::paths`];
    /// paths missing from the state are deleted
    Accepted(TaskFileState),
    Cancelled,
}

/// Interactive three-way merge, blocks until the user answers
#[async_trait]
pub trait MergeResolver: Send + Sync {
    async fn resolve(&self, request: &MergeRequest) -> MergeOutcome;
}

/// Resolver that cancels every merge
#[derive(Debug, Clone, Copy, Default)]
pub struct CancellingMergeResolver;

#[async_trait]
impl MergeResolver for CancellingMergeResolver {
    async fn resolve(&self, request: &MergeRequest) -> MergeOutcome {
        tracing::warn!(
            "Conflicts between `{}` and `{}` need manual merging: {:?}",
            request.current_task_name,
            request.target_task_name,
            request.conflicts
        );
        MergeOutcome::Cancelled
    }
}

/// Fire-and-forget UI notifications
#[cfg_attr(test, mockall::automock)]
pub trait ProjectNotifier: Send + Sync {
    fn propagation_succeeded(&self, start_task: &str);
    fn propagation_cancelled(&self, start_task: &str, cancelled_task: &str);
    fn refresh_project_view(&self);
}

/// Notifier that only logs
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl ProjectNotifier for LogNotifier {
    fn propagation_succeeded(&self, start_task: &str) {
        tracing::info!("Changes from `{}` applied to the following tasks", start_task);
    }

    fn propagation_cancelled(&self, start_task: &str, cancelled_task: &str) {
        tracing::warn!(
            "Applying changes from `{}` was canceled at `{}`",
            start_task,
            cancelled_task
        );
    }

    fn refresh_project_view(&self) {
        tracing::trace!("Sync changes state refreshed");
    }
}
