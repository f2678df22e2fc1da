//! Propagating changes along a framework lesson chain

use crate::course::{TaskFile, TaskId};
use crate::state::{capture_state, TaskFileState, UserChanges};
use tracing::{debug, error, info, warn};

use super::collaborators::{MergeOutcome, MergeRequest};
use super::types::{FrameworkLessonManager, PropagationOutcome, TaskLocation};

impl FrameworkLessonManager {
    /// Carry the edits made in `task` into every following task of its
    /// framework lesson
    ///
    /// Steps run in chain order; the source task's baseline is saved after
    /// each accepted step and the last task's baseline after the final one.
    /// Files created or deleted in a target are added to or removed from its
    /// file list. A cancelled merge, a missing task directory or a failed
    /// write stops the run: the failing target is reverted and later tasks
    /// and baselines are left untouched.
    ///
    /// # Panics
    ///
    /// If the course is not in creator mode or `task` does not belong to a
    /// framework lesson.
    pub async fn propagate_changes(&self, task: TaskId) -> PropagationOutcome {
        let (start_name, start, chain) = {
            let course = self.course.read();
            assert!(
                course.is_creator_mode(),
                "propagate_changes requires a course in creator mode"
            );
            let Some(lesson) = course.lesson_of(task).filter(|l| l.is_framework()) else {
                panic!("propagate_changes requires a task of a framework lesson");
            };
            let chain: Vec<TaskId> = lesson.tasks.iter().map(|t| t.id).collect();
            let start = lesson.chain_index(task).unwrap_or(chain.len());
            let name = lesson.task(task).map(|t| t.name.clone()).unwrap_or_default();
            (name, start, chain)
        };

        info!(
            "Propagating changes from `{}` to {} following task(s)",
            start_name,
            chain.len().saturating_sub(start)
        );

        for i in start..chain.len() {
            let (current, target) = (chain[i - 1], chain[i]);
            if !self.propagate_step(current, target).await {
                let cancelled_at = self.task_name(current);
                self.notifier.propagation_cancelled(&start_name, &cancelled_at);
                return PropagationOutcome::Cancelled { cancelled_at };
            }
            self.save_baseline(current).await;
        }

        if let Some(&last) = chain.last() {
            self.save_baseline(last).await;
        }

        self.notifier.propagation_succeeded(&start_name);
        PropagationOutcome::Completed {
            steps: chain.len().saturating_sub(start),
        }
    }

    /// One step of the chain; false stops the run
    async fn propagate_step(&self, current_id: TaskId, target_id: TaskId) -> bool {
        let (Some(current), Some(target)) = (self.locate(current_id), self.locate(target_id)) else {
            error!(
                "Failed to find task directory while propagating #{} to #{}",
                current_id, target_id
            );
            return false;
        };

        let previous_state = self.load_baseline(current_id, &current.name).await;
        let current_state = capture_state(&current.paths, &current.dir).await;
        let target_state = capture_state(&target.paths, &target.dir).await;

        // Files identical in the source task and its baseline are left to the
        // target as is. Removal from the target goes by path only.
        let unchanged = current_state.unchanged_paths(&previous_state);
        let current_state = current_state.without_paths(&unchanged);
        let previous_state = previous_state.without_paths(&unchanged);
        let target_state = target_state.without_paths(&unchanged);

        self.apply_changes(&current, &target, current_state, previous_state, target_state)
            .await
    }

    async fn apply_changes(
        &self,
        current: &TaskLocation,
        target: &TaskLocation,
        current_state: TaskFileState,
        base_state: TaskFileState,
        target_state: TaskFileState,
    ) -> bool {
        let resolution = self
            .strategy
            .resolve_conflicts(&current_state, &base_state, &target_state);
        let resolved_state = resolution.changes.applied(&base_state);
        let files_before = self.task_files(target.id);

        let write = UserChanges::calculate(&target_state, &resolved_state);
        debug!(
            "Writing {} change(s) from `{}` to `{}`",
            write.len(),
            current.name,
            target.name
        );
        if let Err(e) = write.apply_to_dir(&target.dir).await {
            error!("Failed to apply changes to `{}`: {}", target.name, e);
            let touched = resolved_state.paths().chain(target_state.paths());
            self.revert(target, touched, &target_state, files_before).await;
            return false;
        }
        self.register_changes(current.id, target.id, &write, &files_before);

        if resolution.all_resolved {
            return true;
        }

        let request = MergeRequest {
            current_state,
            resolved_state,
            target_state,
            base_state,
            current_task_name: current.name.clone(),
            target_task_name: target.name.clone(),
            task_dir: target.dir.clone(),
            conflicts: resolution.conflicts,
        };

        match self.merge_resolver.resolve(&request).await {
            MergeOutcome::Accepted(merged) => {
                let on_disk = capture_state(request.paths(), &target.dir).await;
                let changes = UserChanges::calculate(&on_disk, &merged);
                if let Err(e) = changes.apply_to_dir(&target.dir).await {
                    error!("Failed to write merge result to `{}`: {}", target.name, e);
                    self.revert(target, request.paths(), &request.target_state, files_before)
                        .await;
                    return false;
                }
                self.register_changes(current.id, target.id, &changes, &files_before);
                true
            }
            MergeOutcome::Cancelled => {
                warn!(
                    "Merge of `{}` into `{}` cancelled, reverting",
                    current.name, target.name
                );
                self.revert(
                    target,
                    request.resolved_state.paths(),
                    &request.target_state,
                    files_before,
                )
                .await;
                false
            }
        }
    }

    /// Put `paths` of the target back to `target_state` and restore its file list
    async fn revert<I, S>(
        &self,
        target: &TaskLocation,
        paths: I,
        target_state: &TaskFileState,
        files_before: Vec<TaskFile>,
    ) where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let on_disk = capture_state(paths, &target.dir).await;
        let revert = UserChanges::calculate(&on_disk, target_state);
        if let Err(e) = revert.apply_to_dir(&target.dir).await {
            error!("Failed to revert `{}`: {}", target.name, e);
        }
        if let Some(task) = self.course.write().task_mut(target.id) {
            task.files = files_before;
        }
    }

    fn task_files(&self, task: TaskId) -> Vec<TaskFile> {
        self.course
            .read()
            .task(task)
            .map(|t| t.files.clone())
            .unwrap_or_default()
    }

    /// Mirror the files created and deleted by `changes` in the target task's
    /// file list. New entries take their flags from the source task's file.
    fn register_changes(
        &self,
        source: TaskId,
        target: TaskId,
        changes: &UserChanges,
        files_before: &[TaskFile],
    ) {
        let mut course = self.course.write();
        for change in changes.iter() {
            let path = change.path();
            if change.is_deleted() {
                if course.remove_task_file(target, path).is_some() {
                    debug!("Removed `{}` from task #{}", path, target);
                }
                continue;
            }
            if course.task(target).is_some_and(|t| t.has_file(path)) {
                continue;
            }
            let file = course
                .task(source)
                .and_then(|t| t.file(path))
                .or_else(|| files_before.iter().find(|f| f.name == path))
                .cloned()
                .unwrap_or_else(|| TaskFile::new(path));
            debug!("Added `{}` to task #{}", path, target);
            course.add_task_file(target, file);
        }
    }
}
