//! Sync-changes tracker: triggers, recomputation and cached states

use crate::config::SyncChangesConfig;
use crate::course::{Lesson, LessonId, SharedCourse, TaskId};
use crate::framework::{FrameworkLessonManager, ProjectNotifier, PropagationOutcome};
use dashmap::DashMap;
use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use super::queue::{SyncUpdate, UpdateQueue};
use super::state::SyncChangesState;

/// Project-scoped cache of sync-changes annotations
///
/// Only `Info` and `Warning` are cached; anything absent reads as
/// [`SyncChangesState::None`].
pub struct SyncChangesTracker {
    course: SharedCourse,
    pub(super) manager: Arc<FrameworkLessonManager>,
    notifier: Arc<dyn ProjectNotifier>,
    enabled: bool,
    file_states: DashMap<(TaskId, String), SyncChangesState>,
    task_states: DashMap<TaskId, SyncChangesState>,
    lesson_states: DashMap<LessonId, SyncChangesState>,
    pub(super) queue: UpdateQueue<SyncUpdate>,
    /// Serializes recomputation passes
    processing: tokio::sync::Mutex<()>,
    cancel: CancellationToken,
}

impl SyncChangesTracker {
    pub fn new(
        config: &SyncChangesConfig,
        course: SharedCourse,
        manager: Arc<FrameworkLessonManager>,
        notifier: Arc<dyn ProjectNotifier>,
    ) -> Self {
        Self {
            course,
            manager,
            notifier,
            enabled: config.enabled,
            file_states: DashMap::new(),
            task_states: DashMap::new(),
            lesson_states: DashMap::new(),
            queue: UpdateQueue::new(config.merging_delay),
            processing: tokio::sync::Mutex::new(()),
            cancel: CancellationToken::new(),
        }
    }

    /// Spawn the debounced consumer loop
    pub fn start(self: &Arc<Self>) -> JoinHandle<()> {
        let tracker = Arc::clone(self);
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = tracker.cancel.cancelled() => break,
                    _ = tracker.queue.settled() => tracker.flush().await,
                }
            }
            debug!("Sync changes tracker stopped");
        })
    }

    /// Stop the consumer loop; pending updates stay queued
    pub fn shutdown(&self) {
        self.cancel.cancel();
    }

    /// Process every queued update now
    pub async fn flush(&self) {
        let _guard = self.processing.lock().await;
        loop {
            let updates = self.queue.take();
            if updates.is_empty() {
                break;
            }
            trace!("Processing {} sync changes update(s)", updates.len());
            for update in updates {
                self.process(update).await;
            }
        }
    }

    pub fn pending_updates(&self) -> usize {
        self.queue.len()
    }

    pub fn file_state(&self, task: TaskId, path: &str) -> Option<SyncChangesState> {
        let lesson = self.course.read().lesson_of(task).map(|l| l.id)?;
        if !self.is_tracked(lesson) {
            return None;
        }
        Some(
            self.file_states
                .get(&(task, path.to_string()))
                .map(|s| *s)
                .unwrap_or_default(),
        )
    }

    pub fn task_state(&self, task: TaskId) -> Option<SyncChangesState> {
        let lesson = self.course.read().lesson_of(task).map(|l| l.id)?;
        if !self.is_tracked(lesson) {
            return None;
        }
        Some(self.task_states.get(&task).map(|s| *s).unwrap_or_default())
    }

    pub fn lesson_state(&self, lesson: LessonId) -> Option<SyncChangesState> {
        if !self.is_tracked(lesson) {
            return None;
        }
        Some(self.lesson_states.get(&lesson).map(|s| *s).unwrap_or_default())
    }

    pub fn task_file_changed(&self, task: TaskId, path: &str) {
        self.queue_files(task, Some(BTreeSet::from([path.to_string()])));
    }

    pub fn task_file_created(&self, task: TaskId, path: &str) {
        self.files_created(task, vec![path.to_string()]);
    }

    /// Files already removed from the model of `task`
    pub fn files_deleted(&self, task: TaskId, paths: &[String]) {
        self.queue_files(task, Some(paths.iter().cloned().collect()));
        self.queue_previous_task(task, Some(paths));
    }

    /// `task` was removed from `lesson`, where it sat at chain `index`
    pub fn task_deleted(&self, lesson: LessonId, task: TaskId, index: usize) {
        self.file_states.retain(|(t, _), _| *t != task);
        self.task_states.remove(&task);

        let previous = {
            let course = self.course.read();
            course
                .lesson(lesson)
                .and_then(|l| index.checked_sub(2).and_then(|i| l.tasks.get(i)))
                .map(|t| t.id)
        };
        match previous {
            Some(previous) => self.queue_files(previous, None),
            None => self.queue_lesson(lesson),
        }
    }

    /// A file or directory moved from `old_path` in `old_task` to `new_path`
    /// in `new_task`; the course model already reflects the move
    pub fn file_moved(
        &self,
        old_task: TaskId,
        old_path: &str,
        new_task: TaskId,
        new_path: &str,
        is_directory: bool,
    ) {
        let (new_paths, old_paths) = {
            let course = self.course.read();
            let Some(task) = course.task(new_task) else {
                return;
            };
            if is_directory {
                let prefix = format!("{}/", new_path.trim_end_matches('/'));
                let old_dir = old_path.trim_end_matches('/');
                task.files
                    .iter()
                    .filter_map(|f| f.name.strip_prefix(&prefix).map(|rel| (f.name.clone(), rel)))
                    .map(|(name, rel)| (name, format!("{}/{}", old_dir, rel)))
                    .unzip::<_, _, Vec<_>, Vec<_>>()
            } else if task.has_file(new_path) {
                (vec![new_path.to_string()], vec![old_path.to_string()])
            } else {
                (Vec::new(), Vec::new())
            }
        };

        debug!(
            "Moved {} task file(s) from #{} to #{}",
            new_paths.len(),
            old_task,
            new_task
        );
        self.files_deleted(old_task, &old_paths);
        self.files_created(new_task, new_paths);
    }

    /// Toggle whether `path` takes part in propagation
    pub fn set_file_propagatable(&self, task: TaskId, path: &str, propagatable: bool) -> bool {
        let updated = self
            .course
            .write()
            .set_file_propagatable(task, path, propagatable);
        if updated {
            self.task_file_changed(task, path);
        }
        updated
    }

    /// Propagate through the manager, then recompute the whole lesson
    ///
    /// Propagation rewrites files and file lists of every following task, so
    /// the lesson is re-queued whether the run completed or was cancelled.
    pub async fn propagate_changes(&self, task: TaskId) -> PropagationOutcome {
        let outcome = self.manager.propagate_changes(task).await;
        if let Some(lesson) = self.lesson_of(task) {
            self.queue_lesson(lesson);
        }
        outcome
    }

    pub fn update_course(&self) {
        let lessons: Vec<LessonId> = self
            .course
            .read()
            .framework_lessons()
            .map(|l| l.id)
            .collect();
        for lesson in lessons {
            self.queue_lesson(lesson);
        }
    }

    pub fn update_lesson(&self, lesson: LessonId) {
        self.queue_lesson(lesson);
    }

    pub fn update_task(&self, task: TaskId) {
        self.queue_files(task, None);
    }

    pub fn update_task_files(&self, task: TaskId, paths: &[String]) {
        self.queue_files(task, Some(paths.iter().cloned().collect()));
    }

    fn is_tracked(&self, lesson: LessonId) -> bool {
        let course = self.course.read();
        self.enabled
            && course.is_creator_mode()
            && course.lesson(lesson).is_some_and(Lesson::is_framework)
    }

    fn lesson_of(&self, task: TaskId) -> Option<LessonId> {
        self.course.read().lesson_of(task).map(|l| l.id)
    }

    // The previous task's warnings depend on this task's file set
    fn files_created(&self, task: TaskId, paths: Vec<String>) {
        self.queue_files(task, Some(paths.iter().cloned().collect()));
        self.queue_previous_task(task, Some(&paths));
    }

    fn queue_previous_task(&self, task: TaskId, paths: Option<&[String]>) {
        let matching = {
            let course = self.course.read();
            let Some(previous) = course.lesson_of(task).and_then(|l| l.previous_task(task)) else {
                return;
            };
            let files = paths.map(|paths| {
                previous
                    .files
                    .iter()
                    .filter(|f| paths.contains(&f.name))
                    .map(|f| f.name.clone())
                    .collect::<BTreeSet<_>>()
            });
            (previous.id, files)
        };
        self.queue_files(matching.0, matching.1);
    }

    fn queue_files(&self, task: TaskId, files: Option<BTreeSet<String>>) {
        let Some(lesson) = self.lesson_of(task) else {
            return;
        };
        if !self.is_tracked(lesson) {
            return;
        }
        self.queue.queue(SyncUpdate::TaskFiles { task, files });
        self.queue.queue(SyncUpdate::Task(task));
        self.queue.queue(SyncUpdate::Lesson(lesson));
        self.queue.queue(SyncUpdate::Project);
    }

    fn queue_lesson(&self, lesson: LessonId) {
        if !self.is_tracked(lesson) {
            return;
        }
        let tasks: Vec<TaskId> = {
            let course = self.course.read();
            course
                .lesson(lesson)
                .map(|l| l.tasks.iter().map(|t| t.id).collect())
                .unwrap_or_default()
        };
        for task in tasks {
            self.queue.queue(SyncUpdate::TaskFiles { task, files: None });
            self.queue.queue(SyncUpdate::Task(task));
        }
        self.queue.queue(SyncUpdate::Lesson(lesson));
        self.queue.queue(SyncUpdate::Project);
    }

    async fn process(&self, update: SyncUpdate) {
        match update {
            SyncUpdate::TaskFiles { task, files } => self.recalc_files(task, files).await,
            SyncUpdate::Task(task) => self.collect_task_state(task),
            SyncUpdate::Lesson(lesson) => self.collect_lesson_state(lesson),
            SyncUpdate::Project => self.notifier.refresh_project_view(),
        }
    }

    async fn recalc_files(&self, task: TaskId, files: Option<BTreeSet<String>>) {
        let plan = {
            let course = self.course.read();
            let lesson = course.lesson_of(task);
            let model = lesson.and_then(|l| l.task(task));
            match (lesson, model) {
                (Some(lesson), Some(model)) => {
                    let all = files.is_none();
                    let names: Vec<String> = match files {
                        Some(files) => files.into_iter().collect(),
                        None => model.files.iter().map(|f| f.name.clone()).collect(),
                    };
                    let is_last = lesson.is_last(task);
                    let next = lesson.next_task(task);
                    let (warnings, others): (Vec<String>, Vec<String>) = names
                        .iter()
                        .filter(|name| {
                            !is_last && model.file(name).is_some_and(|f| f.is_propagatable())
                        })
                        .cloned()
                        .partition(|name| next.is_some_and(|n| !n.has_file(name)));
                    let known: HashSet<String> =
                        model.files.iter().map(|f| f.name.clone()).collect();
                    Some((all, names, known, warnings, others))
                }
                _ => None,
            }
        };

        let Some((all, names, known, warnings, others)) = plan else {
            self.file_states.retain(|(t, _), _| *t != task);
            return;
        };

        if all {
            self.file_states
                .retain(|(t, path), _| *t != task || known.contains(path));
        }
        for name in names {
            self.file_states.remove(&(task, name));
        }
        for name in warnings {
            self.file_states.insert((task, name), SyncChangesState::Warning);
        }
        if others.is_empty() {
            return;
        }

        let changed: HashSet<String> = self.manager.changed_files(task).await.into_iter().collect();
        for name in others {
            if changed.contains(&name) {
                self.file_states.insert((task, name), SyncChangesState::Info);
            }
        }
    }

    fn collect_task_state(&self, task: TaskId) {
        let states: Vec<SyncChangesState> = {
            let course = self.course.read();
            let Some(lesson) = course.lesson_of(task) else {
                self.task_states.remove(&task);
                return;
            };
            let Some(model) = lesson.task(task) else {
                return;
            };
            if lesson.is_last(task) {
                Vec::new()
            } else {
                model
                    .files
                    .iter()
                    .filter(|f| f.is_propagatable())
                    .filter_map(|f| self.file_states.get(&(task, f.name.clone())).map(|s| *s))
                    .collect()
            }
        };
        store(&self.task_states, task, SyncChangesState::aggregate(states));
    }

    fn collect_lesson_state(&self, lesson: LessonId) {
        let states: Vec<SyncChangesState> = {
            let course = self.course.read();
            let Some(model) = course.lesson(lesson) else {
                self.lesson_states.remove(&lesson);
                return;
            };
            model
                .tasks
                .iter()
                .filter_map(|t| self.task_states.get(&t.id).map(|s| *s))
                .collect()
        };
        store(&self.lesson_states, lesson, SyncChangesState::aggregate(states));
    }
}

fn store<K: Eq + std::hash::Hash>(cache: &DashMap<K, SyncChangesState>, key: K, state: SyncChangesState) {
    if state.is_none() {
        cache.remove(&key);
    } else {
        cache.insert(key, state);
    }
}
