//! Per-invocation state: configuration, course and manager

use crate::args::Cli;
use crate::console::{CliConsole, ConsoleNotifier};
use crate::merge_dialog::TerminalMergeResolver;
use anyhow::{Context, Result, bail};
use flsync_core::course::shared;
use flsync_core::{
    CancellingMergeResolver, FlsyncConfig, FrameworkLessonManager, MergeResolver, SharedCourse,
    SyncChangesTracker, TaskId, load_course, save_course,
};
use std::path::PathBuf;
use std::sync::Arc;

pub struct CliContext {
    pub config: FlsyncConfig,
    pub course: SharedCourse,
    pub course_path: PathBuf,
    pub manager: Arc<FrameworkLessonManager>,
    pub console: CliConsole,
}

impl CliContext {
    pub async fn open(cli: &Cli, config: FlsyncConfig) -> Result<Self> {
        let console = CliConsole::new(cli.verbose);
        let course = load_course(&cli.course)
            .with_context(|| format!("Failed to load course from {}", cli.course.display()))?;
        console.info(&format!(
            "Loaded {} lesson(s) from {}",
            course.lessons.len(),
            cli.course.display()
        ));
        let course = shared(course);

        let resolver: Arc<dyn MergeResolver> = if cli.non_interactive {
            Arc::new(CancellingMergeResolver)
        } else {
            Arc::new(TerminalMergeResolver)
        };
        let manager = FrameworkLessonManager::open(
            &config,
            course.clone(),
            resolver,
            Arc::new(ConsoleNotifier::new(console)),
        )
        .await
        .context("Failed to open framework lesson storage")?;

        Ok(Self {
            config,
            course,
            course_path: cli.course.clone(),
            manager: Arc::new(manager),
            console,
        })
    }

    /// Resolve `lesson/task` to a task of a framework lesson
    pub fn framework_task(&self, path: &str) -> Result<TaskId> {
        let course = self.course.read();
        let Some(task) = course.find_task(path) else {
            bail!("No task `{}` in the course", path);
        };
        let id = task.id;
        if !course.lesson_of(id).is_some_and(|l| l.is_framework()) {
            bail!("`{}` is not part of a framework lesson", path);
        }
        Ok(id)
    }

    pub fn require_creator_mode(&self) -> Result<()> {
        if !self.course.read().is_creator_mode() {
            bail!("The course is not in creator mode");
        }
        Ok(())
    }

    /// Tracker over this invocation's course; nothing runs until flushed
    pub fn tracker(&self) -> SyncChangesTracker {
        SyncChangesTracker::new(
            &self.config.sync_changes,
            self.course.clone(),
            self.manager.clone(),
            Arc::new(ConsoleNotifier::new(self.console)),
        )
    }

    pub fn save_course(&self) -> Result<()> {
        let course = self.course.read().clone();
        save_course(&course, &self.course_path)
            .with_context(|| format!("Failed to save course to {}", self.course_path.display()))
    }

    /// Flush the record table and close storage
    pub async fn close(self) -> Result<()> {
        self.manager
            .dispose()
            .await
            .context("Failed to close framework lesson storage")
    }
}
