//! Course, lesson, task and task file types

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Course shared between the host, the manager and the tracker
pub type SharedCourse = Arc<RwLock<Course>>;

/// Wrap a course for sharing
pub fn shared(course: Course) -> SharedCourse {
    Arc::new(RwLock::new(course))
}

/// Identifier of a task, unique within a course
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct TaskId(pub u32);

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a lesson, unique within a course
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct LessonId(pub u32);

impl std::fmt::Display for LessonId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Whether the course is opened by a learner or by its author
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CourseMode {
    #[default]
    Student,
    Creator,
}

/// Kind of lesson
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LessonKind {
    #[default]
    Regular,
    /// Tasks form a chain of progressive versions of one project
    Framework,
}

fn default_true() -> bool {
    true
}

/// A file belonging to a task
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskFile {
    /// Path relative to the task directory, `/`-separated
    pub name: String,
    #[serde(default = "default_true")]
    pub visible: bool,
    /// Cleared by the author to exclude the file from sync changes
    #[serde(default = "default_true")]
    pub propagatable: bool,
}

impl TaskFile {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            visible: true,
            propagatable: true,
        }
    }

    pub fn hidden(name: impl Into<String>) -> Self {
        Self {
            visible: false,
            ..Self::new(name)
        }
    }

    /// Only visible, non-excluded files take part in propagation
    pub fn is_propagatable(&self) -> bool {
        self.visible && self.propagatable
    }
}

/// A task in a lesson
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    #[serde(default)]
    pub id: TaskId,
    pub name: String,
    #[serde(default)]
    pub files: Vec<TaskFile>,
}

impl Task {
    pub fn new(id: TaskId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            files: Vec::new(),
        }
    }

    pub fn with_file(mut self, file: TaskFile) -> Self {
        self.files.push(file);
        self
    }

    pub fn file(&self, name: &str) -> Option<&TaskFile> {
        self.files.iter().find(|f| f.name == name)
    }

    pub fn file_mut(&mut self, name: &str) -> Option<&mut TaskFile> {
        self.files.iter_mut().find(|f| f.name == name)
    }

    pub fn has_file(&self, name: &str) -> bool {
        self.file(name).is_some()
    }

    /// Paths of the files that participate in propagation
    pub fn propagatable_paths(&self) -> Vec<String> {
        self.files
            .iter()
            .filter(|f| f.is_propagatable())
            .map(|f| f.name.clone())
            .collect()
    }
}

/// A lesson; framework lessons chain their tasks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lesson {
    #[serde(default)]
    pub id: LessonId,
    pub name: String,
    #[serde(default)]
    pub kind: LessonKind,
    #[serde(default)]
    pub tasks: Vec<Task>,
}

impl Lesson {
    pub fn new(id: LessonId, name: impl Into<String>, kind: LessonKind) -> Self {
        Self {
            id,
            name: name.into(),
            kind,
            tasks: Vec::new(),
        }
    }

    pub fn with_task(mut self, task: Task) -> Self {
        self.tasks.push(task);
        self
    }

    pub fn is_framework(&self) -> bool {
        self.kind == LessonKind::Framework
    }

    /// 1-based position of the task in the chain
    pub fn chain_index(&self, task: TaskId) -> Option<usize> {
        self.tasks.iter().position(|t| t.id == task).map(|i| i + 1)
    }

    pub fn task(&self, task: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == task)
    }

    pub fn next_task(&self, task: TaskId) -> Option<&Task> {
        let index = self.chain_index(task)?;
        self.tasks.get(index)
    }

    pub fn previous_task(&self, task: TaskId) -> Option<&Task> {
        let index = self.chain_index(task)?;
        index.checked_sub(2).and_then(|i| self.tasks.get(i))
    }

    pub fn is_last(&self, task: TaskId) -> bool {
        self.tasks.last().is_some_and(|t| t.id == task)
    }
}

/// A course: an ordered list of lessons rooted at a directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    #[serde(default)]
    pub mode: CourseMode,
    #[serde(default)]
    pub lessons: Vec<Lesson>,
    #[serde(skip)]
    pub root: PathBuf,
}

impl Course {
    pub fn new(root: impl Into<PathBuf>, mode: CourseMode) -> Self {
        Self {
            mode,
            lessons: Vec::new(),
            root: root.into(),
        }
    }

    pub fn with_lesson(mut self, lesson: Lesson) -> Self {
        self.lessons.push(lesson);
        self
    }

    pub fn is_creator_mode(&self) -> bool {
        self.mode == CourseMode::Creator
    }

    /// Give every lesson and task without an id a fresh one
    pub fn assign_ids(&mut self) {
        let mut next_lesson = self.lessons.iter().map(|l| l.id.0).max().unwrap_or(0);
        let mut next_task = self
            .lessons
            .iter()
            .flat_map(|l| &l.tasks)
            .map(|t| t.id.0)
            .max()
            .unwrap_or(0);

        for lesson in &mut self.lessons {
            if lesson.id.0 == 0 {
                next_lesson += 1;
                lesson.id = LessonId(next_lesson);
            }
            for task in &mut lesson.tasks {
                if task.id.0 == 0 {
                    next_task += 1;
                    task.id = TaskId(next_task);
                }
            }
        }
    }

    pub fn lesson(&self, lesson: LessonId) -> Option<&Lesson> {
        self.lessons.iter().find(|l| l.id == lesson)
    }

    pub fn lesson_of(&self, task: TaskId) -> Option<&Lesson> {
        self.lessons.iter().find(|l| l.task(task).is_some())
    }

    pub fn task(&self, task: TaskId) -> Option<&Task> {
        self.lessons.iter().find_map(|l| l.task(task))
    }

    pub fn task_mut(&mut self, task: TaskId) -> Option<&mut Task> {
        self.lessons
            .iter_mut()
            .flat_map(|l| l.tasks.iter_mut())
            .find(|t| t.id == task)
    }

    pub fn framework_lessons(&self) -> impl Iterator<Item = &Lesson> {
        self.lessons.iter().filter(|l| l.is_framework())
    }

    /// Find a task by `lesson/task` path
    pub fn find_task(&self, path: &str) -> Option<&Task> {
        let (lesson_name, task_name) = path.trim_matches('/').split_once('/')?;
        self.lessons
            .iter()
            .find(|l| l.name == lesson_name)?
            .tasks
            .iter()
            .find(|t| t.name == task_name)
    }

    /// Task directory on disk, `None` when it does not exist
    pub fn task_dir(&self, task: TaskId) -> Option<PathBuf> {
        let lesson = self.lesson_of(task)?;
        let task = lesson.task(task)?;
        let dir = self.root.join(&lesson.name).join(&task.name);
        dir.is_dir().then_some(dir)
    }

    /// Course root
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Register a new file in a task; returns false if it already existed
    pub fn add_task_file(&mut self, task: TaskId, file: TaskFile) -> bool {
        match self.task_mut(task) {
            Some(t) if !t.has_file(&file.name) => {
                t.files.push(file);
                true
            }
            _ => false,
        }
    }

    /// Remove a file from a task
    pub fn remove_task_file(&mut self, task: TaskId, name: &str) -> Option<TaskFile> {
        let t = self.task_mut(task)?;
        let index = t.files.iter().position(|f| f.name == name)?;
        Some(t.files.remove(index))
    }

    /// Rename every file at `from` or below the `from/` directory to live under `to`
    pub fn move_task_files(&mut self, task: TaskId, from: &str, to: &str) -> usize {
        let Some(t) = self.task_mut(task) else {
            return 0;
        };
        let prefix = format!("{}/", from);
        let mut moved = 0;
        for file in &mut t.files {
            if file.name == from {
                file.name = to.to_string();
                moved += 1;
            } else if let Some(rest) = file.name.strip_prefix(&prefix) {
                file.name = format!("{}/{}", to, rest);
                moved += 1;
            }
        }
        moved
    }

    /// Toggle the sync-changes participation of a file
    pub fn set_file_propagatable(&mut self, task: TaskId, name: &str, propagatable: bool) -> bool {
        match self.task_mut(task).and_then(|t| t.file_mut(name)) {
            Some(file) => {
                file.propagatable = propagatable;
                true
            }
            None => false,
        }
    }
}
