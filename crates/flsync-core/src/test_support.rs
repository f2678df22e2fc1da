//! Fixtures shared by unit tests

use crate::course::{
    shared, Course, CourseMode, Lesson, LessonId, LessonKind, SharedCourse, Task, TaskFile, TaskId,
};
use std::fs;
use std::path::Path;

pub const LESSON: &str = "lesson1";

/// Framework lesson `lesson1` with `tasks` tasks named `task1..` that all
/// declare `files`; task directories are created empty
pub fn framework_course(root: &Path, tasks: u32, files: &[&str]) -> SharedCourse {
    let mut lesson = Lesson::new(LessonId(1), LESSON, LessonKind::Framework);
    for i in 1..=tasks {
        let mut task = Task::new(TaskId(i), format!("task{}", i));
        for file in files {
            task = task.with_file(TaskFile::new(*file));
        }
        lesson = lesson.with_task(task);
        fs::create_dir_all(root.join(LESSON).join(format!("task{}", i))).unwrap();
    }
    shared(Course::new(root, CourseMode::Creator).with_lesson(lesson))
}

pub fn write_file(root: &Path, task: u32, path: &str, content: &str) {
    let full = root.join(LESSON).join(format!("task{}", task)).join(path);
    fs::create_dir_all(full.parent().unwrap()).unwrap();
    fs::write(full, content).unwrap();
}

pub fn read_file(root: &Path, task: u32, path: &str) -> Option<String> {
    fs::read_to_string(root.join(LESSON).join(format!("task{}", task)).join(path)).ok()
}

pub fn remove_file(root: &Path, task: u32, path: &str) {
    fs::remove_file(root.join(LESSON).join(format!("task{}", task)).join(path)).unwrap();
}
