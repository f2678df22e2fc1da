//! Course model consumed by the propagation engine
//!
//! The engine only reads this model; hosts mutate it (file created, moved,
//! propagation flag toggled) and then notify the sync-changes tracker.

mod loader;
mod types;

#[cfg(test)]
mod tests;

pub use loader::{load_course, save_course};
pub use types::{
    Course, CourseMode, Lesson, LessonId, LessonKind, SharedCourse, Task, TaskFile, TaskId,
    shared,
};
