//! Framework lesson sync core
//!
//! Propagates course-author edits along the task chain of a framework
//! lesson, resolving conflicts against tasks that diverged, and keeps the
//! sync-changes annotations telling the author which files still need
//! propagating.

pub mod config;
pub mod conflict;
pub mod course;
pub mod error;
pub mod framework;
pub mod state;
pub mod storage;
pub mod sync_changes;

#[cfg(test)]
mod test_support;

// Re-export commonly used types
pub use config::{load_config, FlsyncConfig, LogFormat, LoggingConfig, SyncChangesConfig};
pub use conflict::{ConflictResolution, ConflictResolveStrategy, SimpleConflictResolveStrategy};
pub use course::{load_course, save_course, Course, Lesson, LessonId, SharedCourse, Task, TaskFile, TaskId};
pub use error::{FlError, FlResult};
pub use framework::{
    CancellingMergeResolver, FrameworkLessonManager, LogNotifier, MergeOutcome, MergeRequest,
    MergeResolver, ProjectNotifier, PropagationOutcome,
};
pub use state::{capture_state, TaskFileState, UserChange, UserChanges};
pub use storage::{FileRecordStorage, MemoryRecordStorage, RecordId, RecordStorage};
pub use sync_changes::{SyncChangesState, SyncChangesTracker};
