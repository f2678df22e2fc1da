//! Task file states and the changes between them
//!
//! A [`TaskFileState`] maps task-relative paths to file contents. States are
//! captured from disk on demand, diffed into [`UserChanges`] and applied back
//! either to another state or to a task directory.

mod capture;
mod changes;
mod snapshot;


pub use capture::capture_state;
pub use changes::{UserChange, UserChanges};
pub use snapshot::TaskFileState;
