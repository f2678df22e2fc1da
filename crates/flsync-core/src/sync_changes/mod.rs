//! Sync-changes state tracking
//!
//! Annotates task files, tasks and lessons of author-mode framework lessons
//! with whether their edits still need propagating ([`SyncChangesState::Info`])
//! or would orphan a file in the next task ([`SyncChangesState::Warning`]).
//! Triggers only enqueue work; a debounced consumer recomputes the caches.

mod queue;
mod state;
mod tracker;

#[cfg(test)]
mod tests;

pub use queue::{SyncUpdate, UpdateQueue};
pub use state::SyncChangesState;
pub use tracker::SyncChangesTracker;
