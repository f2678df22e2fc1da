//! Conflict resolution between a task's edits and its successor
//!
//! A strategy receives three states restricted to the paths relevant for
//! one propagation step:
//! - `current`: the source task's files as edited now
//! - `base`: the source task's stored baseline
//! - `target`: the successor task's files on disk
//!
//! It returns the changes to apply on top of `base` to obtain the state the
//! successor should have, and whether every path could be decided.

mod simple;

#[cfg(test)]
mod tests;

pub use simple::SimpleConflictResolveStrategy;

use crate::state::{TaskFileState, UserChanges};

/// Outcome of a conflict resolution pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConflictResolution {
    /// False when at least one path needs manual merging
    pub all_resolved: bool,
    /// Changes relative to `base`; conflicting paths keep their base content
    pub changes: UserChanges,
    /// Paths left for manual merging
    pub conflicts: Vec<String>,
}

/// Strategy deciding how edits are carried into the next task
pub trait ConflictResolveStrategy: Send + Sync {
    fn resolve_conflicts(
        &self,
        current: &TaskFileState,
        base: &TaskFileState,
        target: &TaskFileState,
    ) -> ConflictResolution;
}
