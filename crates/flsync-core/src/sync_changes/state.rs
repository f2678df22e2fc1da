//! Sync-changes annotation values

use serde::{Deserialize, Serialize};
use std::fmt;

/// Annotation of a task file, task or lesson
///
/// Variants are ordered by severity so aggregation is a plain `max`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum SyncChangesState {
    #[default]
    None,
    /// Edited since the last baseline, propagation pending
    Info,
    /// Missing from the next task, propagation would orphan it
    Warning,
}

impl SyncChangesState {
    /// Most severe state among `states`, `None` for no states
    pub fn aggregate(states: impl IntoIterator<Item = SyncChangesState>) -> Self {
        states.into_iter().max().unwrap_or_default()
    }

    pub fn is_none(&self) -> bool {
        *self == Self::None
    }
}

impl fmt::Display for SyncChangesState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::Info => write!(f, "info"),
            Self::Warning => write!(f, "warning"),
        }
    }
}
