//! Three-way resolution by content equality

use std::collections::BTreeSet;

use super::{ConflictResolution, ConflictResolveStrategy};
use crate::state::{TaskFileState, UserChanges};

/// Takes whichever side changed relative to the base
///
/// For every path the current, base and target contents are compared
/// (absence counts as a distinct value):
/// - current equals target: nothing to merge, keep it
/// - target equals base: only the source task changed, take current
/// - current equals base: only the target changed, keep target
/// - otherwise both diverged: conflict, the base content is kept
#[derive(Debug, Clone, Copy, Default)]
pub struct SimpleConflictResolveStrategy;

impl ConflictResolveStrategy for SimpleConflictResolveStrategy {
    fn resolve_conflicts(
        &self,
        current: &TaskFileState,
        base: &TaskFileState,
        target: &TaskFileState,
    ) -> ConflictResolution {
        let paths: BTreeSet<&str> = current
            .paths()
            .chain(base.paths())
            .chain(target.paths())
            .collect();

        let mut resolved = TaskFileState::new();
        let mut conflicts = Vec::new();

        for path in paths {
            let current_value = current.get(path);
            let base_value = base.get(path);
            let target_value = target.get(path);

            let value = if current_value == target_value || base_value == target_value {
                current_value
            } else if base_value == current_value {
                target_value
            } else {
                conflicts.push(path.to_string());
                base_value
            };

            if let Some(content) = value {
                resolved.insert(path, content);
            }
        }

        if !conflicts.is_empty() {
            tracing::debug!("Unresolved conflicts: {:?}", conflicts);
        }

        ConflictResolution {
            all_resolved: conflicts.is_empty(),
            changes: UserChanges::calculate(base, &resolved),
            conflicts,
        }
    }
}
