//! Tests for conflict resolution strategies

use super::*;
use crate::state::TaskFileState;

fn state(entries: &[(&str, &str)]) -> TaskFileState {
    entries.iter().copied().collect()
}

fn resolve(
    current: &TaskFileState,
    base: &TaskFileState,
    target: &TaskFileState,
) -> (ConflictResolution, TaskFileState) {
    let resolution = SimpleConflictResolveStrategy.resolve_conflicts(current, base, target);
    let merged = resolution.changes.applied(base);
    (resolution, merged)
}

#[test]
fn test_source_edit_carries_forward() {
    let (resolution, merged) = resolve(
        &state(&[("f.txt", "hello world")]),
        &state(&[("f.txt", "hello")]),
        &state(&[("f.txt", "hello")]),
    );

    assert!(resolution.all_resolved);
    assert!(resolution.conflicts.is_empty());
    assert_eq!(merged, state(&[("f.txt", "hello world")]));
}

#[test]
fn test_diverged_target_is_conflict() {
    let (resolution, merged) = resolve(
        &state(&[("f.txt", "hello world")]),
        &state(&[("f.txt", "hello")]),
        &state(&[("f.txt", "hello there")]),
    );

    assert!(!resolution.all_resolved);
    assert_eq!(resolution.conflicts, vec!["f.txt".to_string()]);
    assert_eq!(merged, state(&[("f.txt", "hello")]));
}

#[test]
fn test_target_only_change_is_kept() {
    let (resolution, merged) = resolve(
        &state(&[("f.txt", "hello")]),
        &state(&[("f.txt", "hello")]),
        &state(&[("f.txt", "hello there"), ("extra.txt", "x")]),
    );

    assert!(resolution.all_resolved);
    assert_eq!(merged, state(&[("f.txt", "hello there"), ("extra.txt", "x")]));
}

#[test]
fn test_deletion_carries_forward() {
    let (resolution, merged) = resolve(
        &state(&[]),
        &state(&[("old.txt", "x")]),
        &state(&[("old.txt", "x")]),
    );

    assert!(resolution.all_resolved);
    assert!(merged.is_empty());
}

#[test]
fn test_deletion_against_diverged_target_conflicts() {
    let (resolution, _) = resolve(
        &state(&[]),
        &state(&[("old.txt", "x")]),
        &state(&[("old.txt", "y")]),
    );

    assert!(!resolution.all_resolved);
    assert_eq!(resolution.conflicts, vec!["old.txt".to_string()]);
}

#[test]
fn test_same_edit_on_both_sides_is_not_a_conflict() {
    let (resolution, merged) = resolve(
        &state(&[("f.txt", "new")]),
        &state(&[("f.txt", "old")]),
        &state(&[("f.txt", "new")]),
    );

    assert!(resolution.all_resolved);
    assert_eq!(merged, state(&[("f.txt", "new")]));
}

#[test]
fn test_creation_in_source_only() {
    let (resolution, merged) = resolve(
        &state(&[("new.txt", "n")]),
        &state(&[]),
        &state(&[]),
    );

    assert!(resolution.all_resolved);
    assert_eq!(resolution.changes.len(), 1);
    assert_eq!(merged, state(&[("new.txt", "n")]));
}
