//! Tests for sync-changes tracking

use super::*;
use crate::config::SyncChangesConfig;
use crate::course::{CourseMode, LessonId, LessonKind, SharedCourse, TaskFile, TaskId};
use crate::framework::{CancellingMergeResolver, FrameworkLessonManager, LogNotifier};
use crate::storage::MemoryRecordStorage;
use crate::test_support::{framework_course, read_file, write_file};
use std::collections::BTreeSet;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

fn tracker_with(course: SharedCourse, config: SyncChangesConfig) -> Arc<SyncChangesTracker> {
    let manager = Arc::new(FrameworkLessonManager::with_storage(
        course.clone(),
        Arc::new(MemoryRecordStorage::new()),
        Arc::new(CancellingMergeResolver),
        Arc::new(LogNotifier),
    ));
    Arc::new(SyncChangesTracker::new(
        &config,
        course,
        manager,
        Arc::new(LogNotifier),
    ))
}

fn tracker(course: SharedCourse) -> Arc<SyncChangesTracker> {
    tracker_with(course, SyncChangesConfig::default())
}

/// Two tasks declaring `a.txt`; task1 additionally has `g.txt`
fn orphan_course(root: &Path) -> SharedCourse {
    let course = framework_course(root, 2, &["a.txt"]);
    course.write().add_task_file(TaskId(1), TaskFile::new("g.txt"));
    for task in 1..=2 {
        write_file(root, task, "a.txt", "v0");
    }
    write_file(root, 1, "g.txt", "g");
    course
}

async fn settle() {
    for _ in 0..10 {
        tokio::task::yield_now().await;
    }
}

#[test]
fn test_state_aggregation_is_max_severity() {
    use SyncChangesState::*;

    assert_eq!(SyncChangesState::aggregate([]), None);
    assert_eq!(SyncChangesState::aggregate([None, Info]), Info);
    assert_eq!(SyncChangesState::aggregate([Info, Warning, Info]), Warning);
}

#[test]
fn test_queue_coalesces_and_orders_by_priority() {
    let queue = UpdateQueue::new(Duration::from_millis(10));
    queue.queue(SyncUpdate::Project);
    queue.queue(SyncUpdate::Lesson(LessonId(1)));
    queue.queue(SyncUpdate::Task(TaskId(2)));
    queue.queue(SyncUpdate::TaskFiles {
        task: TaskId(2),
        files: None,
    });
    queue.queue(SyncUpdate::Project);
    queue.queue(SyncUpdate::Task(TaskId(2)));

    assert_eq!(queue.len(), 4);
    assert_eq!(
        queue.take(),
        vec![
            SyncUpdate::TaskFiles {
                task: TaskId(2),
                files: None
            },
            SyncUpdate::Task(TaskId(2)),
            SyncUpdate::Lesson(LessonId(1)),
            SyncUpdate::Project,
        ]
    );
    assert!(queue.is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_queue_debounce_restarts_on_add() {
    let queue = UpdateQueue::new(Duration::from_millis(300));
    let start = tokio::time::Instant::now();

    queue.queue(1);
    tokio::join!(queue.settled(), async {
        tokio::time::sleep(Duration::from_millis(200)).await;
        queue.queue(2);
    });

    assert!(start.elapsed() >= Duration::from_millis(500));
    assert_eq!(queue.take(), vec![1, 2]);
}

#[tokio::test]
async fn test_orphaned_file_warns_up_to_lesson() {
    let dir = TempDir::new().unwrap();
    let course = orphan_course(dir.path());
    let tracker = tracker(course);

    tracker.update_course();
    tracker.flush().await;

    assert_eq!(
        tracker.file_state(TaskId(1), "g.txt"),
        Some(SyncChangesState::Warning)
    );
    assert_eq!(tracker.task_state(TaskId(1)), Some(SyncChangesState::Warning));
    assert_eq!(
        tracker.lesson_state(LessonId(1)),
        Some(SyncChangesState::Warning)
    );
}

#[tokio::test]
async fn test_edit_since_baseline_is_info() {
    let dir = TempDir::new().unwrap();
    let course = framework_course(dir.path(), 2, &["a.txt"]);
    for task in 1..=2 {
        write_file(dir.path(), task, "a.txt", "v0");
    }
    let tracker = tracker(course);
    for task in 1..=2 {
        tracker.manager.save_baseline(TaskId(task)).await;
    }

    tracker.update_course();
    tracker.flush().await;
    assert_eq!(
        tracker.file_state(TaskId(1), "a.txt"),
        Some(SyncChangesState::None)
    );

    write_file(dir.path(), 1, "a.txt", "v1");
    tracker.task_file_changed(TaskId(1), "a.txt");
    tracker.flush().await;

    assert_eq!(
        tracker.file_state(TaskId(1), "a.txt"),
        Some(SyncChangesState::Info)
    );
    assert_eq!(tracker.task_state(TaskId(1)), Some(SyncChangesState::Info));
    assert_eq!(tracker.lesson_state(LessonId(1)), Some(SyncChangesState::Info));

    tracker.manager.propagate_changes(TaskId(1)).await;
    tracker.update_task(TaskId(1));
    tracker.flush().await;

    assert_eq!(tracker.task_state(TaskId(1)), Some(SyncChangesState::None));
    assert_eq!(tracker.lesson_state(LessonId(1)), Some(SyncChangesState::None));
}

#[tokio::test]
async fn test_propagation_requeues_its_lesson() {
    let dir = TempDir::new().unwrap();
    let course = framework_course(dir.path(), 2, &["a.txt"]);
    for task in 1..=2 {
        write_file(dir.path(), task, "a.txt", "v0");
    }
    let tracker = tracker(course);
    tracker.manager.save_baseline(TaskId(1)).await;

    write_file(dir.path(), 1, "a.txt", "v1");
    tracker.task_file_changed(TaskId(1), "a.txt");
    tracker.flush().await;
    assert_eq!(
        tracker.file_state(TaskId(1), "a.txt"),
        Some(SyncChangesState::Info)
    );

    let outcome = tracker.propagate_changes(TaskId(1)).await;
    assert!(outcome.is_completed());
    assert!(tracker.pending_updates() > 0);

    tracker.flush().await;
    assert_eq!(
        tracker.file_state(TaskId(1), "a.txt"),
        Some(SyncChangesState::None)
    );
    assert_eq!(tracker.lesson_state(LessonId(1)), Some(SyncChangesState::None));
}

#[tokio::test]
async fn test_propagated_new_file_clears_its_warning() {
    let dir = TempDir::new().unwrap();
    let course = framework_course(dir.path(), 3, &["a.txt"]);
    for task in 1..=3 {
        write_file(dir.path(), task, "a.txt", "v0");
    }
    let tracker = tracker(course.clone());
    for task in 1..=3 {
        tracker.manager.save_baseline(TaskId(task)).await;
    }

    course.write().add_task_file(TaskId(1), TaskFile::new("b.txt"));
    write_file(dir.path(), 1, "b.txt", "new");
    tracker.task_file_created(TaskId(1), "b.txt");
    tracker.flush().await;
    assert_eq!(
        tracker.file_state(TaskId(1), "b.txt"),
        Some(SyncChangesState::Warning)
    );

    tracker.propagate_changes(TaskId(1)).await;
    tracker.flush().await;

    for task in 1..=2 {
        assert_eq!(
            tracker.file_state(TaskId(task), "b.txt"),
            Some(SyncChangesState::None)
        );
    }
    assert_eq!(read_file(dir.path(), 3, "b.txt").as_deref(), Some("new"));
    assert_eq!(tracker.lesson_state(LessonId(1)), Some(SyncChangesState::None));
}

#[tokio::test]
async fn test_last_task_is_never_annotated() {
    let dir = TempDir::new().unwrap();
    let course = framework_course(dir.path(), 2, &["a.txt"]);
    write_file(dir.path(), 2, "a.txt", "changed");
    let tracker = tracker(course);

    tracker.update_task(TaskId(2));
    tracker.flush().await;

    assert_eq!(
        tracker.file_state(TaskId(2), "a.txt"),
        Some(SyncChangesState::None)
    );
    assert_eq!(tracker.task_state(TaskId(2)), Some(SyncChangesState::None));
}

#[tokio::test]
async fn test_untracked_lessons_report_nothing() {
    let dir = TempDir::new().unwrap();

    let course = orphan_course(dir.path());
    course.write().mode = CourseMode::Student;
    let student = tracker(course);
    student.update_course();
    assert_eq!(student.pending_updates(), 0);
    assert_eq!(student.file_state(TaskId(1), "g.txt"), None);

    let course = orphan_course(dir.path());
    let disabled = tracker_with(
        course,
        SyncChangesConfig {
            enabled: false,
            ..Default::default()
        },
    );
    disabled.update_course();
    assert_eq!(disabled.task_state(TaskId(1)), None);
    assert_eq!(disabled.lesson_state(LessonId(1)), None);

    let course = orphan_course(dir.path());
    course.write().lessons[0].kind = LessonKind::Regular;
    let regular = tracker(course);
    regular.update_task(TaskId(1));
    assert_eq!(regular.pending_updates(), 0);
    assert_eq!(regular.lesson_state(LessonId(1)), None);
}

#[tokio::test]
async fn test_deleted_file_drops_its_state() {
    let dir = TempDir::new().unwrap();
    let course = orphan_course(dir.path());
    let tracker = tracker(course.clone());
    tracker.update_course();
    tracker.flush().await;

    course.write().remove_task_file(TaskId(1), "g.txt");
    tracker.files_deleted(TaskId(1), &["g.txt".to_string()]);
    tracker.flush().await;

    assert_eq!(
        tracker.file_state(TaskId(1), "g.txt"),
        Some(SyncChangesState::None)
    );
    assert_ne!(tracker.task_state(TaskId(1)), Some(SyncChangesState::Warning));
}

#[tokio::test]
async fn test_file_created_in_next_task_clears_previous_warning() {
    let dir = TempDir::new().unwrap();
    let course = orphan_course(dir.path());
    let tracker = tracker(course.clone());
    tracker.manager.save_baseline(TaskId(1)).await;
    tracker.update_course();
    tracker.flush().await;
    assert_eq!(
        tracker.file_state(TaskId(1), "g.txt"),
        Some(SyncChangesState::Warning)
    );

    course.write().add_task_file(TaskId(2), TaskFile::new("g.txt"));
    tracker.task_file_created(TaskId(2), "g.txt");
    tracker.flush().await;

    assert_eq!(
        tracker.file_state(TaskId(1), "g.txt"),
        Some(SyncChangesState::None)
    );
    assert_eq!(tracker.lesson_state(LessonId(1)), Some(SyncChangesState::None));
}

#[tokio::test]
async fn test_deleted_task_requeues_previous_task() {
    let dir = TempDir::new().unwrap();
    let course = framework_course(dir.path(), 3, &["a.txt"]);
    course.write().add_task_file(TaskId(1), TaskFile::new("g.txt"));
    course.write().add_task_file(TaskId(2), TaskFile::new("g.txt"));
    let tracker = tracker(course.clone());
    for task in 1..=3 {
        tracker.manager.save_baseline(TaskId(task)).await;
    }
    tracker.update_course();
    tracker.flush().await;
    assert_eq!(tracker.task_state(TaskId(1)), Some(SyncChangesState::None));

    course.write().lessons[0].tasks.remove(1);
    tracker.task_deleted(LessonId(1), TaskId(2), 2);
    tracker.flush().await;

    assert_eq!(
        tracker.file_state(TaskId(1), "g.txt"),
        Some(SyncChangesState::Warning)
    );
    assert_eq!(tracker.task_state(TaskId(2)), None);
}

#[tokio::test]
async fn test_directory_move_remaps_descendants() {
    let dir = TempDir::new().unwrap();
    let course = framework_course(dir.path(), 2, &["src/a.txt", "src/nested/b.txt"]);
    let tracker = tracker(course.clone());
    for task in 1..=2 {
        tracker.manager.save_baseline(TaskId(task)).await;
    }

    let moved = course.write().move_task_files(TaskId(1), "src", "lib");
    assert_eq!(moved, 2);
    tracker.file_moved(TaskId(1), "src", TaskId(1), "lib", true);

    let queued = tracker.queue.take();
    assert!(queued.contains(&SyncUpdate::TaskFiles {
        task: TaskId(1),
        files: Some(BTreeSet::from([
            "src/a.txt".to_string(),
            "src/nested/b.txt".to_string()
        ])),
    }));
    assert!(queued.contains(&SyncUpdate::TaskFiles {
        task: TaskId(1),
        files: Some(BTreeSet::from([
            "lib/a.txt".to_string(),
            "lib/nested/b.txt".to_string()
        ])),
    }));
    for update in queued {
        tracker.queue.queue(update);
    }
    tracker.flush().await;

    assert_eq!(
        tracker.file_state(TaskId(1), "lib/nested/b.txt"),
        Some(SyncChangesState::Warning)
    );
    assert_eq!(
        tracker.file_state(TaskId(1), "src/a.txt"),
        Some(SyncChangesState::None)
    );
}

#[tokio::test]
async fn test_single_file_move_between_tasks() {
    let dir = TempDir::new().unwrap();
    let course = framework_course(dir.path(), 2, &["a.txt"]);
    let tracker = tracker(course.clone());

    course.write().remove_task_file(TaskId(2), "a.txt");
    course.write().add_task_file(TaskId(2), TaskFile::new("b.txt"));
    tracker.file_moved(TaskId(2), "a.txt", TaskId(2), "b.txt", false);
    tracker.flush().await;

    assert_eq!(
        tracker.file_state(TaskId(1), "a.txt"),
        Some(SyncChangesState::Warning)
    );
}

#[tokio::test]
async fn test_excluding_file_clears_its_warning() {
    let dir = TempDir::new().unwrap();
    let course = orphan_course(dir.path());
    let tracker = tracker(course);
    tracker.update_course();
    tracker.flush().await;

    assert!(tracker.set_file_propagatable(TaskId(1), "g.txt", false));
    tracker.flush().await;

    assert_eq!(
        tracker.file_state(TaskId(1), "g.txt"),
        Some(SyncChangesState::None)
    );
    assert!(!tracker.set_file_propagatable(TaskId(1), "missing.txt", false));
}

#[tokio::test(start_paused = true)]
async fn test_consumer_loop_waits_for_quiet_period() {
    let dir = TempDir::new().unwrap();
    let course = framework_course(dir.path(), 2, &["a.txt"]);
    let tracker = tracker(course);
    let handle = tracker.start();

    tracker.task_file_changed(TaskId(1), "a.txt");
    settle().await;
    tokio::time::advance(Duration::from_millis(200)).await;
    settle().await;
    assert!(tracker.pending_updates() > 0);

    tracker.task_file_changed(TaskId(1), "a.txt");
    settle().await;
    tokio::time::advance(Duration::from_millis(200)).await;
    settle().await;
    assert!(tracker.pending_updates() > 0);

    tokio::time::advance(Duration::from_millis(150)).await;
    settle().await;
    assert_eq!(tracker.pending_updates(), 0);

    tracker.shutdown();
    handle.await.unwrap();
}
