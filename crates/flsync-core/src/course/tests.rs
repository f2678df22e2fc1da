//! Tests for the course model

use super::*;
use std::fs;
use tempfile::TempDir;

fn framework_lesson() -> Lesson {
    Lesson::new(LessonId(1), "lesson1", LessonKind::Framework)
        .with_task(Task::new(TaskId(1), "task1").with_file(TaskFile::new("src/main.rs")))
        .with_task(Task::new(TaskId(2), "task2").with_file(TaskFile::new("src/main.rs")))
        .with_task(Task::new(TaskId(3), "task3"))
}

#[test]
fn test_chain_navigation() {
    let lesson = framework_lesson();

    assert_eq!(lesson.chain_index(TaskId(1)), Some(1));
    assert_eq!(lesson.chain_index(TaskId(3)), Some(3));
    assert_eq!(lesson.next_task(TaskId(1)).map(|t| t.id), Some(TaskId(2)));
    assert!(lesson.next_task(TaskId(3)).is_none());
    assert!(lesson.previous_task(TaskId(1)).is_none());
    assert_eq!(lesson.previous_task(TaskId(3)).map(|t| t.id), Some(TaskId(2)));
    assert!(lesson.is_last(TaskId(3)));
    assert!(!lesson.is_last(TaskId(2)));
}

#[test]
fn test_propagatable_paths_skip_hidden_and_ignored() {
    let mut task = Task::new(TaskId(1), "task1")
        .with_file(TaskFile::new("a.txt"))
        .with_file(TaskFile::hidden("tests/test.txt"))
        .with_file(TaskFile::new("b.txt"));
    task.file_mut("b.txt").unwrap().propagatable = false;

    assert_eq!(task.propagatable_paths(), vec!["a.txt".to_string()]);
}

#[test]
fn test_move_task_files_remaps_descendants() {
    let mut course = Course::new("/tmp", CourseMode::Creator).with_lesson(
        Lesson::new(LessonId(1), "l", LessonKind::Framework).with_task(
            Task::new(TaskId(1), "t")
                .with_file(TaskFile::new("src/a.rs"))
                .with_file(TaskFile::new("src/nested/b.rs"))
                .with_file(TaskFile::new("srcx.rs")),
        ),
    );

    let moved = course.move_task_files(TaskId(1), "src", "lib");

    assert_eq!(moved, 2);
    let task = course.task(TaskId(1)).unwrap();
    assert!(task.has_file("lib/a.rs"));
    assert!(task.has_file("lib/nested/b.rs"));
    assert!(task.has_file("srcx.rs"));
}

#[test]
fn test_task_dir_requires_existing_directory() {
    let temp_dir = TempDir::new().unwrap();
    let course =
        Course::new(temp_dir.path(), CourseMode::Creator).with_lesson(framework_lesson());
    fs::create_dir_all(temp_dir.path().join("lesson1/task1")).unwrap();

    assert_eq!(
        course.task_dir(TaskId(1)),
        Some(temp_dir.path().join("lesson1/task1"))
    );
    assert!(course.task_dir(TaskId(2)).is_none());
}

#[test]
fn test_load_course_from_yaml_assigns_ids() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("course.yaml");
    fs::write(
        &path,
        r#"
mode: creator
lessons:
  - name: intro
    kind: framework
    tasks:
      - name: step1
        files:
          - name: main.py
          - name: tests/test_main.py
            visible: false
      - id: 40
        name: step2
        files:
          - name: main.py
"#,
    )
    .unwrap();

    let course = load_course(&path).unwrap();

    assert!(course.is_creator_mode());
    assert_eq!(course.root, temp_dir.path());
    let lesson = &course.lessons[0];
    assert!(lesson.is_framework());
    assert_eq!(lesson.id, LessonId(1));
    assert_eq!(lesson.tasks[1].id, TaskId(40));
    assert_eq!(lesson.tasks[0].id, TaskId(41));
    assert!(!lesson.tasks[0].files[1].visible);
    assert!(lesson.tasks[0].files[0].propagatable);
    assert_eq!(course.find_task("intro/step2").map(|t| t.id), Some(TaskId(40)));
}

#[test]
fn test_set_file_propagatable() {
    let mut course = Course::new("/tmp", CourseMode::Creator).with_lesson(framework_lesson());

    assert!(course.set_file_propagatable(TaskId(1), "src/main.rs", false));
    assert!(!course.task(TaskId(1)).unwrap().files[0].is_propagatable());
    assert!(!course.set_file_propagatable(TaskId(1), "missing.rs", false));
}

#[test]
fn test_saved_course_keeps_ids_and_flags() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("course.yaml");
    let mut course = Course::new(temp_dir.path(), CourseMode::Creator).with_lesson(framework_lesson());
    course.set_file_propagatable(TaskId(2), "src/main.rs", false);

    save_course(&course, &path).unwrap();
    let loaded = load_course(&path).unwrap();

    assert_eq!(loaded, course);
    assert!(!loaded.task(TaskId(2)).unwrap().files[0].propagatable);
}
