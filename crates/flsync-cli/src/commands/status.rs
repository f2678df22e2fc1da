//! `flsync status`

use crate::context::CliContext;
use anyhow::{Result, bail};
use flsync_core::{LessonId, SyncChangesState, TaskId};

/// Lesson rows: lesson id and name, then per task its id, name and file names
type Layout = Vec<(LessonId, String, Vec<(TaskId, String, Vec<String>)>)>;

pub async fn run(ctx: &CliContext, lesson: Option<&str>) -> Result<()> {
    if !ctx.config.sync_changes.enabled {
        ctx.console.warn("Sync changes tracking is disabled");
        return Ok(());
    }
    ctx.require_creator_mode()?;

    let layout = layout(ctx, lesson);
    if layout.is_empty() {
        match lesson {
            Some(name) => bail!("No framework lesson `{}`", name),
            None => {
                ctx.console.warn("The course has no framework lessons");
                return Ok(());
            }
        }
    }

    let tracker = ctx.tracker();
    for (id, _, _) in &layout {
        tracker.update_lesson(*id);
    }
    tracker.flush().await;

    for (lesson_id, lesson_name, tasks) in &layout {
        let state = tracker.lesson_state(*lesson_id).unwrap_or_default();
        ctx.console.print_state(0, lesson_name, state);
        for (task_id, task_name, files) in tasks {
            let state = tracker.task_state(*task_id).unwrap_or_default();
            ctx.console.print_state(1, task_name, state);
            for file in files {
                let state = tracker.file_state(*task_id, file).unwrap_or_default();
                if state != SyncChangesState::None {
                    ctx.console.print_state(2, file, state);
                }
            }
        }
    }
    Ok(())
}

fn layout(ctx: &CliContext, lesson: Option<&str>) -> Layout {
    let course = ctx.course.read();
    course
        .framework_lessons()
        .filter(|l| lesson.is_none_or(|name| l.name == name))
        .map(|l| {
            let tasks = l
                .tasks
                .iter()
                .map(|t| {
                    let files = t.files.iter().map(|f| f.name.clone()).collect();
                    (t.id, t.name.clone(), files)
                })
                .collect();
            (l.id, l.name.clone(), tasks)
        })
        .collect()
}
