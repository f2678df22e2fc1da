//! `flsync propagate`

use crate::context::CliContext;
use anyhow::Result;

pub async fn run(ctx: &CliContext, task: &str) -> Result<()> {
    ctx.require_creator_mode()?;
    let id = ctx.framework_task(task)?;

    ctx.console.print_header(&format!("Propagating {}", task));
    for path in ctx.manager.changed_files(id).await {
        ctx.console.info(&format!("changed: {}", path));
    }

    // Cancellation is a normal outcome, not a failure
    let tracker = ctx.tracker();
    let outcome = tracker.propagate_changes(id).await;
    tracker.flush().await;
    ctx.console.print_outcome(&outcome);

    // Earlier steps may have added or removed files even when cancelled
    ctx.save_course()?;
    let lesson = ctx.course.read().lesson_of(id).map(|l| l.id);
    if let Some(state) = lesson.and_then(|l| tracker.lesson_state(l)) {
        ctx.console.info(&format!("lesson sync state: {}", state));
    }
    Ok(())
}
