//! `flsync ignore` / `flsync allow`

use crate::context::CliContext;
use anyhow::{Result, bail};

pub async fn set(ctx: &CliContext, task: &str, file: &str, propagatable: bool) -> Result<()> {
    let id = ctx.framework_task(task)?;
    let tracker = ctx.tracker();

    if !tracker.set_file_propagatable(id, file, propagatable) {
        bail!("Task `{}` has no file `{}`", task, file);
    }
    ctx.save_course()?;
    tracker.flush().await;

    let verb = if propagatable { "included in" } else { "excluded from" };
    ctx.console
        .success(&format!("`{}` in `{}` is now {} propagation", file, task, verb));
    if let Some(state) = tracker.file_state(id, file) {
        ctx.console.info(&format!("sync state: {}", state));
    }
    Ok(())
}
