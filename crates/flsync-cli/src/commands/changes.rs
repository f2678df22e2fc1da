//! `flsync changes`

use crate::context::CliContext;
use anyhow::Result;
use console::style;

pub async fn run(ctx: &CliContext, task: &str) -> Result<()> {
    let id = ctx.framework_task(task)?;
    let changed = ctx.manager.changed_files(id).await;

    if changed.is_empty() {
        ctx.console.success("No changes since the last baseline");
        return Ok(());
    }

    ctx.console.print_header(&format!("Changed in {}", task));
    for path in changed {
        println!("  {}", style(path).cyan());
    }
    Ok(())
}
