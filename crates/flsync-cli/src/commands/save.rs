//! `flsync save`

use crate::context::CliContext;
use anyhow::{Result, bail};

pub async fn run(ctx: &CliContext, task: &str) -> Result<()> {
    let id = ctx.framework_task(task)?;

    match ctx.manager.save_baseline(id).await {
        Some(record) => {
            ctx.console
                .success(&format!("Baseline of `{}` stored in record {}", task, record));
            Ok(())
        }
        None => bail!("Failed to save baseline of `{}`", task),
    }
}
