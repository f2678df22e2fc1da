//! Command routing logic for CLI

use crate::args::{Cli, Commands};
use crate::commands;
use crate::context::CliContext;
use crate::logging::init_logging;
use anyhow::{Context, Result};
use flsync_core::load_config;

/// Route CLI commands to their respective handlers
pub async fn route(cli: Cli) -> Result<()> {
    let config = load_config(&cli.config)
        .with_context(|| format!("Failed to load configuration from {}", cli.config.display()))?;
    init_logging(&config.logging, cli.verbose);
    tracing::debug!("Running {:?}", cli.command);

    let ctx = CliContext::open(&cli, config).await?;
    let result = dispatch(&ctx, &cli.command).await;
    if let Err(e) = &result {
        ctx.console.error(&format!("{:#}", e));
    }
    let closed = ctx.close().await;
    result.and(closed)
}

async fn dispatch(ctx: &CliContext, command: &Commands) -> Result<()> {
    match command {
        Commands::Propagate { task } => commands::propagate::run(ctx, task).await,
        Commands::Save { task } => commands::save::run(ctx, task).await,
        Commands::Changes { task } => commands::changes::run(ctx, task).await,
        Commands::Status { lesson } => commands::status::run(ctx, lesson.as_deref()).await,
        Commands::Ignore { task, file } => {
            commands::propagatable::set(ctx, task, file, false).await
        }
        Commands::Allow { task, file } => commands::propagatable::set(ctx, task, file, true).await,
    }
}
