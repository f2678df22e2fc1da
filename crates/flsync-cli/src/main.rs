//! flsync command-line interface
//!
//! Drives framework lesson propagation on a course tree from the terminal.
//!
//! ```bash
//! flsync propagate lesson1/task1   # carry edits of task1 into later tasks
//! flsync status                    # show sync-changes annotations
//! ```

mod args;
mod commands;
mod console;
mod context;
mod logging;
mod merge_dialog;
mod router;

use clap::Parser;

pub use args::{Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    router::route(cli).await
}
