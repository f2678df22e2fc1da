//! CLI console utilities

use console::style;
use flsync_core::{PropagationOutcome, ProjectNotifier, SyncChangesState};

/// CLI console for formatted output
#[derive(Debug, Clone, Copy)]
pub struct CliConsole {
    verbose: bool,
}

impl CliConsole {
    pub const fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    /// Print an info message (verbose only)
    pub fn info(&self, message: &str) {
        if self.verbose {
            println!("{} {}", style("ℹ").blue().bold(), message);
        }
    }

    pub fn success(&self, message: &str) {
        println!("{} {}", style("✓").green().bold(), style(message).green());
    }

    pub fn warn(&self, message: &str) {
        println!("{} {}", style("⚠").yellow().bold(), style(message).yellow());
    }

    pub fn error(&self, message: &str) {
        eprintln!("{} {}", style("✗").red().bold(), style(message).red());
    }

    pub fn print_header(&self, title: &str) {
        println!();
        println!("{}", style(title).bold().underlined());
        println!("{}", style("=".repeat(title.chars().count())).dim());
    }

    /// One line of the status tree
    pub fn print_state(&self, indent: usize, name: &str, state: SyncChangesState) {
        let marker = match state {
            SyncChangesState::Warning => style("!").yellow().bold(),
            SyncChangesState::Info => style("*").blue().bold(),
            SyncChangesState::None => style(" ").dim(),
        };
        let name = match state {
            SyncChangesState::None => style(name.to_string()).dim(),
            _ => style(name.to_string()),
        };
        println!("{}{} {}", "  ".repeat(indent), marker, name);
    }

    pub fn print_outcome(&self, outcome: &PropagationOutcome) {
        match outcome {
            PropagationOutcome::Completed { steps: 0 } => {
                self.success("Nothing to propagate, baseline saved")
            }
            PropagationOutcome::Completed { steps } => {
                self.success(&format!("Changes applied to {} following task(s)", steps))
            }
            PropagationOutcome::Cancelled { cancelled_at } => {
                self.warn(&format!("Propagation stopped at `{}`", cancelled_at))
            }
        }
    }
}

/// Notifier printing to the terminal
pub struct ConsoleNotifier {
    console: CliConsole,
}

impl ConsoleNotifier {
    pub const fn new(console: CliConsole) -> Self {
        Self { console }
    }
}

impl ProjectNotifier for ConsoleNotifier {
    fn propagation_succeeded(&self, start_task: &str) {
        self.console
            .info(&format!("Changes from `{}` propagated", start_task));
    }

    fn propagation_cancelled(&self, start_task: &str, cancelled_task: &str) {
        self.console.warn(&format!(
            "Applying changes from `{}` was canceled at `{}`",
            start_task, cancelled_task
        ));
    }

    fn refresh_project_view(&self) {}
}
