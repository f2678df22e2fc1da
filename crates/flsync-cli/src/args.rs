//! CLI argument definitions using clap

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Default course description file
pub const DEFAULT_COURSE_FILE: &str = "course.yaml";
/// Default configuration file
pub const DEFAULT_CONFIG_FILE: &str = "flsync.toml";

#[derive(Parser, Debug)]
#[command(name = "flsync")]
#[command(about = "Propagate course author edits through framework lessons")]
#[command(version)]
pub struct Cli {
    /// Course description (YAML, TOML or JSON)
    #[arg(long, default_value = DEFAULT_COURSE_FILE, env = "FLSYNC_COURSE")]
    pub course: PathBuf,

    /// Path to configuration file
    #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Cancel propagation on any conflict instead of asking
    #[arg(long)]
    pub non_interactive: bool,

    /// Enable debug logging
    #[arg(long, short)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Carry the edits of a task into every following task of its lesson
    Propagate {
        /// Task as `lesson/task`
        task: String,
    },

    /// Store the current files of a task as its baseline
    Save {
        /// Task as `lesson/task`
        task: String,
    },

    /// List files changed since the task's baseline
    Changes {
        /// Task as `lesson/task`
        task: String,
    },

    /// Show sync-changes annotations of framework lessons
    Status {
        /// Restrict output to one lesson
        lesson: Option<String>,
    },

    /// Exclude a file from propagation and sync-changes tracking
    Ignore {
        /// Task as `lesson/task`
        task: String,
        /// File path relative to the task directory
        file: String,
    },

    /// Include a previously ignored file again
    Allow {
        /// Task as `lesson/task`
        task: String,
        /// File path relative to the task directory
        file: String,
    },
}
