//! CLI commands

pub mod changes;
pub mod propagatable;
pub mod propagate;
pub mod save;
pub mod status;
