//! Core error type

use thiserror::Error;

/// Result type alias for flsync operations
pub type FlResult<T> = Result<T, FlError>;

/// Main error type for flsync
#[derive(Error, Debug, Clone)]
pub enum FlError {
    /// Configuration related errors
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        context: Option<String>,
    },

    /// File system errors outside of the record store
    #[error("IO error: {message}")]
    Io {
        message: String,
        path: Option<String>,
    },

    /// Record store errors
    #[error("Storage error: {message}")]
    Storage {
        message: String,
        context: Option<String>,
    },

    /// JSON serialization/deserialization errors
    #[error("JSON error: {message}")]
    Json { message: String },

    /// Invalid input errors
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    /// Generic error with context
    #[error("Error: {message}")]
    Other { message: String },
}

impl FlError {
    /// Stable code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Config { .. } => "FL_CONFIG",
            Self::Io { .. } => "FL_IO",
            Self::Storage { .. } => "FL_STORAGE",
            Self::Json { .. } => "FL_JSON",
            Self::InvalidInput { .. } => "FL_INVALID_INPUT",
            Self::Other { .. } => "FL_OTHER",
        }
    }

    /// Optional context attached to the error
    pub fn context(&self) -> Option<&str> {
        match self {
            Self::Config { context, .. } | Self::Storage { context, .. } => context.as_deref(),
            Self::Io { path, .. } => path.as_deref(),
            _ => None,
        }
    }
}

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Wrap the error as a storage error with the given context
    fn storage_context<C: std::fmt::Display>(self, context: C) -> FlResult<T>;

    /// Wrap the error as an IO error for the given path
    fn io_context(self, path: &std::path::Path) -> FlResult<T>;
}

impl<T, E: std::fmt::Display> ResultExt<T> for Result<T, E> {
    fn storage_context<C: std::fmt::Display>(self, context: C) -> FlResult<T> {
        self.map_err(|e| FlError::storage(format!("{}: {}", context, e)))
    }

    fn io_context(self, path: &std::path::Path) -> FlResult<T> {
        self.map_err(|e| FlError::io_with_path(e.to_string(), path.display().to_string()))
    }
}
