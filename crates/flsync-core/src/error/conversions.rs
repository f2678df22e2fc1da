//! From trait implementations for FlError conversions

use super::types::FlError;

impl From<std::io::Error> for FlError {
    fn from(error: std::io::Error) -> Self {
        Self::io(error.to_string())
    }
}

impl From<serde_json::Error> for FlError {
    fn from(error: serde_json::Error) -> Self {
        Self::json(error.to_string())
    }
}
