//! Course description loading

use crate::error::{FlError, FlResult};
use std::fs;
use std::path::Path;

use super::types::Course;

/// Load a course description (YAML, TOML or JSON by extension)
///
/// The course root is the directory containing the description file.
pub fn load_course(path: &Path) -> FlResult<Course> {
    let content = fs::read_to_string(path).map_err(|e| {
        FlError::io_with_path(
            format!("Failed to read course description: {}", e),
            path.display().to_string(),
        )
    })?;

    let mut course: Course = match path.extension().and_then(|s| s.to_str()) {
        Some("toml") => toml::from_str(&content)
            .map_err(|e| FlError::invalid_input(format!("Failed to parse TOML course: {}", e)))?,
        Some("json") => serde_json::from_str(&content)
            .map_err(|e| FlError::invalid_input(format!("Failed to parse JSON course: {}", e)))?,
        _ => serde_yaml::from_str(&content)
            .map_err(|e| FlError::invalid_input(format!("Failed to parse YAML course: {}", e)))?,
    };

    course.root = path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default();
    course.assign_ids();

    tracing::debug!(
        "Loaded course with {} lessons from {:?}",
        course.lessons.len(),
        path
    );
    Ok(course)
}

/// Write a course description back in the format implied by `path`
pub fn save_course(course: &Course, path: &Path) -> FlResult<()> {
    let content = match path.extension().and_then(|s| s.to_str()) {
        Some("toml") => toml::to_string_pretty(course)
            .map_err(|e| FlError::other(format!("Failed to serialize TOML course: {}", e)))?,
        Some("json") => serde_json::to_string_pretty(course)?,
        _ => serde_yaml::to_string(course)
            .map_err(|e| FlError::other(format!("Failed to serialize YAML course: {}", e)))?,
    };

    fs::write(path, content).map_err(|e| {
        FlError::io_with_path(
            format!("Failed to write course description: {}", e),
            path.display().to_string(),
        )
    })
}
