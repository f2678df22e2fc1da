//! Capturing task file states from disk

use std::io::ErrorKind;
use std::path::Path;
use tokio::fs;

use super::snapshot::TaskFileState;

/// Read the current content of `paths` under `task_dir`
///
/// Capture is best-effort: a path that cannot be read is left out of the
/// resulting state instead of failing the whole capture.
pub async fn capture_state<I, S>(paths: I, task_dir: &Path) -> TaskFileState
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut state = TaskFileState::new();

    for path in paths {
        let path = path.as_ref();
        let full_path = task_dir.join(path);
        match fs::read_to_string(&full_path).await {
            Ok(content) => state.insert(path, content),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!("Skipping absent file {:?}", full_path);
            }
            Err(e) => {
                tracing::warn!("Failed to read {:?}, leaving it out of the state: {}", full_path, e);
            }
        }
    }

    state
}
