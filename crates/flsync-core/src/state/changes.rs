//! User changes between two task file states

use crate::error::{FlResult, ResultExt};
use std::path::Path;
use tokio::fs;

use super::snapshot::TaskFileState;

/// A single change to a task file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserChange {
    /// File was created
    Created { path: String, content: String },
    /// File content was modified
    Modified { path: String, content: String },
    /// File was deleted
    Deleted { path: String },
}

impl UserChange {
    /// Get the path of the changed file
    pub fn path(&self) -> &str {
        match self {
            Self::Created { path, .. } | Self::Modified { path, .. } | Self::Deleted { path } => {
                path
            }
        }
    }

    pub fn is_created(&self) -> bool {
        matches!(self, Self::Created { .. })
    }

    pub fn is_modified(&self) -> bool {
        matches!(self, Self::Modified { .. })
    }

    pub fn is_deleted(&self) -> bool {
        matches!(self, Self::Deleted { .. })
    }

    fn apply(&self, state: &mut TaskFileState) {
        match self {
            Self::Created { path, content } | Self::Modified { path, content } => {
                state.insert(path.clone(), content.clone());
            }
            Self::Deleted { path } => {
                state.remove(path);
            }
        }
    }

    async fn apply_to_dir(&self, task_dir: &Path) -> FlResult<()> {
        let full_path = task_dir.join(self.path());
        match self {
            Self::Created { content, .. } | Self::Modified { content, .. } => {
                if let Some(parent) = full_path.parent() {
                    fs::create_dir_all(parent).await.io_context(parent)?;
                }
                fs::write(&full_path, content).await.io_context(&full_path)?;
            }
            Self::Deleted { .. } => {
                if full_path.exists() {
                    fs::remove_file(&full_path).await.io_context(&full_path)?;
                }
            }
        }
        tracing::debug!("Applied {:?} to {:?}", self, full_path);
        Ok(())
    }
}

/// An ordered set of changes, at most one per path
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserChanges(Vec<UserChange>);

impl UserChanges {
    /// Changes turning `from` into `to`; paths with equal content are omitted
    pub fn calculate(from: &TaskFileState, to: &TaskFileState) -> Self {
        let mut changes = Vec::new();

        for (path, content) in to.iter() {
            match from.get(path) {
                None => changes.push(UserChange::Created {
                    path: path.to_string(),
                    content: content.to_string(),
                }),
                Some(before) if before != content => changes.push(UserChange::Modified {
                    path: path.to_string(),
                    content: content.to_string(),
                }),
                Some(_) => {}
            }
        }

        for path in from.paths() {
            if !to.contains(path) {
                changes.push(UserChange::Deleted {
                    path: path.to_string(),
                });
            }
        }

        Self(changes)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &UserChange> {
        self.0.iter()
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(UserChange::path)
    }

    /// Apply the changes to `state` in place
    pub fn apply_to(&self, state: &mut TaskFileState) {
        for change in &self.0 {
            change.apply(state);
        }
    }

    /// Copy of `base` with the changes applied
    pub fn applied(&self, base: &TaskFileState) -> TaskFileState {
        let mut state = base.clone();
        self.apply_to(&mut state);
        state
    }

    /// Write the changes to the files under `task_dir`
    pub async fn apply_to_dir(&self, task_dir: &Path) -> FlResult<()> {
        for change in &self.0 {
            change.apply_to_dir(task_dir).await?;
        }
        Ok(())
    }
}

impl FromIterator<UserChange> for UserChanges {
    fn from_iter<I: IntoIterator<Item = UserChange>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
