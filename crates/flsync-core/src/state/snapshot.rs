//! Task file state snapshot

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Contents of a task's propagatable files, keyed by task-relative path
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskFileState(BTreeMap<String, String>);

impl TaskFileState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, path: &str) -> Option<&str> {
        self.0.get(path).map(String::as_str)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.0.contains_key(path)
    }

    pub fn insert(&mut self, path: impl Into<String>, content: impl Into<String>) {
        self.0.insert(path.into(), content.into());
    }

    pub fn remove(&mut self, path: &str) -> Option<String> {
        self.0.remove(path)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Entries present with identical content in both states
    pub fn unchanged_paths(&self, other: &TaskFileState) -> Vec<String> {
        self.0
            .iter()
            .filter(|(path, content)| other.0.get(*path) == Some(*content))
            .map(|(path, _)| path.clone())
            .collect()
    }

    /// Copy of this state without the given paths
    pub fn without_paths<'a>(&self, paths: impl IntoIterator<Item = &'a String>) -> TaskFileState {
        let mut result = self.clone();
        for path in paths {
            result.0.remove(path);
        }
        result
    }
}

impl FromIterator<(String, String)> for TaskFileState {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> FromIterator<(&'a str, &'a str)> for TaskFileState {
    fn from_iter<I: IntoIterator<Item = (&'a str, &'a str)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }
}
