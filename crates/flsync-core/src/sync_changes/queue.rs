//! Debounced coalescing update queue

use crate::course::{LessonId, TaskId};
use parking_lot::Mutex;
use std::collections::BTreeSet;
use std::time::Duration;
use tokio::sync::Notify;

/// Unit of tracker work
///
/// Ordering doubles as processing priority: file states are recomputed
/// before the task and lesson aggregates that read them.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SyncUpdate {
    /// Recompute file states; `None` means every file of the task
    TaskFiles {
        task: TaskId,
        files: Option<BTreeSet<String>>,
    },
    Task(TaskId),
    Lesson(LessonId),
    Project,
}

/// Set of pending keys with a restart-on-add quiet period
///
/// Equal keys queued before the consumer wakes up are merged into one.
pub struct UpdateQueue<K: Ord> {
    pending: Mutex<BTreeSet<K>>,
    notify: Notify,
    delay: Duration,
}

impl<K: Ord> UpdateQueue<K> {
    pub fn new(delay: Duration) -> Self {
        Self {
            pending: Mutex::new(BTreeSet::new()),
            notify: Notify::new(),
            delay,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Add `key`, restarting the quiet period
    pub fn queue(&self, key: K) {
        self.pending.lock().insert(key);
        self.notify.notify_one();
    }

    /// Remove and return every pending key in priority order
    pub fn take(&self) -> Vec<K> {
        std::mem::take(&mut *self.pending.lock())
            .into_iter()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.pending.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.lock().is_empty()
    }

    /// Resolve once keys are pending and nothing was added for `delay`
    pub async fn settled(&self) {
        while self.is_empty() {
            self.notify.notified().await;
        }
        while tokio::time::timeout(self.delay, self.notify.notified())
            .await
            .is_ok()
        {}
    }
}
