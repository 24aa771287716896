use std::sync::{Arc, Mutex};

use tiledash::engine::{JobUpdate, UpdateSink};
use tiledash::job::{JobStatus, SlotKey};

/// Update sink that keeps every update it receives, in arrival order.
#[derive(Clone, Default)]
pub struct RecordingSink {
    updates: Arc<Mutex<Vec<JobUpdate>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn updates(&self) -> Vec<JobUpdate> {
        self.updates.lock().unwrap().clone()
    }

    pub fn len(&self) -> usize {
        self.updates.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn for_key(&self, key: SlotKey) -> Vec<JobUpdate> {
        self.updates()
            .into_iter()
            .filter(|u| u.key == key)
            .collect()
    }

    /// Statuses published for `key`, in order.
    pub fn statuses(&self, key: SlotKey) -> Vec<JobStatus> {
        self.for_key(key).into_iter().map(|u| u.status).collect()
    }

    /// Number of finished runs (Completed or Failed) reported for `key`.
    pub fn finished_runs(&self, key: SlotKey) -> usize {
        self.for_key(key)
            .iter()
            .filter(|u| u.status.is_finished())
            .count()
    }
}

impl UpdateSink for RecordingSink {
    fn notify(&self, update: JobUpdate) {
        self.updates.lock().unwrap().push(update);
    }
}
