// src/engine/mod.rs

//! Concurrent job execution engine.
//!
//! This module ties together:
//! - one [`JobScheduler`] per job, driving its run/repeat loop
//! - the [`Coordinator`], which groups jobs, launches schedulers, and owns
//!   the cancellation tree
//! - the [`UpdateSink`] seam through which status changes leave the engine
//!
//! The engine never renders anything itself; the dashboard (or the headless
//! printer) implements `UpdateSink` and reads job snapshots.

use tokio::sync::mpsc;

use crate::job::{JobStatus, SlotKey};

pub mod coordinator;
pub mod scheduler;

pub use coordinator::{Coordinator, RunHandle};
pub use scheduler::JobScheduler;

/// A status change of one job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobUpdate {
    pub key: SlotKey,
    pub name: String,
    pub status: JobStatus,
    pub output: String,
}

/// Consumer of job updates.
///
/// `notify` is called from scheduler tasks and must return promptly; it is
/// fire-and-forget, so delivery failures are the sink's own business.
pub trait UpdateSink: Send + Sync {
    fn notify(&self, update: JobUpdate);
}

impl UpdateSink for mpsc::UnboundedSender<JobUpdate> {
    fn notify(&self, update: JobUpdate) {
        // The receiver may already be gone during teardown.
        let _ = self.send(update);
    }
}

/// Sink that drops every update.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl UpdateSink for NullSink {
    fn notify(&self, _update: JobUpdate) {}
}
