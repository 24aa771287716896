// src/engine/scheduler.rs

//! Per-job run/repeat loop.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::exec::{CommandExecutor, ExecOutcome};
use crate::job::{Cadence, JobStatus, SharedJob, SlotKey};

use super::{JobUpdate, UpdateSink};

/// Drives one job: run the command, publish the result, sleep, repeat.
///
/// A scheduler is the only writer of its job's state. It stops when its
/// cancellation token fires, or after the first run of a one-shot job.
pub struct JobScheduler {
    key: SlotKey,
    job: SharedJob,
    executor: Arc<dyn CommandExecutor>,
    sink: Arc<dyn UpdateSink>,
    cancel: CancellationToken,
}

impl JobScheduler {
    pub fn new(
        key: SlotKey,
        job: SharedJob,
        executor: Arc<dyn CommandExecutor>,
        sink: Arc<dyn UpdateSink>,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            key,
            job,
            executor,
            sink,
            cancel,
        }
    }

    /// Main loop.
    ///
    /// Cancellation is observed before every run and during the interval
    /// sleep. A command that has already started is allowed to finish.
    pub async fn run(self) {
        let interval = self.job.interval();
        debug!(
            job = %self.job.name(),
            key = %self.key,
            ?interval,
            "scheduler started"
        );

        loop {
            if self.cancel.is_cancelled() {
                info!(job = %self.job.name(), key = %self.key, "cancelling");
                break;
            }

            let (status, previous_output) = self.job.mark_running();
            self.publish(status, previous_output);

            let outcome = self.executor.execute(self.job.command()).await;
            self.finish_run(outcome);

            if interval.is_zero() {
                debug!(job = %self.job.name(), key = %self.key, "one-shot job done");
                break;
            }

            tokio::select! {
                biased;
                _ = self.cancel.cancelled() => {
                    info!(job = %self.job.name(), key = %self.key, "cancelled while waiting for next run");
                    break;
                }
                _ = tokio::time::sleep(interval) => {}
            }
        }

        debug!(job = %self.job.name(), key = %self.key, "scheduler exited");
    }

    fn finish_run(&self, outcome: ExecOutcome) {
        let status = if outcome.failed {
            JobStatus::Failed {
                reason: outcome.reason,
            }
        } else {
            JobStatus::Completed
        };

        info!(
            job = %self.job.name(),
            key = %self.key,
            status = %status,
            "run finished"
        );

        // Lock is released inside record_run, before notifying.
        let (status, output) = self.job.record_run(status, outcome.output);
        self.publish(status, output);
    }

    fn publish(&self, status: JobStatus, output: String) {
        if self.cancel.is_cancelled() {
            debug!(job = %self.job.name(), key = %self.key, "shutdown requested; update not sent");
            return;
        }
        self.sink.notify(JobUpdate {
            key: self.key,
            name: self.job.name().to_string(),
            status,
            output,
        });
    }
}
