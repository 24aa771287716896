// src/job/mod.rs

//! Job definitions and their shared run state.
//!
//! - [`JobSpec`] is the immutable command definition coming from a job file.
//! - [`Job`] pairs a spec with its mutable [`JobState`], guarded by a lock.
//!   The job's scheduler is the only writer; the dashboard reads snapshots.
//! - [`group`] packs jobs into display groups.

pub mod group;

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

pub use group::{Group, SlotKey, group_jobs, keyed};

/// Immutable definition of one dashboard job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobSpec {
    /// Display label.
    pub name: String,
    /// Shell command line, run through `sh -c`.
    pub command: String,
    /// Repeat interval; zero means run once.
    pub repeat: Duration,
}

impl JobSpec {
    pub fn new(name: impl Into<String>, command: impl Into<String>, repeat: Duration) -> Self {
        Self {
            name: name.into(),
            command: command.into(),
            repeat,
        }
    }

    /// Build a spec from a whole-second interval as written in job files.
    ///
    /// `repeat <= 0` is treated as one-shot.
    pub fn from_secs(name: impl Into<String>, command: impl Into<String>, repeat: i64) -> Self {
        let secs = u64::try_from(repeat).unwrap_or(0);
        Self::new(name, command, Duration::from_secs(secs))
    }

    /// Same job, but forced to run only once.
    pub fn into_one_shot(mut self) -> Self {
        self.repeat = Duration::ZERO;
        self
    }
}

/// Anything that has a repeat interval and can therefore be grouped.
pub trait Cadence {
    fn interval(&self) -> Duration;

    fn is_repeating(&self) -> bool {
        !self.interval().is_zero()
    }
}

impl Cadence for JobSpec {
    fn interval(&self) -> Duration {
        self.repeat
    }
}

impl Cadence for Job {
    fn interval(&self) -> Duration {
        self.spec.repeat
    }
}

impl<T: Cadence + ?Sized> Cadence for &T {
    fn interval(&self) -> Duration {
        (**self).interval()
    }
}

impl<T: Cadence + ?Sized> Cadence for Arc<T> {
    fn interval(&self) -> Duration {
        (**self).interval()
    }
}

/// Lifecycle status of a job.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum JobStatus {
    #[default]
    Pending,
    Running,
    Completed,
    Failed { reason: Option<String> },
}

impl JobStatus {
    pub fn is_failed(&self) -> bool {
        matches!(self, JobStatus::Failed { .. })
    }

    /// True once at least one run has finished.
    pub fn is_finished(&self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed { .. })
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobStatus::Pending => f.write_str("Pending"),
            JobStatus::Running => f.write_str("Running"),
            JobStatus::Completed => f.write_str("Completed"),
            JobStatus::Failed { reason: None } => f.write_str("Failed"),
            JobStatus::Failed { reason: Some(reason) } => write!(f, "Failed: {reason}"),
        }
    }
}

/// Mutable state of a job, as last written by its scheduler.
#[derive(Debug, Clone, Default)]
pub struct JobState {
    pub status: JobStatus,
    /// Combined stdout/stderr of the most recent finished run.
    pub output: String,
    pub running: bool,
    /// Number of finished runs.
    pub runs: u64,
    pub last_finished: Option<Instant>,
}

/// A job definition together with its lock-guarded run state.
#[derive(Debug)]
pub struct Job {
    spec: JobSpec,
    state: Mutex<JobState>,
}

/// Jobs are shared between their scheduler and the dashboard.
pub type SharedJob = Arc<Job>;

impl Job {
    pub fn new(spec: JobSpec) -> Self {
        Self {
            spec,
            state: Mutex::new(JobState::default()),
        }
    }

    pub fn shared(spec: JobSpec) -> SharedJob {
        Arc::new(Self::new(spec))
    }

    pub fn spec(&self) -> &JobSpec {
        &self.spec
    }

    pub fn name(&self) -> &str {
        &self.spec.name
    }

    pub fn command(&self) -> &str {
        &self.spec.command
    }

    /// Clone of the current state, taken under the lock.
    pub fn snapshot(&self) -> JobState {
        self.lock().clone()
    }

    /// Mark the job as running.
    ///
    /// Returns the new status and the output of the previous run, which
    /// stays visible while the command executes.
    pub(crate) fn mark_running(&self) -> (JobStatus, String) {
        let mut state = self.lock();
        state.status = JobStatus::Running;
        state.running = true;
        (state.status.clone(), state.output.clone())
    }

    /// Record the result of a finished run.
    ///
    /// Returns the status/output pair that was written so the caller can
    /// notify after the lock has been released.
    pub(crate) fn record_run(&self, status: JobStatus, output: String) -> (JobStatus, String) {
        let mut state = self.lock();
        state.status = status;
        state.output = output;
        state.running = false;
        state.runs += 1;
        state.last_finished = Some(Instant::now());
        (state.status.clone(), state.output.clone())
    }

    // Poisoning is ignored: the state is plain data.
    fn lock(&self) -> MutexGuard<'_, JobState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
