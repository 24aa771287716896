// src/engine/coordinator.rs

//! Owns a set of jobs for one run: grouping, launching schedulers, and the
//! cancellation tree used for coordinated shutdown.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use crate::exec::CommandExecutor;
use crate::job::{Group, Job, JobSpec, SharedJob, SlotKey, group_jobs, keyed};

use super::{JobScheduler, UpdateSink};

/// Canonical owner of a job set.
///
/// Built once from the job source; [`Coordinator::start`] launches one
/// scheduler per job and returns a [`RunHandle`] for shutdown.
pub struct Coordinator {
    jobs: Vec<SharedJob>,
    groups: Vec<Group<SharedJob>>,
    executor: Arc<dyn CommandExecutor>,
    sink: Arc<dyn UpdateSink>,
}

impl fmt::Debug for Coordinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Coordinator")
            .field("jobs", &self.jobs.len())
            .field("groups", &self.groups.len())
            .finish_non_exhaustive()
    }
}

impl Coordinator {
    pub fn new(
        specs: Vec<JobSpec>,
        executor: Arc<dyn CommandExecutor>,
        sink: Arc<dyn UpdateSink>,
    ) -> Self {
        let jobs: Vec<SharedJob> = specs.into_iter().map(Job::shared).collect();
        let groups = group_jobs(jobs.iter().cloned());
        Self {
            jobs,
            groups,
            executor,
            sink,
        }
    }

    /// Jobs in input order.
    pub fn jobs(&self) -> &[SharedJob] {
        &self.jobs
    }

    /// Display groups, in group order.
    pub fn groups(&self) -> &[Group<SharedJob>] {
        &self.groups
    }

    /// Look up a job by its pane key.
    pub fn job_at(&self, key: SlotKey) -> Option<&SharedJob> {
        member_at(&self.groups, key)
    }

    /// Launch one scheduler per job.
    ///
    /// Consumes the coordinator: each job gets exactly one scheduler, and
    /// the jobs stay reachable through the returned handle.
    ///
    /// The run gets its own token derived from `parent`, and every job a
    /// child of that, so cancelling `parent` (or the returned handle) stops
    /// all of them. Must be called from within a Tokio runtime.
    pub fn start(self, parent: &CancellationToken) -> RunHandle {
        let root = parent.child_token();

        // Tokens are all created before anything is spawned; the map is
        // read-only afterwards.
        let cancels: HashMap<SlotKey, CancellationToken> = keyed(&self.groups)
            .map(|(key, _)| (key, root.child_token()))
            .collect();

        let mut tasks = Vec::with_capacity(cancels.len());
        for (key, job) in keyed(&self.groups) {
            let Some(token) = cancels.get(&key) else {
                continue;
            };
            let scheduler = JobScheduler::new(
                key,
                Arc::clone(job),
                Arc::clone(&self.executor),
                Arc::clone(&self.sink),
                token.clone(),
            );
            debug!(job = %job.name(), %key, "launching scheduler");
            tasks.push((key, tokio::spawn(scheduler.run())));
        }

        info!(
            jobs = tasks.len(),
            groups = self.groups.len(),
            "all schedulers launched"
        );

        RunHandle {
            jobs: self.jobs,
            groups: self.groups,
            root,
            cancels,
            tasks,
        }
    }
}

fn member_at(groups: &[Group<SharedJob>], key: SlotKey) -> Option<&SharedJob> {
    groups
        .get(key.group)
        .and_then(|group| group.members().nth(key.slot))
}

/// Handle to a running job set.
pub struct RunHandle {
    jobs: Vec<SharedJob>,
    groups: Vec<Group<SharedJob>>,
    root: CancellationToken,
    cancels: HashMap<SlotKey, CancellationToken>,
    tasks: Vec<(SlotKey, JoinHandle<()>)>,
}

impl fmt::Debug for RunHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RunHandle")
            .field("cancelled", &self.root.is_cancelled())
            .field("schedulers", &self.tasks.len())
            .finish()
    }
}

impl RunHandle {
    /// Jobs in input order.
    pub fn jobs(&self) -> &[SharedJob] {
        &self.jobs
    }

    pub fn groups(&self) -> &[Group<SharedJob>] {
        &self.groups
    }

    pub fn job_at(&self, key: SlotKey) -> Option<&SharedJob> {
        member_at(&self.groups, key)
    }

    /// Keys of every launched scheduler, sorted.
    pub fn keys(&self) -> Vec<SlotKey> {
        let mut keys: Vec<SlotKey> = self.cancels.keys().copied().collect();
        keys.sort();
        keys
    }

    pub fn is_cancelled(&self) -> bool {
        self.root.is_cancelled()
    }

    /// Stop a single job's scheduler. Returns false for an unknown key.
    pub fn cancel_job(&self, key: SlotKey) -> bool {
        match self.cancels.get(&key) {
            Some(token) => {
                info!(%key, "cancelling single job");
                token.cancel();
                true
            }
            None => false,
        }
    }

    /// Number of schedulers that have not exited yet.
    pub fn active(&self) -> usize {
        self.tasks
            .iter()
            .filter(|(_, handle)| !handle.is_finished())
            .count()
    }

    /// Cancel every scheduler and wait until all of them have exited.
    ///
    /// Commands that are already running finish first; no new run starts
    /// after the cancellation is observed.
    pub async fn shutdown(self) {
        info!("shutdown requested; cancelling all schedulers");
        self.root.cancel();
        self.join_all().await;
        info!("all schedulers exited");
    }

    /// Wait for every scheduler to exit on its own (all one-shot jobs).
    pub async fn wait(self) {
        self.join_all().await;
    }

    async fn join_all(self) {
        for (key, handle) in self.tasks {
            if let Err(err) = handle.await {
                error!(%key, error = %err, "scheduler task ended abnormally");
            }
        }
    }
}
