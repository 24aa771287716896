use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tiledash::exec::{CommandExecutor, ExecOutcome};
use tokio::time::Instant;

/// One recorded `execute` call.
#[derive(Debug, Clone)]
pub struct Call {
    pub command: String,
    pub started: Instant,
    pub finished: Instant,
}

#[derive(Debug, Default)]
struct Inner {
    calls: Vec<Call>,
    in_flight: HashMap<String, usize>,
    max_in_flight: HashMap<String, usize>,
}

/// A fake executor that:
/// - records every command it was asked to run, with start/finish times
/// - optionally takes `delay` (tokio time) per run
/// - returns a scripted outcome per command, or success with `ran <cmd>`.
#[derive(Clone, Default)]
pub struct FakeExecutor {
    inner: Arc<Mutex<Inner>>,
    outcomes: Arc<HashMap<String, ExecOutcome>>,
    delay: Duration,
}

impl FakeExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_outcome(mut self, command: &str, outcome: ExecOutcome) -> Self {
        Arc::make_mut(&mut self.outcomes).insert(command.to_string(), outcome);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.inner.lock().unwrap().calls.clone()
    }

    pub fn count(&self, command: &str) -> usize {
        self.inner
            .lock()
            .unwrap()
            .calls
            .iter()
            .filter(|c| c.command == command)
            .count()
    }

    /// Highest number of simultaneous runs seen for `command`.
    pub fn max_in_flight(&self, command: &str) -> usize {
        self.inner
            .lock()
            .unwrap()
            .max_in_flight
            .get(command)
            .copied()
            .unwrap_or(0)
    }

    /// Number of runs of `command` currently executing.
    pub fn in_flight(&self, command: &str) -> usize {
        self.inner
            .lock()
            .unwrap()
            .in_flight
            .get(command)
            .copied()
            .unwrap_or(0)
    }
}

impl CommandExecutor for FakeExecutor {
    fn execute<'a>(
        &'a self,
        command: &'a str,
    ) -> Pin<Box<dyn Future<Output = ExecOutcome> + Send + 'a>> {
        Box::pin(async move {
            let started = Instant::now();
            {
                let mut guard = self.inner.lock().unwrap();
                let now = {
                    let n = guard.in_flight.entry(command.to_string()).or_insert(0);
                    *n += 1;
                    *n
                };
                let max = guard.max_in_flight.entry(command.to_string()).or_insert(0);
                *max = (*max).max(now);
            }

            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }

            {
                let mut guard = self.inner.lock().unwrap();
                if let Some(n) = guard.in_flight.get_mut(command) {
                    *n -= 1;
                }
                guard.calls.push(Call {
                    command: command.to_string(),
                    started,
                    finished: Instant::now(),
                });
            }

            self.outcomes
                .get(command)
                .cloned()
                .unwrap_or_else(|| ExecOutcome::success(format!("ran {command}\n")))
        })
    }
}
