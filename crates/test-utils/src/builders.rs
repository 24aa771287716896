#![allow(dead_code)]

use std::time::Duration;

use tiledash::config::{JobConfig, JobFile, RawJobFile};
use tiledash::job::JobSpec;

/// Repeating job spec with an interval in seconds.
pub fn repeating(name: &str, command: &str, secs: u64) -> JobSpec {
    JobSpec::new(name, command, Duration::from_secs(secs))
}

/// One-shot job spec.
pub fn one_shot(name: &str, command: &str) -> JobSpec {
    JobSpec::new(name, command, Duration::ZERO)
}

/// Builder for `JobFile` to simplify test setup.
pub struct JobFileBuilder {
    raw: RawJobFile,
}

impl JobFileBuilder {
    pub fn new() -> Self {
        Self {
            raw: RawJobFile::default(),
        }
    }

    pub fn with_job(mut self, name: &str, command: &str, repeat: i64) -> Self {
        self.raw.commands.push(JobConfig {
            name: name.to_string(),
            command: command.to_string(),
            repeat,
        });
        self
    }

    pub fn build_raw(self) -> RawJobFile {
        self.raw
    }

    pub fn build(self) -> JobFile {
        JobFile::try_from(self.raw).expect("Failed to build valid job file from builder")
    }
}

impl Default for JobFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}
