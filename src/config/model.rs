// src/config/model.rs

use serde::Deserialize;

use crate::job::JobSpec;

/// Job file as read from disk, before validation.
///
/// TOML:
///
/// ```toml
/// [[commands]]
/// name = "df"
/// command = "df -kh"
/// repeat = 5
///
/// [[commands]]
/// name = "whoami"
/// command = "whoami"
/// ```
///
/// YAML uses the same shape:
///
/// ```yaml
/// commands:
///   - name: df
///     command: df -kh
///     repeat: 5
/// ```
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawJobFile {
    #[serde(default)]
    pub commands: Vec<JobConfig>,
}

/// One entry of `commands`.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct JobConfig {
    /// Pane title.
    pub name: String,

    /// Shell command line.
    pub command: String,

    /// Repeat interval in whole seconds. Zero or negative runs once.
    #[serde(default)]
    pub repeat: i64,
}

impl JobConfig {
    pub fn to_spec(&self) -> JobSpec {
        JobSpec::from_secs(self.name.trim(), self.command.as_str(), self.repeat)
    }
}

/// A validated job file.
///
/// Only constructible through `TryFrom<RawJobFile>`, so holding one means
/// every entry has a name and a command.
#[derive(Debug, Clone)]
pub struct JobFile {
    commands: Vec<JobConfig>,
}

impl JobFile {
    pub(crate) fn new_unchecked(commands: Vec<JobConfig>) -> Self {
        Self { commands }
    }

    pub fn commands(&self) -> &[JobConfig] {
        &self.commands
    }

    /// Job specs in file order.
    pub fn specs(&self) -> Vec<JobSpec> {
        self.commands.iter().map(JobConfig::to_spec).collect()
    }
}
