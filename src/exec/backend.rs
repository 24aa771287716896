// src/exec/backend.rs

//! Pluggable executor abstraction.
//!
//! Schedulers talk to a `CommandExecutor` instead of spawning processes
//! themselves. This makes it easy to swap in a fake executor in tests while
//! keeping the production implementation in [`shell`](super::shell).

use std::future::Future;
use std::pin::Pin;

use super::shell::{ExecOutcome, Shell, run_shell_with};

/// Trait abstracting how a job's command is executed.
///
/// Implementations must not fail: every problem is reported through
/// [`ExecOutcome::failed`]. One executor is shared by all schedulers.
pub trait CommandExecutor: Send + Sync {
    fn execute<'a>(
        &'a self,
        command: &'a str,
    ) -> Pin<Box<dyn Future<Output = ExecOutcome> + Send + 'a>>;
}

/// Real executor used in production: `sh -c <command>` by default.
#[derive(Debug, Clone, Default)]
pub struct ShellExecutor {
    shell: Shell,
}

impl ShellExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run commands through `shell` instead of the platform default.
    pub fn with_shell(shell: Shell) -> Self {
        Self { shell }
    }

    pub fn shell(&self) -> &Shell {
        &self.shell
    }
}

impl CommandExecutor for ShellExecutor {
    fn execute<'a>(
        &'a self,
        command: &'a str,
    ) -> Pin<Box<dyn Future<Output = ExecOutcome> + Send + 'a>> {
        Box::pin(run_shell_with(&self.shell, command))
    }
}
