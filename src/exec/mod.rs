// src/exec/mod.rs

//! Process execution layer.
//!
//! This module is responsible for actually running job commands, using
//! `tokio::process::Command`, and handing the captured result back to the
//! job's scheduler.
//!
//! - [`shell`] runs one command line and merges stdout/stderr.
//! - [`backend`] provides the `CommandExecutor` trait and the concrete
//!   `ShellExecutor` used in production, which tests can replace with a
//!   fake implementation.

pub mod backend;
pub mod shell;

pub use backend::{CommandExecutor, ShellExecutor};
pub use shell::{ExecOutcome, Shell, run_shell, run_shell_with};
