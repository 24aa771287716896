// src/exec/shell.rs

//! Running a single command line through the platform shell.

use std::process::{ExitStatus, Stdio};

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Result of one command execution.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExecOutcome {
    /// Combined stdout and stderr, in arrival order.
    pub output: String,
    /// Non-zero exit, killed by a signal, or could not be launched.
    pub failed: bool,
    /// Short failure description, e.g. `exit status 2`.
    pub reason: Option<String>,
}

impl ExecOutcome {
    pub fn success(output: impl Into<String>) -> Self {
        Self {
            output: output.into(),
            failed: false,
            reason: None,
        }
    }

    pub fn failure(output: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            output: output.into(),
            failed: true,
            reason: Some(reason.into()),
        }
    }
}

/// Interpreter and flag used to run a command line, e.g. `sh -c`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shell {
    program: String,
    flag: String,
}

impl Shell {
    pub fn new(program: impl Into<String>, flag: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            flag: flag.into(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

impl Default for Shell {
    /// `cmd /C` on Windows, `sh -c` elsewhere.
    fn default() -> Self {
        if cfg!(windows) {
            Self::new("cmd", "/C")
        } else {
            Self::new("sh", "-c")
        }
    }
}

/// Run `command` through the platform shell and capture everything it prints.
pub async fn run_shell(command: &str) -> ExecOutcome {
    run_shell_with(&Shell::default(), command).await
}

/// Run `command` through `shell` and capture everything it prints.
///
/// Never returns an error: launch and wait failures become a failed outcome
/// whose output is the error text.
pub async fn run_shell_with(shell: &Shell, command: &str) -> ExecOutcome {
    match run_shell_inner(shell, command).await {
        Ok(outcome) => outcome,
        Err(err) => {
            warn!(cmd = %command, shell = %shell.program, error = %err, "command could not be executed");
            let text = format!("{err:#}");
            ExecOutcome::failure(text.clone(), text)
        }
    }
}

async fn run_shell_inner(shell: &Shell, command: &str) -> Result<ExecOutcome> {
    let mut cmd = Command::new(&shell.program);
    cmd.arg(&shell.flag).arg(command);

    // No kill_on_drop: an in-flight command is allowed to finish after
    // shutdown has been requested.
    cmd.stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    let mut child = cmd
        .spawn()
        .with_context(|| format!("spawning `{}` for `{command}`", shell.program))?;

    let (line_tx, mut line_rx) = mpsc::unbounded_channel::<String>();
    if let Some(stdout) = child.stdout.take() {
        forward_lines(stdout, line_tx.clone());
    }
    if let Some(stderr) = child.stderr.take() {
        forward_lines(stderr, line_tx.clone());
    }
    drop(line_tx);

    let mut output = String::new();
    while let Some(line) = line_rx.recv().await {
        output.push_str(&line);
    }

    let status = child
        .wait()
        .await
        .with_context(|| format!("waiting for `{command}`"))?;

    debug!(
        cmd = %command,
        exit_code = ?status.code(),
        success = status.success(),
        bytes = output.len(),
        "command exited"
    );

    Ok(outcome_from_status(status, output))
}

fn outcome_from_status(status: ExitStatus, output: String) -> ExecOutcome {
    if status.success() {
        return ExecOutcome::success(output);
    }
    let reason = match status.code() {
        Some(code) => format!("exit status {code}"),
        None => "terminated by signal".to_string(),
    };
    ExecOutcome::failure(output, reason)
}

/// Read `reader` line by line (keeping the newline) into `tx`.
///
/// Bytes are decoded lossily so binary output cannot stop the capture.
fn forward_lines<R>(reader: R, tx: mpsc::UnboundedSender<String>)
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut reader = BufReader::new(reader);
        let mut buf = Vec::new();
        loop {
            buf.clear();
            match reader.read_until(b'\n', &mut buf).await {
                Ok(0) => break,
                Ok(_) => {
                    if tx.send(String::from_utf8_lossy(&buf).into_owned()).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    debug!(error = %e, "stopped reading command output");
                    break;
                }
            }
        }
    });
}
