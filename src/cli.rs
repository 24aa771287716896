// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Command-line arguments for `tiledash`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "tiledash",
    version,
    about = "Run shell commands once or on a fixed interval and watch their output in a tiled terminal dashboard.",
    long_about = None
)]
pub struct CliArgs {
    /// Job files (TOML or YAML), comma-separated or repeated.
    ///
    /// Each file becomes one dashboard page.
    #[arg(
        long = "cfg",
        value_name = "PATH",
        value_delimiter = ',',
        default_value = "tiledash.toml"
    )]
    pub configs: Vec<PathBuf>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `TILEDASH_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Append logs to this file instead of discarding them while the
    /// dashboard owns the terminal.
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Run every job exactly once without the dashboard and print results.
    #[arg(long)]
    pub once: bool,

    /// Parse + validate, print pages and groups, but don't execute anything.
    #[arg(long)]
    pub dry_run: bool,
}

impl CliArgs {
    /// Whether the full-screen dashboard will take over the terminal.
    pub fn uses_dashboard(&self) -> bool {
        !self.once && !self.dry_run
    }
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
