// src/lib.rs

pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod job;
pub mod logging;
pub mod ui;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::cli::CliArgs;
use crate::config::{JobFile, load_and_validate};
use crate::engine::{Coordinator, RunHandle};
use crate::exec::{CommandExecutor, ShellExecutor};
use crate::job::{Cadence, JobSpec, group_jobs, keyed};
use crate::ui::{Dashboard, Page, PageSink, PageUpdate};

/// A loaded job file together with where it came from.
#[derive(Debug, Clone)]
pub struct LoadedFile {
    pub path: PathBuf,
    pub file: JobFile,
}

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - job file loading
/// - one coordinator per job file (one dashboard page each)
/// - the shell executor
/// - the dashboard, or the headless printer for `--once`
/// - Ctrl-C handling
pub async fn run(args: CliArgs) -> Result<()> {
    let files = load_job_files(&args.configs)?;

    if args.dry_run {
        print_dry_run(&files);
        return Ok(());
    }

    let executor: Arc<dyn CommandExecutor> = Arc::new(ShellExecutor::new());
    let shutdown = CancellationToken::new();

    // Ctrl-C → graceful shutdown.
    {
        let token = shutdown.clone();
        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!(error = %e, "failed to listen for Ctrl+C");
                return;
            }
            info!("Ctrl+C received; shutting down");
            token.cancel();
        });
    }

    if args.once {
        run_once(files, executor, shutdown).await
    } else {
        run_dashboard(files, executor, shutdown).await
    }
}

/// Load and validate every job file, in the order given.
pub fn load_job_files(paths: &[PathBuf]) -> Result<Vec<LoadedFile>> {
    if paths.is_empty() {
        anyhow::bail!("no job files provided");
    }
    paths
        .iter()
        .map(|path| -> Result<LoadedFile> {
            let file = load_and_validate(path)
                .with_context(|| format!("loading job file {}", path.display()))?;
            debug!(path = %path.display(), jobs = file.commands().len(), "job file loaded");
            Ok(LoadedFile {
                path: path.clone(),
                file,
            })
        })
        .collect()
}

/// Start one coordinator per file, each reporting through a `PageSink`.
fn start_pages(
    files: Vec<LoadedFile>,
    executor: &Arc<dyn CommandExecutor>,
    shutdown: &CancellationToken,
    tx: &mpsc::UnboundedSender<PageUpdate>,
    one_shot: bool,
) -> (Vec<Page>, Vec<RunHandle>) {
    let mut pages = Vec::with_capacity(files.len());
    let mut handles = Vec::with_capacity(files.len());

    for (idx, loaded) in files.into_iter().enumerate() {
        let mut specs = loaded.file.specs();
        if one_shot {
            specs = specs.into_iter().map(JobSpec::into_one_shot).collect();
        }

        let coordinator = Coordinator::new(
            specs,
            Arc::clone(executor),
            Arc::new(PageSink::new(idx, tx.clone())),
        );
        pages.push(Page::from_coordinator(display_path(&loaded.path), &coordinator));
        handles.push(coordinator.start(shutdown));
    }

    (pages, handles)
}

async fn run_dashboard(
    files: Vec<LoadedFile>,
    executor: Arc<dyn CommandExecutor>,
    shutdown: CancellationToken,
) -> Result<()> {
    let (tx, rx) = mpsc::unbounded_channel::<PageUpdate>();
    let (pages, handles) = start_pages(files, &executor, &shutdown, &tx, false);
    drop(tx);

    let dashboard = Dashboard::new(pages, rx, shutdown.clone());
    let ui_result = tokio::task::spawn_blocking(move || dashboard.run()).await;

    // However the UI ended, stop everything and wait for the schedulers.
    shutdown.cancel();
    info!("waiting for clean exit");
    for handle in handles {
        handle.shutdown().await;
    }
    info!("all jobs stopped; exiting");

    ui_result.context("dashboard thread panicked")?
}

async fn run_once(
    files: Vec<LoadedFile>,
    executor: Arc<dyn CommandExecutor>,
    shutdown: CancellationToken,
) -> Result<()> {
    let (tx, mut rx) = mpsc::unbounded_channel::<PageUpdate>();
    let (pages, handles) = start_pages(files, &executor, &shutdown, &tx, true);
    drop(tx);

    let titles: Vec<String> = pages.iter().map(|page| page.title.clone()).collect();
    let printer = tokio::spawn(async move {
        let mut failed = 0usize;
        while let Some(PageUpdate { page, update }) = rx.recv().await {
            if !update.status.is_finished() {
                continue;
            }
            if update.status.is_failed() {
                failed += 1;
            }
            let title = titles.get(page).map(String::as_str).unwrap_or("?");
            println!("==> {} [{} {}] {}", update.name, title, update.key, update.status);
            print!("{}", update.output);
            if !update.output.is_empty() && !update.output.ends_with('\n') {
                println!();
            }
        }
        failed
    });

    for handle in handles {
        handle.wait().await;
    }

    let failed = printer.await.context("output printer panicked")?;
    if failed > 0 {
        anyhow::bail!("{failed} job(s) failed");
    }
    Ok(())
}

fn display_path(path: &Path) -> String {
    path.display().to_string()
}

/// Simple dry-run output: pages, groups and slots.
fn print_dry_run(files: &[LoadedFile]) {
    println!("tiledash dry-run");
    println!();

    for (idx, loaded) in files.iter().enumerate() {
        let specs = loaded.file.specs();
        let groups = group_jobs(specs.iter());
        println!(
            "page {}: {} ({} jobs, {} groups)",
            idx + 1,
            display_path(&loaded.path),
            specs.len(),
            groups.len()
        );
        for (key, spec) in keyed(&groups) {
            let cadence = if spec.is_repeating() {
                format!("every {}s", spec.interval().as_secs())
            } else {
                "once".to_string()
            };
            println!("  [{key}] {} ({cadence})", spec.name);
            println!("      cmd: {}", spec.command);
        }
        println!();
    }

    debug!("dry-run complete (no execution)");
}
