//! Shared helpers for tiledash integration tests.

pub mod builders;
pub mod fake_executor;
pub mod recording_sink;

use std::future::Future;
use std::sync::Once;
use std::time::Duration;

use tracing_subscriber::{EnvFilter, fmt};

static TRACING: Once = Once::new();

/// Route scheduler and executor logs through the test harness.
///
/// Output is only shown for failing tests or with `--nocapture`;
/// `RUST_LOG=tiledash=debug` turns on the per-run events.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .init();
    });
}

/// Fail the test if `fut` takes longer than five seconds.
///
/// Under `start_paused` this is virtual time, so only wrap futures that do
/// not wait on longer job delays.
pub async fn with_timeout<F, T>(fut: F) -> T
where
    F: Future<Output = T>,
{
    tokio::time::timeout(Duration::from_secs(5), fut)
        .await
        .expect("future did not finish within 5s")
}
