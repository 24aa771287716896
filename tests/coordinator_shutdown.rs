// tests/coordinator_shutdown.rs

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::time::Duration;
use tokio_util::sync::CancellationToken;

use tiledash::engine::{Coordinator, JobUpdate, NullSink};
use tiledash::job::{JobStatus, SlotKey};
use tiledash_test_utils::builders::{one_shot, repeating};
use tiledash_test_utils::fake_executor::FakeExecutor;
use tiledash_test_utils::recording_sink::RecordingSink;
use tiledash_test_utils::{init_tracing, with_timeout};

#[tokio::test(start_paused = true)]
async fn keys_follow_the_group_layout() {
    init_tracing();

    let coord = Coordinator::new(
        vec![
            repeating("R1", "date", 5),
            one_shot("N1", "whoami"),
            one_shot("N2", "uname"),
            one_shot("N3", "hostname"),
            repeating("R2", "uptime", 10),
        ],
        Arc::new(FakeExecutor::new()),
        Arc::new(NullSink),
    );

    assert_eq!(coord.groups().len(), 2);
    assert_eq!(coord.job_at(SlotKey::new(1, 0)).map(|j| j.name()), Some("R2"));
    assert_eq!(coord.job_at(SlotKey::new(1, 1)).map(|j| j.name()), Some("N3"));
    assert!(coord.job_at(SlotKey::new(1, 2)).is_none());

    let handle = coord.start(&CancellationToken::new());
    assert_eq!(
        handle.keys(),
        vec![
            SlotKey::new(0, 0),
            SlotKey::new(0, 1),
            SlotKey::new(0, 2),
            SlotKey::new(1, 0),
            SlotKey::new(1, 1),
        ]
    );
    handle.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn shutdown_joins_every_scheduler() {
    init_tracing();

    let exec = FakeExecutor::new();
    let coord = Coordinator::new(
        vec![
            repeating("a", "a", 1),
            repeating("b", "b", 2),
            repeating("c", "c", 3),
        ],
        Arc::new(exec.clone()),
        Arc::new(NullSink),
    );

    let handle = coord.start(&CancellationToken::new());
    tokio::time::sleep(Duration::from_millis(4500)).await;
    assert_eq!(handle.active(), 3);

    with_timeout(handle.shutdown()).await;

    let after = exec.calls().len();
    tokio::time::sleep(Duration::from_secs(30)).await;
    assert_eq!(exec.calls().len(), after, "no run may start after shutdown");
}

#[tokio::test(start_paused = true)]
async fn cancelling_the_parent_token_stops_the_run() {
    init_tracing();

    let exec = FakeExecutor::new();
    let parent = CancellationToken::new();
    let coord = Coordinator::new(
        vec![repeating("a", "a", 2)],
        Arc::new(exec.clone()),
        Arc::new(NullSink),
    );

    let handle = coord.start(&parent);
    tokio::time::sleep(Duration::from_secs(3)).await;
    parent.cancel();
    assert!(handle.is_cancelled());

    with_timeout(handle.wait()).await;
    assert_eq!(exec.count("a"), 2);
}

#[tokio::test(start_paused = true)]
async fn in_flight_run_finishes_but_is_not_published() {
    init_tracing();

    let exec = FakeExecutor::new().with_delay(Duration::from_secs(10));
    let sink = RecordingSink::new();
    let coord = Coordinator::new(
        vec![repeating("slow", "slow", 1)],
        Arc::new(exec.clone()),
        Arc::new(sink.clone()),
    );

    let jobs = coord.jobs().to_vec();
    let handle = coord.start(&CancellationToken::new());
    tokio::time::sleep(Duration::from_secs(2)).await;
    assert_eq!(exec.in_flight("slow"), 1);

    handle.shutdown().await;

    // The command ran to completion and its result was stored...
    assert_eq!(exec.calls().len(), 1);
    let state = jobs[0].snapshot();
    assert_eq!(state.status, JobStatus::Completed);
    assert_eq!(state.runs, 1);

    // ...but the sink only saw the initial Running notification.
    assert_eq!(sink.statuses(SlotKey::new(0, 0)), vec![JobStatus::Running]);
}

#[tokio::test(start_paused = true)]
async fn cancel_job_stops_only_that_job() {
    init_tracing();

    let exec = FakeExecutor::new();
    let coord = Coordinator::new(
        vec![repeating("a", "a", 1), repeating("b", "b", 1)],
        Arc::new(exec.clone()),
        Arc::new(NullSink),
    );

    let handle = coord.start(&CancellationToken::new());
    tokio::time::sleep(Duration::from_millis(500)).await;

    assert!(handle.cancel_job(SlotKey::new(0, 0)));
    assert!(!handle.cancel_job(SlotKey::new(9, 9)));

    tokio::time::sleep(Duration::from_secs(5)).await;
    assert_eq!(handle.active(), 1);
    handle.shutdown().await;

    // `a` ran only at t = 0; `b` kept its cadence.
    assert_eq!(exec.count("a"), 1);
    assert_eq!(exec.count("b"), 6);
}

#[tokio::test(start_paused = true)]
async fn channel_sink_receives_updates() {
    init_tracing();

    let (tx, mut rx) = mpsc::unbounded_channel::<JobUpdate>();
    let coord = Coordinator::new(
        vec![one_shot("one", "echo one")],
        Arc::new(FakeExecutor::new()),
        Arc::new(tx),
    );

    coord.start(&CancellationToken::new()).wait().await;

    let mut seen = Vec::new();
    while let Some(update) = rx.recv().await {
        seen.push(update);
    }

    assert_eq!(seen.len(), 2);
    assert_eq!(seen[0].status, JobStatus::Running);
    assert_eq!(seen[1].status, JobStatus::Completed);
    assert_eq!(seen[1].name, "one");
    assert_eq!(seen[1].output, "ran echo one\n");
}

#[tokio::test(start_paused = true)]
async fn each_job_has_a_single_scheduler() {
    init_tracing();

    // Runs last longer than the interval, so a second scheduler on the same
    // job would overlap with the first.
    let exec = FakeExecutor::new().with_delay(Duration::from_secs(2));
    let coord = Coordinator::new(
        vec![repeating("busy", "busy", 1)],
        Arc::new(exec.clone()),
        Arc::new(NullSink),
    );
    let job = Arc::clone(&coord.jobs()[0]);

    let handle = coord.start(&CancellationToken::new());
    assert_eq!(handle.keys().len(), 1);
    assert!(Arc::ptr_eq(&handle.jobs()[0], &job));
    assert!(
        handle
            .job_at(SlotKey::new(0, 0))
            .is_some_and(|j| Arc::ptr_eq(j, &job))
    );

    tokio::time::sleep(Duration::from_secs(10)).await;
    handle.shutdown().await;

    // Starts at t = 0, 3, 6, 9; the last one finishes during shutdown.
    assert_eq!(exec.max_in_flight("busy"), 1);
    assert_eq!(exec.count("busy"), 4);
    assert_eq!(job.snapshot().runs, 4);
}
