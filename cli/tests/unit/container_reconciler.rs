//! Container reconciler: every (observed state, rebuild intent) combination.

#![allow(clippy::expect_used)]

use dabk_cli::application::services::container::reconcile;
use dabk_cli::domain::{ContainerSpec, ContainerState, ReconcileOutcome, RuntimeError};

use crate::helpers::plan;
use crate::mocks::{Call, FakeRuntime, Op, RecordingReporter};

const APP: &str = "p-app-container";

fn app_spec() -> ContainerSpec {
    plan(&[]).containers.remove(0)
}

fn stopped() -> ContainerState {
    ContainerState::Stopped {
        status: "exited".into(),
    }
}

fn fresh_build() -> Vec<Call> {
    vec![Call::Build(APP.into()), Call::Run(APP.into())]
}

fn removal() -> Call {
    Call::Remove {
        name: APP.into(),
        prune_volumes: true,
    }
}

async fn run(runtime: &FakeRuntime, rebuild: bool) -> ReconcileOutcome {
    reconcile(runtime, &RecordingReporter::default(), &app_spec(), rebuild)
        .await
        .expect("reconcile")
}

#[tokio::test]
async fn absent_without_rebuild_builds_and_starts() {
    let runtime = FakeRuntime::new();
    assert_eq!(run(&runtime, false).await, ReconcileOutcome::Started);
    assert_eq!(runtime.mutations(), fresh_build());
    assert_eq!(runtime.state_of(APP), ContainerState::Running);
}

#[tokio::test]
async fn absent_with_rebuild_builds_and_starts() {
    let runtime = FakeRuntime::new();
    assert_eq!(run(&runtime, true).await, ReconcileOutcome::Started);
    assert_eq!(runtime.mutations(), fresh_build());
}

#[tokio::test]
async fn running_without_rebuild_makes_no_changes() {
    let runtime = FakeRuntime::new().with_container(APP, ContainerState::Running);
    assert_eq!(run(&runtime, false).await, ReconcileOutcome::AlreadyRunning);
    assert!(runtime.mutations().is_empty(), "{:?}", runtime.calls());
}

#[tokio::test]
async fn stopped_without_rebuild_only_starts() {
    let runtime = FakeRuntime::new().with_container(APP, stopped());
    assert_eq!(run(&runtime, false).await, ReconcileOutcome::Started);
    assert_eq!(runtime.mutations(), vec![Call::Start(APP.into())]);
}

#[tokio::test]
async fn created_status_counts_as_stopped() {
    let runtime = FakeRuntime::new().with_container(
        APP,
        ContainerState::Stopped {
            status: "created".into(),
        },
    );
    assert_eq!(run(&runtime, false).await, ReconcileOutcome::Started);
    assert_eq!(runtime.mutations(), vec![Call::Start(APP.into())]);
}

#[tokio::test]
async fn running_with_rebuild_stops_removes_then_rebuilds() {
    let runtime = FakeRuntime::new().with_container(APP, ContainerState::Running);
    assert_eq!(run(&runtime, true).await, ReconcileOutcome::Rebuilt);

    let mut expected = vec![Call::Stop(APP.into()), removal()];
    expected.extend(fresh_build());
    assert_eq!(runtime.mutations(), expected);
    assert_eq!(runtime.state_of(APP), ContainerState::Running);
}

#[tokio::test]
async fn stopped_with_rebuild_removes_without_stopping() {
    let runtime = FakeRuntime::new().with_container(APP, stopped());
    assert_eq!(run(&runtime, true).await, ReconcileOutcome::Rebuilt);

    let mut expected = vec![removal()];
    expected.extend(fresh_build());
    assert_eq!(runtime.mutations(), expected);
}

#[tokio::test]
async fn state_is_inspected_first() {
    let runtime = FakeRuntime::new().with_container(APP, ContainerState::Running);
    run(&runtime, true).await;
    assert_eq!(runtime.calls()[0], Call::Inspect(APP.into()));
}

#[tokio::test]
async fn second_run_is_idempotent() {
    let runtime = FakeRuntime::new();
    assert_eq!(run(&runtime, false).await, ReconcileOutcome::Started);
    let after_first = runtime.mutations().len();
    assert_eq!(run(&runtime, false).await, ReconcileOutcome::AlreadyRunning);
    assert_eq!(runtime.mutations().len(), after_first);
}

#[tokio::test]
async fn build_failure_leaves_no_container_started() {
    let runtime = FakeRuntime::new().failing(
        Op::Build,
        RuntimeError::operation("docker build", "failed to solve"),
    );
    let err = reconcile(&runtime, &RecordingReporter::default(), &app_spec(), false)
        .await
        .expect_err("build must fail");

    assert!(matches!(err, RuntimeError::Operation { operation: "docker build", .. }));
    assert!(!runtime.calls().contains(&Call::Run(APP.into())));
}

#[tokio::test]
async fn build_output_is_forwarded_to_reporter() {
    let runtime = FakeRuntime::new();
    let reporter = RecordingReporter::default();
    reconcile(&runtime, &reporter, &app_spec(), false)
        .await
        .expect("reconcile");

    assert!(
        reporter
            .events()
            .iter()
            .any(|e| e.starts_with("detail: Step 1/1")),
        "{:?}",
        reporter.events()
    );
}
