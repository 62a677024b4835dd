//! Dependency install workflow: preconditions, skip law, tool bootstrap.

#![allow(clippy::expect_used)]

use dabk_cli::application::services::install::install_dependencies;
use dabk_cli::domain::install::MANIFEST_ABSENT;
use dabk_cli::domain::{ContainerState, InstallContext, InstallError, InstallOutcome, RuntimeError};

use crate::mocks::{Call, FakeRuntime, Op, RecordingReporter};

const APP: &str = "p-app-container";

fn ctx() -> InstallContext {
    InstallContext::composer(APP, "/var/www/html")
}

fn running() -> FakeRuntime {
    FakeRuntime::new().with_container(APP, ContainerState::Running)
}

#[tokio::test]
async fn happy_path_with_tool_present() {
    let runtime = running();
    let outcome = install_dependencies(&runtime, &RecordingReporter::default(), &ctx())
        .await
        .expect("install");

    assert_eq!(outcome, InstallOutcome::Installed);
    assert_eq!(
        runtime.execs(),
        vec![
            "test -f /var/www/html/composer.json",
            "which composer",
            "composer install --no-interaction --optimize-autoloader",
        ]
    );
}

#[tokio::test]
async fn install_command_runs_in_working_directory() {
    let runtime = running();
    install_dependencies(&runtime, &RecordingReporter::default(), &ctx())
        .await
        .expect("install");

    let last = runtime.calls().pop().expect("at least one call");
    assert_eq!(
        last,
        Call::Exec {
            container: APP.into(),
            argv: ["composer", "install", "--no-interaction", "--optimize-autoloader"]
                .map(String::from)
                .to_vec(),
            workdir: Some("/var/www/html".into()),
        }
    );
}

#[tokio::test]
async fn missing_manifest_skips_without_touching_the_tool() {
    let runtime = running().with_exec_exit("test -f", 1);
    let outcome = install_dependencies(&runtime, &RecordingReporter::default(), &ctx())
        .await
        .expect("skip is success");

    assert_eq!(
        outcome,
        InstallOutcome::Skipped {
            reason: MANIFEST_ABSENT.into()
        }
    );
    assert_eq!(runtime.execs(), vec!["test -f /var/www/html/composer.json"]);
}

#[tokio::test]
async fn missing_tool_is_bootstrapped_before_install() {
    let runtime = running().with_exec_exit("which", 1);
    let outcome = install_dependencies(&runtime, &RecordingReporter::default(), &ctx())
        .await
        .expect("install");

    assert_eq!(outcome, InstallOutcome::Installed);
    let execs = runtime.execs();
    assert_eq!(execs.len(), 6, "{execs:?}");
    assert!(execs[2].starts_with("php -r copy("));
    assert!(execs[3].starts_with("php /tmp/composer-setup.php"));
    assert_eq!(execs[4], "rm /tmp/composer-setup.php");
    assert!(execs[5].starts_with("composer install"));
}

#[tokio::test]
async fn present_tool_is_never_bootstrapped() {
    let runtime = running();
    install_dependencies(&runtime, &RecordingReporter::default(), &ctx())
        .await
        .expect("install");
    assert!(!runtime.execs().iter().any(|e| e.starts_with("php")));
}

#[tokio::test]
async fn stopped_container_fails_before_any_exec() {
    let runtime = FakeRuntime::new().with_container(
        APP,
        ContainerState::Stopped {
            status: "exited".into(),
        },
    );
    let err = install_dependencies(&runtime, &RecordingReporter::default(), &ctx())
        .await
        .expect_err("must fail");

    assert!(
        matches!(&err, InstallError::ContainerNotRunning { name, status } if name == APP && status == "exited"),
        "{err:?}"
    );
    assert!(runtime.execs().is_empty());
}

#[tokio::test]
async fn absent_container_fails_before_any_exec() {
    let runtime = FakeRuntime::new();
    let err = install_dependencies(&runtime, &RecordingReporter::default(), &ctx())
        .await
        .expect_err("must fail");

    assert!(matches!(err, InstallError::ContainerNotRunning { .. }));
    assert!(runtime.execs().is_empty());
}

#[tokio::test]
async fn failed_installer_download_aborts_without_install() {
    let runtime = running()
        .with_exec_exit("which", 1)
        .with_exec_exit("php -r", 1);
    let err = install_dependencies(&runtime, &RecordingReporter::default(), &ctx())
        .await
        .expect_err("must fail");

    match err {
        InstallError::ToolInstallFailed { tool, step, code, .. } => {
            assert_eq!(tool, "composer");
            assert_eq!(step, "download Composer installer");
            assert_eq!(code, 1);
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(!runtime.execs().iter().any(|e| e.starts_with("composer")));
}

#[tokio::test]
async fn failed_cleanup_only_warns() {
    let runtime = running().with_exec_exit("which", 1).with_exec_exit("rm ", 1);
    let reporter = RecordingReporter::default();
    let outcome = install_dependencies(&runtime, &reporter, &ctx())
        .await
        .expect("cleanup failure is not fatal");

    assert_eq!(outcome, InstallOutcome::Installed);
    assert!(
        reporter
            .warnings()
            .iter()
            .any(|w| w.contains("remove Composer installer")),
        "{:?}",
        reporter.events()
    );
}

#[tokio::test]
async fn failing_install_command_reports_exit_code() {
    let runtime = running().with_exec_exit("composer install", 2);
    let err = install_dependencies(&runtime, &RecordingReporter::default(), &ctx())
        .await
        .expect_err("must fail");

    assert!(
        matches!(&err, InstallError::InstallCommandFailed { code: 2, command } if command.starts_with("composer install")),
        "{err:?}"
    );
}

#[tokio::test]
async fn unreachable_runtime_is_a_runtime_error() {
    let runtime = FakeRuntime::new().failing(
        Op::Inspect,
        RuntimeError::Connectivity("Cannot connect to the Docker daemon".into()),
    );
    let err = install_dependencies(&runtime, &RecordingReporter::default(), &ctx())
        .await
        .expect_err("must fail");

    assert!(matches!(err, InstallError::Runtime(RuntimeError::Connectivity(_))));
}
