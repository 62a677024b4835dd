//! Container reconciler: drive one container to "running with current image".
//!
//! Imports only from `crate::domain` and `crate::application::ports`.
//!
//! | observed | rebuild | action                                   | outcome        |
//! |----------|---------|------------------------------------------|----------------|
//! | absent   | any     | build, create + start                    | Started        |
//! | stopped  | no      | start                                    | Started        |
//! | running  | no      | nothing                                  | AlreadyRunning |
//! | stopped  | yes     | remove -v, build, create + start         | Rebuilt        |
//! | running  | yes     | stop, remove -v, build, create + start   | Rebuilt        |

use crate::application::ports::{ContainerInspector, ContainerLifecycle, ImageOps, ProgressReporter};
use crate::application::services::image;
use crate::domain::{ContainerSpec, ContainerState, ReconcileOutcome, RuntimeError};

/// Reconcile `spec` against the runtime.
///
/// The container state is inspected fresh on every call. Rebuild intent always
/// wins over reuse, and removal always precedes the build so the recreated
/// container cannot collide with the old name.
///
/// # Errors
///
/// Returns the first runtime error; steps already taken are left in place.
pub async fn reconcile(
    runtime: &(impl ContainerInspector + ContainerLifecycle + ImageOps),
    reporter: &impl ProgressReporter,
    spec: &ContainerSpec,
    rebuild: bool,
) -> Result<ReconcileOutcome, RuntimeError> {
    let observed = runtime.inspect_container(&spec.name).await?;
    tracing::info!(
        container = %spec.name,
        observed = observed.label(),
        rebuild,
        "reconciling container"
    );

    match (observed, rebuild) {
        (ContainerState::Absent, _) => {
            build_and_run(runtime, reporter, spec).await?;
            Ok(ReconcileOutcome::Started)
        }
        (ContainerState::Running, false) => {
            reporter.step(&format!("container {} is already running", spec.name));
            Ok(ReconcileOutcome::AlreadyRunning)
        }
        (ContainerState::Stopped { status }, false) => {
            reporter.step(&format!("starting container {} ({status})...", spec.name));
            runtime.start_container(&spec.name).await?;
            reporter.success(&format!("container {} started", spec.name));
            Ok(ReconcileOutcome::Started)
        }
        (observed, true) => {
            reporter.step(&format!("removing container {} for rebuild...", spec.name));
            if observed == ContainerState::Running {
                runtime.stop_container(&spec.name).await?;
            }
            runtime.remove_container(&spec.name, true).await?;
            build_and_run(runtime, reporter, spec).await?;
            Ok(ReconcileOutcome::Rebuilt)
        }
    }
}

/// Build the image, then create and start the container. A fresh build is
/// never left un-started.
async fn build_and_run(
    runtime: &(impl ContainerLifecycle + ImageOps),
    reporter: &impl ProgressReporter,
    spec: &ContainerSpec,
) -> Result<(), RuntimeError> {
    image::build(runtime, reporter, &spec.build).await?;

    reporter.step(&format!(
        "starting container {} on port {}...",
        spec.name, spec.host_port
    ));
    runtime.create_and_start_container(spec).await?;
    reporter.success(&format!("container {} started", spec.name));
    Ok(())
}
