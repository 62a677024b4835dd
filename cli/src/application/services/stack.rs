//! Application service: `dabk build` use-case.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.
//! Runs strictly in order: Dockerfile preflight, network, then one container
//! reconciliation per declared role, then the handoff file.

use serde::Serialize;

use crate::application::ports::{ContainerRuntime, HandoffStore, ProgressReporter, ProjectFiles};
use crate::application::services::{container, network};
use crate::domain::{
    ConfigError, NetworkOutcome, RebuildIntents, ReconcileOutcome, Role, StackError, StackPlan,
};

/// Per-container result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContainerReport {
    pub role: Role,
    pub name: String,
    pub host_port: u16,
    pub outcome: ReconcileOutcome,
}

/// Result of a full `build` invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StackReport {
    pub network: String,
    pub network_outcome: NetworkOutcome,
    pub containers: Vec<ContainerReport>,
}

/// Converge the network and every container in `plan`.
///
/// # Errors
///
/// Returns the first failure. Completed steps (network created, images built)
/// are left in place; re-running is the recovery path.
pub async fn provision_stack(
    runtime: &impl ContainerRuntime,
    files: &impl ProjectFiles,
    handoff: &impl HandoffStore,
    reporter: &impl ProgressReporter,
    plan: &StackPlan,
    intents: RebuildIntents,
) -> Result<StackReport, StackError> {
    check_dockerfiles(files, plan)?;

    let network_outcome = network::ensure_network(runtime, reporter, &plan.network)
        .await
        .map_err(|source| StackError::Network {
            network: plan.network.name.clone(),
            source,
        })?;

    let mut containers = Vec::with_capacity(plan.containers.len());
    for spec in &plan.containers {
        let outcome = container::reconcile(runtime, reporter, spec, intents.for_role(spec.role))
            .await
            .map_err(|source| StackError::Container {
                role: spec.role,
                name: spec.name.clone(),
                source,
            })?;
        containers.push(ContainerReport {
            role: spec.role,
            name: spec.name.clone(),
            host_port: spec.host_port,
            outcome,
        });
    }

    handoff
        .write_container_names(&plan.container_names())
        .map_err(StackError::Handoff)?;

    Ok(StackReport {
        network: plan.network.name.clone(),
        network_outcome,
        containers,
    })
}

/// Every declared container must have its Dockerfile before anything runs.
fn check_dockerfiles(files: &impl ProjectFiles, plan: &StackPlan) -> Result<(), ConfigError> {
    for spec in &plan.containers {
        let path = spec.build.dockerfile_path();
        if !files.is_file(&path) {
            return Err(ConfigError::DockerfileNotFound(path));
        }
    }
    Ok(())
}
