//! Network reconciler: ensure the project network exists.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.

use crate::application::ports::{NetworkOps, ProgressReporter};
use crate::domain::{NetworkOutcome, NetworkSpec, RuntimeError};

/// Ensure `spec.name` exists, creating it if absent.
///
/// Idempotent: an existing network is never touched. A creation that loses a
/// race against a concurrent invocation surfaces as the runtime's error; it is
/// not retried.
///
/// # Errors
///
/// Returns an error if the existence query or the creation fails.
pub async fn ensure_network(
    runtime: &impl NetworkOps,
    reporter: &impl ProgressReporter,
    spec: &NetworkSpec,
) -> Result<NetworkOutcome, RuntimeError> {
    if runtime.network_exists(&spec.name).await? {
        tracing::debug!(network = %spec.name, "network already exists");
        reporter.step(&format!("network {} already exists", spec.name));
        return Ok(NetworkOutcome::AlreadyExists);
    }

    reporter.step(&format!("creating network {}...", spec.name));
    runtime.create_network(&spec.name).await?;
    tracing::info!(network = %spec.name, "network created");
    reporter.success(&format!("network {} created", spec.name));
    Ok(NetworkOutcome::Created)
}
