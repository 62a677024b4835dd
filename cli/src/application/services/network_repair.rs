//! Application service: host network repair.
//!
//! Runs every step of the platform plan once. A failing step is warned about
//! and the next step still runs.

use crate::application::ports::{CommandRunner, ProgressReporter};
use crate::domain::network_repair::{Platform, RepairReport, repair_plan};

/// Run the repair plan for `platform`.
pub async fn repair_network(
    runner: &impl CommandRunner,
    reporter: &impl ProgressReporter,
    platform: Platform,
) -> RepairReport {
    let mut report = RepairReport::default();
    for step in repair_plan(platform) {
        reporter.step(&format!("{}...", step.description));
        match runner.run(step.program, step.args).await {
            Ok(output) if output.status.success() => {
                reporter.success(&format!("Success: {}", step.description));
                report.succeeded.push(step.description);
            }
            Ok(output) => {
                let stderr = String::from_utf8_lossy(&output.stderr);
                tracing::warn!(
                    step = step.description,
                    stderr = %stderr.trim(),
                    "repair step failed"
                );
                reporter.warn(&format!("Failed: {}", step.description));
                for line in stderr.lines() {
                    reporter.detail(line);
                }
                report.failed.push(step.description);
            }
            Err(e) => {
                tracing::warn!(step = step.description, error = %e, "repair step could not run");
                reporter.warn(&format!("Failed: {} ({e})", step.description));
                report.failed.push(step.description);
            }
        }
    }
    report
}
