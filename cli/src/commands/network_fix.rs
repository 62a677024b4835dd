//! `dabk network:fix`: best-effort repair of host Docker networking.

use anyhow::{Context, Result};

use crate::app::AppContext;
use crate::application::services::network_repair::repair_network;
use crate::domain::network_repair::Platform;
use crate::infra::command_runner::{DEFAULT_CMD_TIMEOUT, TokioCommandRunner};

/// Run `dabk network:fix`.
///
/// Failed steps are reported but never fail the command.
///
/// # Errors
///
/// Returns an error only if JSON serialization fails.
pub async fn run(app: &AppContext) -> Result<()> {
    let platform = Platform::current();
    app.output.header("Repairing Docker networking");
    if platform == Platform::Unix {
        app.output.info("Some steps use sudo and may ask for your password.");
    }

    let runner = TokioCommandRunner::new(DEFAULT_CMD_TIMEOUT);
    let report = repair_network(&runner, &app.terminal_reporter(), platform).await;

    if app.is_json() {
        let json = serde_json::to_string_pretty(&report).context("JSON serialization failed")?;
        println!("{json}");
    } else if report.all_succeeded() {
        app.output.success("Network repair complete.");
    } else {
        app.output.warn(&format!(
            "Network repair finished with {} failed step(s).",
            report.failed.len()
        ));
    }
    Ok(())
}
