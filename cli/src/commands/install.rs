//! `dabk composer:install`: install PHP dependencies in the app container.

use anyhow::{Context, Result};

use crate::app::AppContext;
use crate::application::services::install::install_dependencies;
use crate::domain::container::container_name;
use crate::domain::{InstallContext, InstallOutcome, Role};

/// Run `dabk composer:install`.
///
/// # Errors
///
/// Returns an error if configuration is invalid, the app container is not
/// running, Composer cannot be installed, or `composer install` fails.
pub async fn run(app: &AppContext) -> Result<()> {
    let (_root, config) = super::load_project(app)?;
    let name = container_name(&config.project_name, Role::App);
    let ctx = InstallContext::composer(&name, &config.app.install_dir);

    app.output
        .header(&format!("Installing Composer dependencies in {name}"));
    let reporter = app.terminal_reporter();
    let outcome = install_dependencies(&app.runtime, &reporter, &ctx)
        .await
        .with_context(|| format!("composer install in {name}"))?;

    if app.is_json() {
        let json = serde_json::to_string_pretty(&serde_json::json!({
            "container": name,
            "working_dir": ctx.working_dir,
            "result": outcome,
        }))
        .context("JSON serialization failed")?;
        println!("{json}");
        return Ok(());
    }

    match outcome {
        InstallOutcome::Installed => app.output.success("Composer dependencies installed."),
        InstallOutcome::Skipped { reason } => {
            app.output.info(&format!("Nothing to install ({reason})."));
        }
    }
    Ok(())
}
