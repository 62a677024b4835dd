//! `dabk build`: provision the network and containers described by `.env`.

use anyhow::{Context, Result};
use clap::Args;

use crate::app::AppContext;
use crate::application::services::stack::{self as service, StackReport};
use crate::domain::{RebuildIntents, ReconcileOutcome, Role, StackConfig, StackPlan};
use crate::infra::fs::LocalFs;
use crate::infra::handoff::HandoffFile;
use crate::output::OutputContext;

const KEY_WIDTH: usize = 22;

/// Arguments for the build command.
#[derive(Args, Default)]
pub struct BuildArgs {
    /// Remove and rebuild the app container
    #[arg(long)]
    pub rebuild_app: bool,

    /// Remove and rebuild the data containers (volumes are deleted)
    #[arg(long)]
    pub rebuild_data: bool,
}

impl BuildArgs {
    fn intents(&self) -> RebuildIntents {
        RebuildIntents {
            app: self.rebuild_app,
            data: self.rebuild_data,
        }
    }
}

/// Run `dabk build`.
///
/// # Errors
///
/// Returns an error if configuration is invalid, a Dockerfile is missing,
/// or any runtime operation fails.
pub async fn run(args: &BuildArgs, app: &AppContext) -> Result<()> {
    let (root, config) = super::load_project(app)?;
    let plan = StackPlan::new(&root, &config);

    app.output
        .info(&format!("Project root: {}", root.display()));
    print_config(&config, &app.output);

    if args.rebuild_data {
        app.output
            .warn("--rebuild-data removes the data containers together with their volumes.");
    }
    if !app.confirm("Continue with these settings?")? {
        app.output.warn("Aborted by user.");
        return Ok(());
    }

    let reporter = app.terminal_reporter();
    let handoff = HandoffFile::for_project_root(&root);
    let report = service::provision_stack(
        &app.runtime,
        &LocalFs,
        &handoff,
        &reporter,
        &plan,
        args.intents(),
    )
    .await?;
    tracing::info!(path = %handoff.path().display(), "container names written");

    if app.is_json() {
        let json = serde_json::to_string_pretty(&report).context("JSON serialization failed")?;
        println!("{json}");
    } else {
        print_summary(&report, &app.output);
    }
    Ok(())
}

fn print_config(config: &StackConfig, ctx: &OutputContext) {
    if ctx.quiet {
        return;
    }
    ctx.header("Configuration");
    ctx.kv("Project", &config.project_name, KEY_WIDTH);
    ctx.kv("App type", config.app.app_type.as_str(), KEY_WIDTH);
    ctx.kv("App Dockerfile", &config.app.dockerfile, KEY_WIDTH);
    ctx.kv(
        "App base image",
        config.app.base_image.as_deref().unwrap_or("(Dockerfile default)"),
        KEY_WIDTH,
    );
    ctx.kv("App host port", &config.app.host_port.to_string(), KEY_WIDTH);
    if let Some(host) = &config.app.volume_host {
        ctx.kv(
            "App volume",
            &format!("{host} -> {}", config.app.volume_container),
            KEY_WIDTH,
        );
    }
    for (label, data) in [
        ("Relational data", &config.data_rel),
        ("Non-relational data", &config.data_nonrel),
    ] {
        let value = data.as_ref().map_or_else(
            || "none".to_string(),
            |d| format!("{} (port {})", d.kind.as_str(), d.host_port),
        );
        ctx.kv(label, &value, KEY_WIDTH);
    }
    println!();
}

fn outcome_label(outcome: ReconcileOutcome) -> &'static str {
    match outcome {
        ReconcileOutcome::Started => "started",
        ReconcileOutcome::AlreadyRunning => "already running",
        ReconcileOutcome::Rebuilt => "rebuilt",
    }
}

fn print_summary(report: &StackReport, ctx: &OutputContext) {
    if ctx.quiet {
        return;
    }
    ctx.header("Containers");
    for container in &report.containers {
        let url = match container.role {
            Role::App => format!("http://localhost:{}", container.host_port),
            Role::DataRel | Role::DataNonrel => format!("localhost:{}", container.host_port),
        };
        ctx.kv(
            &container.name,
            &format!("{url}  {}", outcome_label(container.outcome)),
            KEY_WIDTH,
        );
    }
    println!();
    ctx.success("Stack is up.");
}
