//! Dependency install workflow: preflight probes, tool bootstrap, install.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.
//! Every exec is a single attempt; nothing is retried or rolled back.

use crate::application::ports::{ContainerExec, ContainerInspector, ProgressReporter};
use crate::domain::install::{BootstrapStep, MANIFEST_ABSENT};
use crate::domain::{ContainerState, InstallContext, InstallError, InstallOutcome};

/// Install dependencies inside the running container named by `ctx`.
///
/// 1. The container must be running.
/// 2. No manifest in the working directory → `Skipped`.
/// 3. Tool missing → run the bootstrap steps in order.
/// 4. Run the install command in the working directory.
///
/// # Errors
///
/// Returns [`InstallError::ContainerNotRunning`] before any exec when the
/// container is absent or stopped, [`InstallError::ToolInstallFailed`] when a
/// required bootstrap step fails, and [`InstallError::InstallCommandFailed`]
/// when the install command exits non-zero.
pub async fn install_dependencies(
    runtime: &(impl ContainerInspector + ContainerExec),
    reporter: &impl ProgressReporter,
    ctx: &InstallContext,
) -> Result<InstallOutcome, InstallError> {
    let container = ctx.container_name.as_str();

    let state = runtime.inspect_container(container).await?;
    if state != ContainerState::Running {
        return Err(InstallError::ContainerNotRunning {
            name: container.to_string(),
            status: state.label().to_string(),
        });
    }
    reporter.success("container is running");

    let manifest = ctx.manifest_path();
    reporter.step(&format!("checking for {}...", ctx.manifest_filename));
    let probe = runtime
        .exec(container, &["test", "-f", &manifest], None)
        .await?;
    if !probe.success() {
        tracing::info!(%manifest, "manifest absent, skipping install");
        reporter.warn(&format!(
            "no {} found in {}, skipping install",
            ctx.manifest_filename, ctx.working_dir
        ));
        return Ok(InstallOutcome::Skipped {
            reason: MANIFEST_ABSENT.to_string(),
        });
    }
    reporter.success(&format!("found {}", ctx.manifest_filename));

    reporter.step(&format!("checking for {}...", ctx.tool_binary));
    let which = runtime
        .exec(container, &["which", &ctx.tool_binary], None)
        .await?;
    if which.success() {
        reporter.success(&format!("{} is installed", ctx.tool_binary));
    } else {
        reporter.step(&format!("{} not found, installing...", ctx.tool_binary));
        bootstrap_tool(runtime, reporter, ctx).await?;
        reporter.success(&format!("{} installed", ctx.tool_binary));
    }

    let command = ctx.install_command.join(" ");
    reporter.step(&format!("running {command}..."));
    let argv: Vec<&str> = ctx.install_command.iter().map(String::as_str).collect();
    let result = runtime
        .exec(container, &argv, Some(&ctx.working_dir))
        .await?;
    for line in result.stdout.lines().chain(result.stderr.lines()) {
        reporter.detail(line);
    }
    if !result.success() {
        return Err(InstallError::InstallCommandFailed {
            command,
            code: result.exit_code,
        });
    }
    tracing::info!(container, "dependencies installed");
    Ok(InstallOutcome::Installed)
}

/// Run the bootstrap steps in order. Required steps abort on failure and
/// leave any partial artifacts behind; optional steps are only warned about.
async fn bootstrap_tool(
    runtime: &impl ContainerExec,
    reporter: &impl ProgressReporter,
    ctx: &InstallContext,
) -> Result<(), InstallError> {
    for BootstrapStep {
        description,
        argv,
        required,
    } in &ctx.bootstrap_steps
    {
        reporter.step(&format!("{description}..."));
        let args: Vec<&str> = argv.iter().map(String::as_str).collect();
        let result = runtime.exec(&ctx.container_name, &args, None).await?;
        if result.success() {
            continue;
        }
        tracing::warn!(
            step = %description,
            code = result.exit_code,
            required,
            "bootstrap step failed"
        );
        if *required {
            return Err(InstallError::ToolInstallFailed {
                tool: ctx.tool_binary.clone(),
                step: description.clone(),
                code: result.exit_code,
                stderr: result.stderr,
            });
        }
        reporter.warn(&format!("{description} failed (exit {})", result.exit_code));
    }
    Ok(())
}
