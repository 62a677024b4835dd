//! Port trait definitions for the Application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `crate::domain`, never from `crate::infra`,
//! `crate::commands`, or `crate::output`.

use std::path::Path;
use std::process::Output;
use std::time::Duration;

use anyhow::Result;

use crate::domain::container::BuildSpec;
use crate::domain::{ContainerSpec, ContainerState, ExecResult, RuntimeError};

// ── Container Runtime Port Traits ─────────────────────────────────────────────
//
// Expected runtime-reported conditions ("no such container") are values, not
// errors. Only failed operations and an unreachable daemon are `Err`.

/// Network listing and creation.
#[allow(async_fn_in_trait)]
pub trait NetworkOps {
    /// `true` if a network with exactly this name exists.
    async fn network_exists(&self, name: &str) -> Result<bool, RuntimeError>;
    /// Create a network. Fails if it already exists.
    async fn create_network(&self, name: &str) -> Result<(), RuntimeError>;
}

/// Container state inspection.
#[allow(async_fn_in_trait)]
pub trait ContainerInspector {
    /// Observe a container. A missing container maps to
    /// [`ContainerState::Absent`], not to an error.
    async fn inspect_container(&self, name: &str) -> Result<ContainerState, RuntimeError>;
}

/// Container lifecycle operations.
#[allow(async_fn_in_trait)]
pub trait ContainerLifecycle {
    /// Start an existing, stopped container.
    async fn start_container(&self, name: &str) -> Result<(), RuntimeError>;
    /// Stop a running container.
    async fn stop_container(&self, name: &str) -> Result<(), RuntimeError>;
    /// Remove a container, optionally with its anonymous volumes.
    async fn remove_container(&self, name: &str, prune_volumes: bool) -> Result<(), RuntimeError>;
    /// Create a container from `spec.image` and start it detached.
    async fn create_and_start_container(&self, spec: &ContainerSpec) -> Result<(), RuntimeError>;
}

/// Image builds.
#[allow(async_fn_in_trait)]
pub trait ImageOps {
    /// Build and tag an image, blocking until it is produced. Build output is
    /// forwarded line by line to `log`.
    async fn build_image(&self, build: &BuildSpec, log: &dyn Fn(&str)) -> Result<(), RuntimeError>;
}

/// Command execution inside a running container.
#[allow(async_fn_in_trait)]
pub trait ContainerExec {
    /// Run `argv` inside `container`. A non-zero exit is reported through
    /// [`ExecResult::exit_code`], not as an error.
    async fn exec(
        &self,
        container: &str,
        argv: &[&str],
        workdir: Option<&str>,
    ) -> Result<ExecResult, RuntimeError>;
}

/// Composite trait: the full runtime client facade.
pub trait ContainerRuntime:
    NetworkOps + ContainerInspector + ContainerLifecycle + ImageOps + ContainerExec
{
}

/// Blanket implementation: any type implementing all sub-traits is a `ContainerRuntime`.
impl<T> ContainerRuntime for T where
    T: NetworkOps + ContainerInspector + ContainerLifecycle + ImageOps + ContainerExec
{
}

// ── Command Runner Port ───────────────────────────────────────────────────────

/// Abstracts process execution so infrastructure can be swapped or mocked.
#[allow(async_fn_in_trait)]
pub trait CommandRunner {
    /// Run a program and capture its output.
    ///
    /// Implementations should delegate to `run_with_timeout` using the
    /// instance's configured default timeout.
    async fn run(&self, program: &str, args: &[&str]) -> Result<Output>;
    /// Run a program with a custom timeout override.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be spawned or exceeds `timeout`.
    /// On timeout, the child process must be killed (not left orphaned).
    async fn run_with_timeout(&self, program: &str, args: &[&str], timeout: Duration)
    -> Result<Output>;
    /// Run a program, forwarding each stdout line to `on_line` as it arrives.
    ///
    /// The returned `Output` carries the full stderr; `stdout` holds the
    /// same lines that were forwarded.
    async fn run_streaming(
        &self,
        program: &str,
        args: &[&str],
        timeout: Duration,
        on_line: &dyn Fn(&str),
    ) -> Result<Output>;
}

// ── Progress Reporting Port ───────────────────────────────────────────────────

/// Abstracts progress reporting so services can emit events without
/// depending on the Presentation layer. Sync trait, no async needed.
pub trait ProgressReporter {
    /// Emit an in-progress step message.
    fn step(&self, message: &str);
    /// Emit a success message.
    fn success(&self, message: &str);
    /// Emit a warning message.
    fn warn(&self, message: &str);
    /// Forward one line of streamed tool output (build logs, installer output).
    fn detail(&self, line: &str);
}

// ── Project Filesystem Ports ──────────────────────────────────────────────────

/// Read-only probes of the project directory on the host.
pub trait ProjectFiles {
    /// `true` if `path` exists and is a regular file.
    fn is_file(&self, path: &Path) -> bool;
}

/// Persists the generated container names for later, independent tools.
pub trait HandoffStore {
    /// Replace the handoff file with `names`, one per line.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    fn write_container_names(&self, names: &[String]) -> std::io::Result<()>;
}
