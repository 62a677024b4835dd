//! Infrastructure implementation of the container runtime port traits.
//!
//! `DockerCli<R>` routes every runtime call through the `docker` CLI via a
//! `CommandRunner`. Short calls (inspect, start, stop, rm, network) use
//! `cmd_runner`; image builds and `docker exec` use `long_runner`.

use std::process::Output;
use std::time::Duration;

use crate::application::ports::{
    CommandRunner, ContainerExec, ContainerInspector, ContainerLifecycle, ImageOps, NetworkOps,
};
use crate::domain::container::BuildSpec;
use crate::domain::{ContainerSpec, ContainerState, ExecResult, RuntimeError};
use crate::infra::command_runner::{
    DEFAULT_CMD_TIMEOUT, LONG_RUNNING_TIMEOUT, TimedOut, TokioCommandRunner,
};

/// Environment variable overriding the docker binary.
pub const DOCKER_BIN_ENV: &str = "DABK_DOCKER";

/// Substrings the docker CLI prints when the daemon is unreachable.
const DAEMON_UNREACHABLE: &[&str] = &[
    "Cannot connect to the Docker daemon",
    "error during connect",
    "Is the docker daemon running",
];

/// Substrings the docker CLI prints for a missing container.
const NO_SUCH_CONTAINER: &[&str] = &["No such object", "No such container"];

/// Infrastructure adapter over the `docker` CLI.
///
/// Generic over `R: CommandRunner` so that tests can inject a mock runner
/// without spawning real processes.
pub struct DockerCli<R: CommandRunner> {
    program: String,
    cmd_runner: R,
    long_runner: R,
    build_timeout: Duration,
}

impl<R: CommandRunner> DockerCli<R> {
    /// Create an adapter with explicit runner instances.
    pub fn new(program: impl Into<String>, cmd_runner: R, long_runner: R) -> Self {
        Self {
            program: program.into(),
            cmd_runner,
            long_runner,
            build_timeout: LONG_RUNNING_TIMEOUT,
        }
    }

    async fn docker(&self, operation: &'static str, args: &[&str]) -> Result<Output, RuntimeError> {
        self.cmd_runner
            .run(&self.program, args)
            .await
            .map_err(|e| runner_error(operation, &e))
    }

    async fn docker_checked(
        &self,
        operation: &'static str,
        args: &[&str],
    ) -> Result<Output, RuntimeError> {
        let output = self.docker(operation, args).await?;
        if output.status.success() {
            Ok(output)
        } else {
            Err(failure(operation, &output))
        }
    }
}

impl DockerCli<TokioCommandRunner> {
    /// Convenience constructor for production use. Honours `DABK_DOCKER`.
    #[must_use]
    pub fn default_runner() -> Self {
        let program = std::env::var(DOCKER_BIN_ENV)
            .ok()
            .filter(|p| !p.trim().is_empty())
            .unwrap_or_else(|| "docker".to_string());
        Self::new(
            program,
            TokioCommandRunner::new(DEFAULT_CMD_TIMEOUT),
            TokioCommandRunner::new(LONG_RUNNING_TIMEOUT),
        )
    }
}

// ── Error mapping ─────────────────────────────────────────────────────────────

fn runner_error(operation: &'static str, err: &anyhow::Error) -> RuntimeError {
    if let Some(t) = err.downcast_ref::<TimedOut>() {
        return RuntimeError::Timeout {
            operation,
            secs: t.timeout.as_secs(),
        };
    }
    // Spawn failures mean the docker CLI itself is unusable.
    RuntimeError::Connectivity(format!("{err:#}"))
}

fn stderr_text(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).trim().to_string()
}

fn is_unreachable(stderr: &str) -> bool {
    DAEMON_UNREACHABLE.iter().any(|m| stderr.contains(m))
}

fn failure(operation: &'static str, output: &Output) -> RuntimeError {
    let stderr = stderr_text(output);
    if is_unreachable(&stderr) {
        return RuntimeError::Connectivity(stderr);
    }
    let message = if stderr.is_empty() {
        format!("exit code {}", exit_code(output))
    } else {
        stderr
    };
    RuntimeError::operation(operation, message)
}

fn exit_code(output: &Output) -> i32 {
    output.status.code().unwrap_or(-1)
}

// ── Port implementations ──────────────────────────────────────────────────────

impl<R: CommandRunner> NetworkOps for DockerCli<R> {
    async fn network_exists(&self, name: &str) -> Result<bool, RuntimeError> {
        let filter = format!("name=^{name}$");
        let output = self
            .docker_checked(
                "docker network ls",
                &["network", "ls", "--filter", &filter, "--format", "{{.Name}}"],
            )
            .await?;
        // The name filter is a pattern match; compare exactly.
        Ok(String::from_utf8_lossy(&output.stdout)
            .lines()
            .any(|line| line.trim() == name))
    }

    async fn create_network(&self, name: &str) -> Result<(), RuntimeError> {
        self.docker_checked("docker network create", &["network", "create", name])
            .await
            .map(drop)
    }
}

impl<R: CommandRunner> ContainerInspector for DockerCli<R> {
    async fn inspect_container(&self, name: &str) -> Result<ContainerState, RuntimeError> {
        let output = self
            .docker(
                "docker inspect",
                &["container", "inspect", "--format", "{{.State.Status}}", name],
            )
            .await?;
        if output.status.success() {
            return Ok(ContainerState::from_status(&String::from_utf8_lossy(
                &output.stdout,
            )));
        }
        let stderr = stderr_text(&output);
        if NO_SUCH_CONTAINER.iter().any(|m| stderr.contains(m)) {
            return Ok(ContainerState::Absent);
        }
        Err(failure("docker inspect", &output))
    }
}

impl<R: CommandRunner> ContainerLifecycle for DockerCli<R> {
    async fn start_container(&self, name: &str) -> Result<(), RuntimeError> {
        self.docker_checked("docker start", &["start", name])
            .await
            .map(drop)
    }

    async fn stop_container(&self, name: &str) -> Result<(), RuntimeError> {
        self.docker_checked("docker stop", &["stop", name])
            .await
            .map(drop)
    }

    async fn remove_container(&self, name: &str, prune_volumes: bool) -> Result<(), RuntimeError> {
        let args: &[&str] = if prune_volumes {
            &["rm", "-v", name]
        } else {
            &["rm", name]
        };
        self.docker_checked("docker rm", args).await.map(drop)
    }

    async fn create_and_start_container(&self, spec: &ContainerSpec) -> Result<(), RuntimeError> {
        let args = run_args(spec);
        let refs: Vec<&str> = args.iter().map(String::as_str).collect();
        self.docker_checked("docker run", &refs).await.map(drop)
    }
}

impl<R: CommandRunner> ImageOps for DockerCli<R> {
    async fn build_image(&self, build: &BuildSpec, log: &dyn Fn(&str)) -> Result<(), RuntimeError> {
        const OP: &str = "docker build";
        let args = build_args(build);
        let refs: Vec<&str> = args.iter().map(String::as_str).collect();
        let output = self
            .long_runner
            .run_streaming(&self.program, &refs, self.build_timeout, log)
            .await
            .map_err(|e| runner_error(OP, &e))?;
        if output.status.success() {
            Ok(())
        } else {
            Err(failure(OP, &output))
        }
    }
}

impl<R: CommandRunner> ContainerExec for DockerCli<R> {
    async fn exec(
        &self,
        container: &str,
        argv: &[&str],
        workdir: Option<&str>,
    ) -> Result<ExecResult, RuntimeError> {
        const OP: &str = "docker exec";
        let mut args = vec!["exec"];
        if let Some(dir) = workdir {
            args.extend(["-w", dir]);
        }
        args.push(container);
        args.extend_from_slice(argv);

        let output = self
            .long_runner
            .run(&self.program, &args)
            .await
            .map_err(|e| runner_error(OP, &e))?;
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
        if !output.status.success() && is_unreachable(&stderr) {
            return Err(RuntimeError::Connectivity(stderr.trim().to_string()));
        }
        Ok(ExecResult {
            exit_code: exit_code(&output),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr,
        })
    }
}

// ── Argument builders ─────────────────────────────────────────────────────────

/// `docker build -t TAG -f DOCKERFILE [--build-arg K=V]... CONTEXT`
#[must_use]
pub fn build_args(build: &BuildSpec) -> Vec<String> {
    let mut args = vec![
        "build".to_string(),
        "-t".to_string(),
        build.tag.clone(),
        "-f".to_string(),
        build.dockerfile_path().to_string_lossy().into_owned(),
    ];
    for (key, value) in &build.args {
        args.push("--build-arg".to_string());
        args.push(format!("{key}={value}"));
    }
    args.push(build.context.to_string_lossy().into_owned());
    args
}

/// `docker run -d --name N --network NET -p HOST:CONTAINER [-v H:C] IMAGE`
#[must_use]
pub fn run_args(spec: &ContainerSpec) -> Vec<String> {
    let mut args = vec![
        "run".to_string(),
        "-d".to_string(),
        "--name".to_string(),
        spec.name.clone(),
        "--network".to_string(),
        spec.network.clone(),
        "-p".to_string(),
        format!("{}:{}", spec.host_port, spec.container_port),
    ];
    if let Some(volume) = &spec.volume {
        args.push("-v".to_string());
        args.push(format!("{}:{}", volume.host_path, volume.container_path));
    }
    args.push(spec.image.clone());
    args
}
