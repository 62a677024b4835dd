//! Typed domain error enums.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, or `std::process`.
//! All error types implement `thiserror::Error` and convert to `anyhow::Error`
//! via the `?` operator.

use std::path::PathBuf;

use thiserror::Error;

use crate::domain::container::Role;

// ── Config errors ─────────────────────────────────────────────────────────────

/// Configuration problems. Never retried; abort the invocation.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Could not find project root with .env file (searched from {0})")]
    ProjectRootNotFound(PathBuf),

    #[error("Environment file not found: {0}\n\nCreate it from .env.example")]
    EnvFileNotFound(PathBuf),

    #[error("Failed to load environment from {path}: {message}")]
    EnvFileUnreadable { path: PathBuf, message: String },

    #[error("PROJECT_NAME must be set in .env")]
    MissingProjectName,

    #[error("Invalid port for {key}: '{value}' (expected 1-65535)")]
    InvalidPort { key: &'static str, value: String },

    #[error("Unknown {key}: '{value}'\n\nValid values: {valid}")]
    UnknownDataType {
        key: &'static str,
        value: String,
        valid: String,
    },

    #[error("Dockerfile not found: {0}")]
    DockerfileNotFound(PathBuf),
}

// ── Runtime errors ────────────────────────────────────────────────────────────

/// Failures reported by (or while reaching) the container runtime.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuntimeError {
    /// The runtime daemon could not be reached at all.
    #[error("cannot reach the container runtime: {0}")]
    Connectivity(String),

    /// A specific runtime call reported failure.
    #[error("{operation} failed: {message}")]
    Operation {
        operation: &'static str,
        message: String,
    },

    /// The call did not finish within the caller-supplied timeout.
    #[error("{operation} timed out after {secs}s")]
    Timeout { operation: &'static str, secs: u64 },
}

impl RuntimeError {
    /// Shorthand for an [`RuntimeError::Operation`].
    pub fn operation(operation: &'static str, message: impl Into<String>) -> Self {
        Self::Operation {
            operation,
            message: message.into(),
        }
    }

    /// Returns `true` when the runtime itself is unreachable.
    #[must_use]
    pub fn is_connectivity(&self) -> bool {
        matches!(self, Self::Connectivity(_))
    }
}

// ── Stack errors ──────────────────────────────────────────────────────────────

/// Errors from a whole `build` invocation, tagged with the failing step.
#[derive(Debug, Error)]
pub enum StackError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Docker network {network}")]
    Network {
        network: String,
        #[source]
        source: RuntimeError,
    },

    #[error("{role} container {name}")]
    Container {
        role: Role,
        name: String,
        #[source]
        source: RuntimeError,
    },

    #[error("writing container handoff file")]
    Handoff(#[source] std::io::Error),
}

// ── Install errors ────────────────────────────────────────────────────────────

/// Errors from the dependency install workflow.
#[derive(Debug, Error)]
pub enum InstallError {
    #[error("Container '{name}' is not running (status: {status})\n\nRun 'dabk build' first to create containers")]
    ContainerNotRunning { name: String, status: String },

    #[error("Failed to install {tool}: '{step}' exited with {code}\n{stderr}")]
    ToolInstallFailed {
        tool: String,
        step: String,
        code: i32,
        stderr: String,
    },

    #[error("Install command '{command}' failed with exit code {code}")]
    InstallCommandFailed { command: String, code: i32 },

    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}
