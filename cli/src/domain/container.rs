//! Desired and observed container/network state.
//!
//! Pure types only: names are derived deterministically from the project
//! name so that every invocation addresses the same runtime resources.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

// ── Naming ───────────────────────────────────────────────────────────────────

/// Container role within a project stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    App,
    DataRel,
    DataNonrel,
}

impl Role {
    /// Name fragment used in the container name.
    #[must_use]
    pub fn slug(self) -> &'static str {
        match self {
            Self::App => "app",
            Self::DataRel => "data-rel",
            Self::DataNonrel => "data-nonrel",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::App => "App",
            Self::DataRel => "Relational data",
            Self::DataNonrel => "Non-relational data",
        })
    }
}

/// `<project>-network`
#[must_use]
pub fn network_name(project: &str) -> String {
    format!("{project}-network")
}

/// `<project>-<role>-container`
#[must_use]
pub fn container_name(project: &str, role: Role) -> String {
    format!("{project}-{}-container", role.slug())
}

// ── Network ──────────────────────────────────────────────────────────────────

/// Desired network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkSpec {
    pub name: String,
}

impl NetworkSpec {
    #[must_use]
    pub fn for_project(project: &str) -> Self {
        Self {
            name: network_name(project),
        }
    }
}

/// Result of `ensure_network`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NetworkOutcome {
    AlreadyExists,
    Created,
}

// ── Containers ───────────────────────────────────────────────────────────────

/// Host directory bind-mounted into a container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VolumeMount {
    pub host_path: String,
    pub container_path: String,
}

/// Image build parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildSpec {
    /// Build context directory (the project root).
    pub context: PathBuf,
    /// Dockerfile path, relative to `context`.
    pub dockerfile: String,
    /// Tag applied to the built image.
    pub tag: String,
    /// Passed verbatim as `--build-arg KEY=VALUE`; empty means none.
    pub args: BTreeMap<String, String>,
}

impl BuildSpec {
    /// Absolute path of the Dockerfile on the host.
    #[must_use]
    pub fn dockerfile_path(&self) -> PathBuf {
        self.context.join(&self.dockerfile)
    }
}

/// Desired container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerSpec {
    pub role: Role,
    pub name: String,
    pub image: String,
    pub network: String,
    pub host_port: u16,
    pub container_port: u16,
    pub volume: Option<VolumeMount>,
    pub build: BuildSpec,
}

/// Container state as observed from the runtime. Re-queried before every
/// decision, never cached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContainerState {
    Absent,
    /// Exists but is not running (`created`, `exited`, `paused`, ...).
    Stopped { status: String },
    Running,
}

impl ContainerState {
    /// Map a runtime status string (`docker inspect {{.State.Status}}`).
    #[must_use]
    pub fn from_status(status: &str) -> Self {
        match status.trim() {
            "running" => Self::Running,
            other => Self::Stopped {
                status: other.to_string(),
            },
        }
    }

    /// Status label for messages.
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::Absent => "not found",
            Self::Stopped { status } => status,
            Self::Running => "running",
        }
    }
}

/// Result of reconciling one container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReconcileOutcome {
    Started,
    AlreadyRunning,
    Rebuilt,
}

/// Rebuild flags supplied by the caller, scoped per role.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RebuildIntents {
    pub app: bool,
    pub data: bool,
}

impl RebuildIntents {
    #[must_use]
    pub fn for_role(self, role: Role) -> bool {
        match role {
            Role::App => self.app,
            Role::DataRel | Role::DataNonrel => self.data,
        }
    }
}

/// Captured result of a command executed inside a container.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecResult {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl ExecResult {
    #[must_use]
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}
