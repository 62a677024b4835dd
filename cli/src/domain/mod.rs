//! Domain layer: pure business logic, types, and validation.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, or `std::process`.
//! All functions are synchronous and take data in, returning data out.

pub mod config;
pub mod container;
pub mod error;
pub mod install;
pub mod network_repair;
pub mod stack;

pub use config::{AppType, DataKind, EnvMap, StackConfig};
pub use container::{
    ContainerSpec, ContainerState, ExecResult, NetworkOutcome, NetworkSpec, ReconcileOutcome,
    RebuildIntents, Role,
};
pub use error::{ConfigError, InstallError, RuntimeError, StackError};
pub use install::{InstallContext, InstallOutcome};
pub use stack::StackPlan;
