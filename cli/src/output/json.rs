//! JSON output helpers.
//!
//! Provides the error-object formatter used by all `--json` code paths when
//! a command fails.

use anyhow::{Context, Result};

use crate::domain::{ConfigError, InstallError, RuntimeError, StackError};

/// Format a JSON error object.
///
/// Output (pretty-printed):
/// ```json
/// {
///   "error": true,
///   "message": "...",
///   "code": "..."
/// }
/// ```
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn format_error(message: &str, code: &str) -> Result<String> {
    let obj = serde_json::json!({
        "error": true,
        "message": message,
        "code": code,
    });
    serde_json::to_string_pretty(&obj).context("JSON serialization failed")
}

/// Stable machine-readable code for an error chain.
#[must_use]
pub fn error_code(err: &anyhow::Error) -> &'static str {
    for cause in err.chain() {
        if cause.is::<ConfigError>() {
            return "config_error";
        }
        if let Some(e) = cause.downcast_ref::<RuntimeError>() {
            return runtime_code(e);
        }
        if let Some(e) = cause.downcast_ref::<StackError>() {
            match e {
                StackError::Config(_) => return "config_error",
                StackError::Handoff(_) => return "handoff_write_failed",
                StackError::Network { source, .. } | StackError::Container { source, .. } => {
                    return runtime_code(source);
                }
            }
        }
        if let Some(e) = cause.downcast_ref::<InstallError>() {
            return match e {
                InstallError::ContainerNotRunning { .. } => "container_not_running",
                InstallError::ToolInstallFailed { .. } => "tool_install_failed",
                InstallError::InstallCommandFailed { .. } => "install_command_failed",
                InstallError::Runtime(inner) => runtime_code(inner),
            };
        }
    }
    "error"
}

fn runtime_code(err: &RuntimeError) -> &'static str {
    match err {
        RuntimeError::Connectivity(_) => "runtime_unreachable",
        RuntimeError::Operation { .. } => "runtime_operation_failed",
        RuntimeError::Timeout { .. } => "runtime_timeout",
    }
}
