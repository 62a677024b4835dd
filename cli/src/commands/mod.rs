//! Command implementations

pub mod build;
pub mod install;
pub mod network_fix;
pub mod version;

use anyhow::{Context, Result};

use crate::app::AppContext;
use crate::domain::StackConfig;
use crate::infra::env_file;

/// Locate the project, load its `.env`, and validate it.
fn load_project(app: &AppContext) -> Result<(std::path::PathBuf, StackConfig)> {
    let root = env_file::resolve_project_root(app.project_dir.as_deref())?;
    tracing::debug!(root = %root.display(), "project root resolved");
    let env = env_file::load_env(&root)?;
    let config = StackConfig::from_env(&env).context("invalid .env configuration")?;
    Ok((root, config))
}
