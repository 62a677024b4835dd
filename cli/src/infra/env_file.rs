//! Project discovery and `.env` loading.
//!
//! The project root is the nearest directory (the start directory or one of
//! its ancestors, up to [`MAX_SEARCH_LEVELS`]) that contains a `.env` file.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

use crate::domain::{ConfigError, EnvMap};

pub const ENV_FILE: &str = ".env";
pub const MAX_SEARCH_LEVELS: usize = 5;

/// Lines that can be handed to the dotenv parser. Comments, blank lines and
/// keys the shell could not export (e.g. `app.debug=1`) are dropped.
#[allow(clippy::expect_used)] // Pattern is a compile-time constant
static VALID_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z_][A-Z0-9_]*=").expect("valid regex"));

/// Walk up from `start` looking for a directory containing `.env`.
///
/// # Errors
///
/// Returns [`ConfigError::ProjectRootNotFound`] if none is found.
pub fn find_project_root(start: &Path) -> Result<PathBuf, ConfigError> {
    start
        .ancestors()
        .take(MAX_SEARCH_LEVELS)
        .find(|dir| dir.join(ENV_FILE).is_file())
        .map(Path::to_path_buf)
        .ok_or_else(|| ConfigError::ProjectRootNotFound(start.to_path_buf()))
}

/// Resolve the project root: an explicit directory must contain `.env`;
/// otherwise search upward from the current directory.
///
/// # Errors
///
/// Returns an error if no project root can be determined.
pub fn resolve_project_root(explicit: Option<&Path>) -> Result<PathBuf, ConfigError> {
    match explicit {
        Some(dir) => {
            let env = dir.join(ENV_FILE);
            if env.is_file() {
                Ok(dir.to_path_buf())
            } else {
                Err(ConfigError::EnvFileNotFound(env))
            }
        }
        None => {
            let cwd = std::env::current_dir().map_err(|e| ConfigError::EnvFileUnreadable {
                path: PathBuf::from("."),
                message: e.to_string(),
            })?;
            find_project_root(&cwd)
        }
    }
}

/// Load `<root>/.env` into a flat mapping.
///
/// # Errors
///
/// Returns an error if the file is missing, unreadable, or malformed.
pub fn load_env(root: &Path) -> Result<EnvMap, ConfigError> {
    let path = root.join(ENV_FILE);
    if !path.is_file() {
        return Err(ConfigError::EnvFileNotFound(path));
    }
    let content = std::fs::read_to_string(&path).map_err(|e| ConfigError::EnvFileUnreadable {
        path: path.clone(),
        message: e.to_string(),
    })?;
    parse_env(&content).map_err(|message| ConfigError::EnvFileUnreadable { path, message })
}

/// Parse `.env` content, keeping only exportable `KEY=value` lines.
///
/// # Errors
///
/// Returns the parser's message for a malformed line.
pub fn parse_env(content: &str) -> Result<EnvMap, String> {
    let filtered: String = content
        .lines()
        .map(str::trim)
        .filter(|line| VALID_LINE.is_match(line))
        .flat_map(|line| [line, "\n"])
        .collect();

    dotenvy::from_read_iter(filtered.as_bytes())
        .map(|item| item.map_err(|e| e.to_string()))
        .collect()
}
