//! Domain types and validators for the project `.env` configuration.
//!
//! Pure functions only: no I/O, no async, no filesystem access.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::domain::error::ConfigError;

// ── Constants ────────────────────────────────────────────────────────────────

pub const DEFAULT_HOST_PORT: u16 = 8080;
pub const DEFAULT_VOLUME_CONTAINER: &str = "/var/www/html";

/// Flat key/value mapping produced by the `.env` loader.
pub type EnvMap = BTreeMap<String, String>;

// ── App type ─────────────────────────────────────────────────────────────────

/// Application flavour; selects the default Dockerfile and container port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum AppType {
    #[default]
    PhpApache,
    Node,
    Python,
    Java,
}

impl AppType {
    /// Parse `APP_TYPE`. Unrecognised values fall back to `php-apache`.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        match value.trim() {
            "node" => Self::Node,
            "python" => Self::Python,
            "java" => Self::Java,
            _ => Self::PhpApache,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::PhpApache => "php-apache",
            Self::Node => "node",
            Self::Python => "python",
            Self::Java => "java",
        }
    }

    /// Dockerfile path relative to the project root.
    #[must_use]
    pub fn default_dockerfile(self) -> &'static str {
        match self {
            Self::PhpApache => "docker/app/Dockerfile-app-php",
            Self::Node => "docker/app/Dockerfile-app-node",
            Self::Python => "docker/app/Dockerfile-app-python",
            Self::Java => "docker/app/Dockerfile-app-java",
        }
    }

    #[must_use]
    pub fn container_port(self) -> u16 {
        match self {
            Self::PhpApache => 80,
            Self::Node => 3000,
            Self::Python => 5000,
            Self::Java => 8080,
        }
    }
}

impl fmt::Display for AppType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Data store types ─────────────────────────────────────────────────────────

/// Data store engine backing a data container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DataKind {
    Postgres,
    Mysql,
    Mariadb,
    Mongodb,
    Redis,
}

pub const RELATIONAL_KINDS: &[DataKind] = &[DataKind::Postgres, DataKind::Mysql, DataKind::Mariadb];
pub const NON_RELATIONAL_KINDS: &[DataKind] = &[DataKind::Mongodb, DataKind::Redis];

impl DataKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Postgres => "postgres",
            Self::Mysql => "mysql",
            Self::Mariadb => "mariadb",
            Self::Mongodb => "mongodb",
            Self::Redis => "redis",
        }
    }

    #[must_use]
    pub fn container_port(self) -> u16 {
        match self {
            Self::Postgres => 5432,
            Self::Mysql | Self::Mariadb => 3306,
            Self::Mongodb => 27017,
            Self::Redis => 6379,
        }
    }

    #[must_use]
    pub fn default_dockerfile(self) -> String {
        format!("docker/data/Dockerfile-data-{}", self.as_str())
    }

    fn parse_from(
        key: &'static str,
        value: &str,
        allowed: &[DataKind],
    ) -> Result<Self, ConfigError> {
        allowed
            .iter()
            .copied()
            .find(|k| k.as_str() == value)
            .ok_or_else(|| ConfigError::UnknownDataType {
                key,
                value: value.to_string(),
                valid: allowed
                    .iter()
                    .map(|k| k.as_str())
                    .collect::<Vec<_>>()
                    .join(", "),
            })
    }
}

impl fmt::Display for DataKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Config schema ────────────────────────────────────────────────────────────

/// App container settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub app_type: AppType,
    pub dockerfile: String,
    pub base_image: Option<String>,
    pub host_port: u16,
    pub container_port: u16,
    pub volume_host: Option<String>,
    pub volume_container: String,
    /// Project directory inside the running container.
    pub install_dir: String,
}

/// Data container settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataConfig {
    pub kind: DataKind,
    pub dockerfile: String,
    pub base_image: Option<String>,
    pub host_port: u16,
}

/// Validated configuration for one invocation. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackConfig {
    pub project_name: String,
    pub app: AppConfig,
    pub data_rel: Option<DataConfig>,
    pub data_nonrel: Option<DataConfig>,
}

impl StackConfig {
    /// Validate a loaded `.env` mapping and apply defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if `PROJECT_NAME` is missing, a port is not a valid
    /// TCP port, or a data store type is not recognised.
    pub fn from_env(env: &EnvMap) -> Result<Self, ConfigError> {
        let project_name = value(env, "PROJECT_NAME")
            .ok_or(ConfigError::MissingProjectName)?
            .to_string();

        let app_type = value(env, "APP_TYPE").map_or_else(AppType::default, AppType::parse);
        let volume_container =
            value(env, "APP_VOLUME_CONTAINER").unwrap_or(DEFAULT_VOLUME_CONTAINER);
        let install_dir = value(env, "APP_CONTAINER_VOLUME_PATH").unwrap_or(volume_container);

        let app = AppConfig {
            app_type,
            dockerfile: value(env, "APP_DOCKERFILE")
                .unwrap_or(app_type.default_dockerfile())
                .to_string(),
            base_image: value(env, "APP_BASE_IMAGE").map(str::to_string),
            host_port: port(env, "APP_HOST_PORT")?.unwrap_or(DEFAULT_HOST_PORT),
            container_port: app_type.container_port(),
            volume_host: value(env, "APP_VOLUME_HOST").map(str::to_string),
            volume_container: volume_container.to_string(),
            install_dir: install_dir.to_string(),
        };

        let data_rel = data_config(env, DataKeys::RELATIONAL, RELATIONAL_KINDS)?;
        let data_nonrel = data_config(env, DataKeys::NON_RELATIONAL, NON_RELATIONAL_KINDS)?;

        Ok(Self {
            project_name,
            app,
            data_rel,
            data_nonrel,
        })
    }
}

struct DataKeys {
    kind: &'static str,
    dockerfile: &'static str,
    base_image: &'static str,
    host_port: &'static str,
}

impl DataKeys {
    const RELATIONAL: Self = Self {
        kind: "DATA_REL_TYPE",
        dockerfile: "DATA_REL_DOCKERFILE",
        base_image: "DATA_REL_BASE_IMAGE",
        host_port: "DATA_REL_HOST_PORT",
    };
    const NON_RELATIONAL: Self = Self {
        kind: "DATA_NONREL_TYPE",
        dockerfile: "DATA_NONREL_DOCKERFILE",
        base_image: "DATA_NONREL_BASE_IMAGE",
        host_port: "DATA_NONREL_HOST_PORT",
    };
}

fn data_config(
    env: &EnvMap,
    keys: DataKeys,
    allowed: &[DataKind],
) -> Result<Option<DataConfig>, ConfigError> {
    let Some(raw) = value(env, keys.kind) else {
        return Ok(None);
    };
    let kind = DataKind::parse_from(keys.kind, raw, allowed)?;
    Ok(Some(DataConfig {
        kind,
        dockerfile: value(env, keys.dockerfile)
            .map_or_else(|| kind.default_dockerfile(), str::to_string),
        base_image: value(env, keys.base_image).map(str::to_string),
        host_port: port(env, keys.host_port)?.unwrap_or(kind.container_port()),
    }))
}

/// Non-blank, trimmed value for `key`.
fn value<'a>(env: &'a EnvMap, key: &str) -> Option<&'a str> {
    env.get(key).map(|v| v.trim()).filter(|v| !v.is_empty())
}

fn port(env: &EnvMap, key: &'static str) -> Result<Option<u16>, ConfigError> {
    value(env, key)
        .map(|raw| parse_port(key, raw))
        .transpose()
}

/// Parse a TCP port number (1-65535).
///
/// # Errors
///
/// Returns [`ConfigError::InvalidPort`] for anything else.
pub fn parse_port(key: &'static str, raw: &str) -> Result<u16, ConfigError> {
    match raw.trim().parse::<u16>() {
        Ok(p) if p > 0 => Ok(p),
        _ => Err(ConfigError::InvalidPort {
            key,
            value: raw.to_string(),
        }),
    }
}

// ── Unit tests ───────────────────────────────────────────────────────────────
