//! Dependency install context: what to probe and run inside the app container.

use serde::Serialize;

/// Reason reported when the project has no manifest.
pub const MANIFEST_ABSENT: &str = "manifest absent";

const COMPOSER_SETUP: &str = "/tmp/composer-setup.php";

/// One step of the tool bootstrap sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootstrapStep {
    pub description: String,
    pub argv: Vec<String>,
    /// When `false` a non-zero exit is only warned about (cleanup steps).
    pub required: bool,
}

impl BootstrapStep {
    fn new(description: &str, argv: &[&str], required: bool) -> Self {
        Self {
            description: description.to_string(),
            argv: argv.iter().map(|a| (*a).to_string()).collect(),
            required,
        }
    }
}

/// Inputs of the dependency install workflow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallContext {
    pub container_name: String,
    pub working_dir: String,
    pub manifest_filename: String,
    pub tool_binary: String,
    pub install_command: Vec<String>,
    pub bootstrap_steps: Vec<BootstrapStep>,
}

impl InstallContext {
    /// Composer defaults for a PHP app container.
    #[must_use]
    pub fn composer(container_name: &str, working_dir: &str) -> Self {
        Self {
            container_name: container_name.to_string(),
            working_dir: working_dir.to_string(),
            manifest_filename: "composer.json".to_string(),
            tool_binary: "composer".to_string(),
            install_command: ["composer", "install", "--no-interaction", "--optimize-autoloader"]
                .map(String::from)
                .to_vec(),
            bootstrap_steps: vec![
                BootstrapStep::new(
                    "download Composer installer",
                    &[
                        "php",
                        "-r",
                        "copy('https://getcomposer.org/installer', '/tmp/composer-setup.php');",
                    ],
                    true,
                ),
                BootstrapStep::new(
                    "run Composer installer",
                    &[
                        "php",
                        COMPOSER_SETUP,
                        "--install-dir=/usr/local/bin",
                        "--filename=composer",
                    ],
                    true,
                ),
                BootstrapStep::new("remove Composer installer", &["rm", COMPOSER_SETUP], false),
            ],
        }
    }

    /// `<working_dir>/<manifest_filename>`
    #[must_use]
    pub fn manifest_path(&self) -> String {
        format!(
            "{}/{}",
            self.working_dir.trim_end_matches('/'),
            self.manifest_filename
        )
    }
}

/// Terminal outcome of a successful workflow run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum InstallOutcome {
    Installed,
    Skipped { reason: String },
}
