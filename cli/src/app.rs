//! Application context: unified state passed to every command handler.
//!
//! `AppContext` is built once in `Cli::run()` from the global flags. Adding a
//! new cross-cutting concern requires only one field change here.

use std::path::PathBuf;

use anyhow::Result;

use crate::infra::command_runner::TokioCommandRunner;
use crate::infra::docker::DockerCli;
use crate::output::{OutputContext, TerminalReporter};

/// Output rendering mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-readable terminal output (default).
    Human,
    /// Machine-readable JSON output.
    Json,
}

/// Flags passed from the top-level CLI to `AppContext::new`.
pub struct AppFlags {
    /// Disable ANSI color output.
    pub no_color: bool,
    /// Suppress non-error output.
    pub quiet: bool,
    /// Enable JSON output mode.
    pub json: bool,
    /// Skip interactive prompts (also set by `CI` / `DABK_YES` env vars).
    pub yes: bool,
    /// Explicit project directory instead of searching for `.env`.
    pub project_dir: Option<PathBuf>,
}

/// Unified application context passed to every command handler.
pub struct AppContext {
    /// Terminal output context (colors, quiet mode).
    pub output: OutputContext,
    /// Output rendering mode (human vs JSON).
    pub mode: OutputMode,
    /// Container runtime client.
    pub runtime: DockerCli<TokioCommandRunner>,
    /// Explicit project directory, if given.
    pub project_dir: Option<PathBuf>,
    /// When `true`, skip interactive prompts and proceed.
    ///
    /// Set when `--yes` / `-y` is passed, or when the `CI` or `DABK_YES`
    /// environment variables are present.
    pub non_interactive: bool,
}

impl AppContext {
    /// Construct an `AppContext` from top-level CLI flags.
    #[must_use]
    pub fn new(flags: AppFlags) -> Self {
        let ci_env = std::env::var("CI").is_ok() || std::env::var("DABK_YES").is_ok();
        let mode = if flags.json {
            OutputMode::Json
        } else {
            OutputMode::Human
        };
        // JSON mode keeps stdout machine-readable: progress is suppressed.
        let quiet = flags.quiet || flags.json;

        Self {
            output: OutputContext::new(flags.no_color, quiet),
            mode,
            runtime: DockerCli::default_runner(),
            project_dir: flags.project_dir,
            non_interactive: flags.yes || ci_env || flags.json,
        }
    }

    /// Returns `true` when JSON output mode is active.
    #[must_use]
    pub fn is_json(&self) -> bool {
        self.mode == OutputMode::Json
    }

    /// Progress reporter bound to this context's output settings.
    #[must_use]
    pub fn terminal_reporter(&self) -> TerminalReporter<'_> {
        TerminalReporter::new(&self.output)
    }

    /// Ask the user for confirmation (default: no).
    ///
    /// When `non_interactive` is `true` (CI, `--yes`, `DABK_YES`, or `--json`),
    /// returns `true` immediately without prompting.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal prompt fails (e.g. no TTY available).
    pub fn confirm(&self, prompt: &str) -> Result<bool> {
        if self.non_interactive {
            return Ok(true);
        }
        let confirmed = dialoguer::Confirm::new()
            .with_prompt(prompt)
            .default(false)
            .interact()?;
        Ok(confirmed)
    }
}
