//! CLI argument parsing with clap derive

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::app::{AppContext, AppFlags};
use crate::commands;

/// Docker App Build Kit - provision an app stack and install its dependencies
#[derive(Parser)]
#[command(
    name = "dabk",
    version,
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    /// Skip confirmation prompts
    #[arg(short = 'y', long, global = true)]
    pub yes: bool,

    /// Project directory containing .env (default: search upward from cwd)
    #[arg(long, global = true, env = "DABK_PROJECT_DIR", value_name = "DIR")]
    pub project_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Build and start the project's containers
    Build(commands::build::BuildArgs),

    /// Install Composer dependencies in the app container
    #[command(name = "composer:install", visible_alias = "install")]
    ComposerInstall,

    /// Fix Docker network issues on this host
    #[command(name = "network:fix")]
    NetworkFix,

    /// Show version
    Version,
}

impl Cli {
    /// Execute the CLI command.
    ///
    /// # Errors
    ///
    /// Returns an error if the command fails.
    pub async fn run(self) -> Result<()> {
        let Cli {
            json,
            quiet,
            no_color,
            yes,
            project_dir,
            command,
        } = self;
        let app = AppContext::new(AppFlags {
            no_color,
            quiet,
            json,
            yes,
            project_dir,
        });
        match command {
            Command::Build(args) => commands::build::run(&args, &app).await,
            Command::ComposerInstall => commands::install::run(&app).await,
            Command::NetworkFix => commands::network_fix::run(&app).await,
            Command::Version => {
                commands::version::run(json);
                Ok(())
            }
        }
    }
}
