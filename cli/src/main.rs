//! dabk - Docker App Build Kit

use clap::Parser;
use tracing_subscriber::EnvFilter;

use dabk_cli::cli::Cli;
use dabk_cli::output::json;

/// Log filter variable. `RUST_LOG` is honoured when it is unset.
const LOG_ENV: &str = "DABK_LOG";

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() {
    init_tracing();
    let cli = Cli::parse();
    let json_mode = cli.json;
    if let Err(e) = cli.run().await {
        tracing::debug!(error = ?e, "command failed");
        if json_mode {
            let code = json::error_code(&e);
            match json::format_error(&format!("{e:#}"), code) {
                Ok(body) => eprintln!("{body}"),
                Err(_) => eprintln!("Error: {e:#}"),
            }
        } else {
            eprintln!("Error: {e:#}");
        }
        std::process::exit(1);
    }
}
