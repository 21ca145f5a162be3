//! uchimo operator tool entry point
//!
//! Run with:
//! ```bash
//! cargo run -p uchimo-cli -- migrate
//! cargo run -p uchimo-cli -- seed
//! cargo run -p uchimo-cli -- recount <post-id>...
//! ```
//!
//! Configuration is loaded from environment variables or config files.

use clap::Parser;
use tracing::{error, info};
use uchimo_cli::{commands, Cli};
use uchimo_common::{try_init_tracing_with_config, AppConfig, AppResult, TracingConfig};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        error!(error = %e, "Command failed");
        eprintln!("{}", commands::error_report(&e));
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> AppResult<()> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let config = AppConfig::load(cli.config.as_deref())?;

    if let Err(e) = try_init_tracing_with_config(&TracingConfig::for_environment(config.app.env)) {
        eprintln!("Warning: Failed to initialize tracing: {e}");
    }

    info!(env = ?config.app.env, command = ?cli.command, "Configuration loaded");

    commands::run(config, cli.command).await
}
