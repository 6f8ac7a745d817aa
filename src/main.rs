//! Capacity Planner sync entrypoint.
//!
//! This is the main entrypoint for the cap-sync command-line tool.

use std::path::Path;
use std::process::ExitCode;

use capacity_planner_sync::cli::{Cli, OutputFormatter};
use capacity_planner_sync::config::{find_config_file, ConfigParser, ConfigValidator};
use capacity_planner_sync::error::Result;
use capacity_planner_sync::sync;

use clap::Parser;
use tracing::{debug, error, warn};
use tracing_subscriber::EnvFilter;

/// Main entrypoint.
fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.verbose);

    // Run async runtime
    let runtime = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            error!("Failed to create async runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(run(cli)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

/// Initializes the logging system.
fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

/// Main async entry point.
async fn run(cli: Cli) -> Result<()> {
    // Unknown commands are reported before either API is touched
    let command = match cli.sync_command() {
        Ok(command) => command,
        Err(message) => {
            error!("{message}");
            return Ok(());
        }
    };

    let config_file = cli.config.clone().or_else(|| find_config_file("."));
    let parser = ConfigParser::new().with_base_path(
        config_file
            .as_deref()
            .and_then(Path::parent)
            .unwrap_or_else(|| Path::new(".")),
    );
    parser.load_dotenv()?;

    if let Some(path) = &config_file {
        debug!("Loading configuration from: {}", path.display());
    }
    let mut config = parser.load(config_file.as_deref())?;
    cli.apply_overrides(&mut config);

    let validation = ConfigValidator::new().validate(&config)?;
    for warning in &validation.warnings {
        warn!("{warning}");
    }

    let report = sync::execute(&config, command).await?;

    let formatter = OutputFormatter::new(cli.output);
    eprintln!("{}", formatter.format_report(&report));

    Ok(())
}
