//! CLI argument definitions.
//!
//! Every flag can also come from an environment variable so the tool runs
//! unchanged from cron or a container.

use clap::Parser;
use std::path::PathBuf;

use crate::config::SyncConfig;
use crate::sync::SyncCommand;

/// Capacity Planner sync - reconciles Capacity Planner with Meteo.
#[derive(Parser, Debug)]
#[command(name = "cap-sync")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "Values left unset on the command line are read from the config file.")]
pub struct Cli {
    /// Capacity Planner base URL [config: capacity_planner.base_url].
    #[arg(long, env = "CAPACITY_PLANNER_BASE_URL")]
    pub capacity_planner_base_url: Option<String>,

    /// Team assigned to projects whose team cannot be resolved
    /// [config: capacity_planner.default_team_name].
    #[arg(long, env = "DEFAULT_TEAM_NAME")]
    pub default_team_name: Option<String>,

    /// Deployment type that must exist exactly once in Capacity Planner
    /// [config: capacity_planner.default_deployment_type_name].
    #[arg(long, env = "DEFAULT_DEPLOYMENT_TYPE_NAME")]
    pub default_deployment_type_name: Option<String>,

    /// Command to run (create, update, delete).
    #[arg(long, env = "COMMAND_TO_RUN")]
    pub command_to_run: String,

    /// Meteo base URL [config: meteo.base_url].
    #[arg(long, env = "METEO_BASE_URL")]
    pub meteo_base_url: Option<String>,

    /// Path to the configuration file.
    #[arg(short, long, env = "CAP_SYNC_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,

    /// Output format (text, json).
    #[arg(long, default_value = "text")]
    pub output: OutputFormat,
}

/// Output format options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    #[default]
    Text,
    /// JSON output for scripting.
    Json,
}

impl Cli {
    /// Parses the requested command.
    ///
    /// # Errors
    ///
    /// Returns a message naming the valid commands if the value is unknown.
    pub fn sync_command(&self) -> Result<SyncCommand, String> {
        self.command_to_run.parse()
    }

    /// Applies flags on top of file and environment configuration.
    pub fn apply_overrides(&self, config: &mut SyncConfig) {
        let cp = &mut config.capacity_planner;
        if let Some(url) = &self.capacity_planner_base_url {
            cp.base_url = Some(url.clone());
        }
        if let Some(name) = &self.default_team_name {
            cp.default_team_name = Some(name.clone());
        }
        if let Some(name) = &self.default_deployment_type_name {
            cp.default_deployment_type_name = Some(name.clone());
        }
        if let Some(url) = &self.meteo_base_url {
            config.meteo.base_url.clone_from(url);
        }
    }
}
