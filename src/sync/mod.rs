//! Meteo to Capacity Planner reconciliation.
//!
//! This module provides:
//! - Team name derivation from Meteo projects
//! - Named project matching policies
//! - Pure diffing of source and target inventories
//! - The reconciler driving the create, update and delete commands
//! - The run report

mod command;
mod diff;
mod matching;
mod reconciler;
mod report;
mod team;

pub use command::SyncCommand;
pub use diff::{partition_projects, projects_to_remove, teams_to_add, teams_to_remove, ProjectPartition};
pub use matching::{
    ProjectMatch, PROJECT_ID_LOOKUP, SINGLE_PROJECT_DELETE, UNUSED_PROJECT_REMOVAL, UPDATE_PARTITION,
};
pub use reconciler::Reconciler;
pub use report::{ChangeSummary, ResourceCounts, SnapshotCounts, SyncReport};
pub use team::{derived_team_names, team_name_for};

use tracing::info;

use crate::capacity::{CapacityPlanner, PlannerDefaults};
use crate::config::SyncConfig;
use crate::error::{ConfigError, Result};
use crate::http::RestClient;
use crate::meteo::MeteoClient;

/// Connects to both APIs and runs `command`.
///
/// # Errors
///
/// Returns a [`ConfigError`] if a required value is missing, or the first
/// HTTP error from either API.
pub async fn execute(config: &SyncConfig, command: SyncCommand) -> Result<SyncReport> {
    let cp = &config.capacity_planner;
    let base_url = cp
        .base_url
        .as_deref()
        .ok_or_else(|| ConfigError::missing("capacity_planner.base_url"))?;
    let defaults = PlannerDefaults {
        team_name: cp
            .default_team_name
            .clone()
            .ok_or_else(|| ConfigError::missing("capacity_planner.default_team_name"))?,
        deployment_type_name: cp
            .default_deployment_type_name
            .clone()
            .ok_or_else(|| ConfigError::missing("capacity_planner.default_deployment_type_name"))?,
    };

    info!("Connecting to Capacity Planner at {base_url}");
    let backend = RestClient::with_timeout(base_url, cp.timeout_secs)?;
    let planner = CapacityPlanner::connect(backend, &defaults).await?;

    let meteo_backend = RestClient::with_timeout(&config.meteo.base_url, cp.timeout_secs)?;
    let meteo = MeteoClient::new(meteo_backend, &config.meteo);

    Reconciler::new(&planner, config).run(command, &meteo).await
}
