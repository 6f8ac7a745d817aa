//! Capacity Planner integration module.
//!
//! This module provides the typed client for the Capacity Planner CRUD API:
//! record types, initialization, and name-to-id lookups.

mod types;
mod planner;
mod lookup;

pub use types::{
    DeploymentType, NewPod, NewTeam, Pod, Project, ProjectPayload, Resource, Team,
    DEPLOYMENT_TYPES_PATH, PODS_PATH, PROJECTS_PATH, TEAMS_PATH,
};
pub use planner::{CapacityPlanner, PlannerDefaults, Snapshot};
