//! Pure diffing between the Meteo source lists and Capacity Planner lists.
//!
//! Nothing here performs I/O; the reconciler fetches both sides and applies
//! the results.

use std::collections::BTreeSet;
use tracing::debug;

use crate::capacity::{Project, Team};
use crate::meteo::MeteoProject;

use super::matching::{UNUSED_PROJECT_REMOVAL, UPDATE_PARTITION};
use super::team::{derived_team_names, team_name_for};

/// Source projects split by whether Capacity Planner already knows them.
#[derive(Debug, Default)]
pub struct ProjectPartition<'a> {
    /// Projects to create.
    pub new: Vec<&'a MeteoProject>,
    /// Projects to update in place.
    pub existing: Vec<&'a MeteoProject>,
}

/// Derived source team names missing from `existing`, each once.
#[must_use]
pub fn teams_to_add<'a>(source: &'a [MeteoProject], existing: &[String]) -> BTreeSet<&'a str> {
    derived_team_names(source)
        .into_iter()
        .filter(|name| !existing.iter().any(|e| e.as_str() == *name))
        .collect()
}

/// Target teams no source project derives to.
#[must_use]
pub fn teams_to_remove<'t>(source: &[MeteoProject], target: &'t [Team]) -> Vec<&'t Team> {
    let wanted = derived_team_names(source);
    target
        .iter()
        .filter(|team| !wanted.contains(team.name.as_str()))
        .collect()
}

/// Splits source projects into new and existing, matching with [`UPDATE_PARTITION`].
#[must_use]
pub fn partition_projects<'a>(source: &'a [MeteoProject], target: &[Project]) -> ProjectPartition<'a> {
    let mut partition = ProjectPartition::default();

    for project in source {
        let known = target
            .iter()
            .any(|t| UPDATE_PARTITION.matches(t, &project.project_name, None));

        if known {
            partition.existing.push(project);
        } else {
            debug!(
                "Project {} (team {}) is new",
                project.project_name,
                team_name_for(project)
            );
            partition.new.push(project);
        }
    }

    partition
}

/// Target projects whose name no source project carries, matching with
/// [`UNUSED_PROJECT_REMOVAL`].
#[must_use]
pub fn projects_to_remove<'t>(source: &[MeteoProject], target: &'t [Project]) -> Vec<&'t Project> {
    target
        .iter()
        .filter(|t| {
            !source
                .iter()
                .any(|s| UNUSED_PROJECT_REMOVAL.matches(t, &s.project_name, None))
        })
        .collect()
}
