//! Team name derivation.

use std::collections::BTreeSet;

use crate::meteo::MeteoProject;

/// Returns the team that owns a Meteo project.
///
/// An explicit, non-empty `team` wins. Otherwise the project name is cut at
/// its last underscore (`alpha_beta_gamma` belongs to `alpha_beta`); a name
/// without an underscore is its own team.
#[must_use]
pub fn team_name_for(project: &MeteoProject) -> &str {
    match project.team.as_deref() {
        Some(team) if !team.is_empty() => team,
        _ => project
            .project_name
            .rsplit_once('_')
            .map_or(project.project_name.as_str(), |(team, _)| team),
    }
}

/// Distinct team names derived from a project list, in sorted order.
#[must_use]
pub fn derived_team_names(projects: &[MeteoProject]) -> BTreeSet<&str> {
    projects.iter().map(team_name_for).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Number;

    fn project(name: &str, team: Option<&str>) -> MeteoProject {
        MeteoProject {
            project_name: name.to_string(),
            cloud: String::from("1"),
            team: team.map(String::from),
            allocated_cpu: Number::from(1),
            allocated_ram: Number::from(1),
            allocated_storage: Number::from(1),
        }
    }

    #[test]
    fn test_explicit_team_wins() {
        assert_eq!(team_name_for(&project("alpha_beta", Some("X"))), "X");
    }

    #[test]
    fn test_empty_team_uses_prefix_before_last_underscore() {
        assert_eq!(
            team_name_for(&project("alpha_beta_gamma", Some(""))),
            "alpha_beta"
        );
    }

    #[test]
    fn test_missing_team_uses_prefix() {
        assert_eq!(team_name_for(&project("web_prod", None)), "web");
    }

    #[test]
    fn test_name_without_underscore_is_its_own_team() {
        assert_eq!(team_name_for(&project("standalone", None)), "standalone");
    }

    #[test]
    fn test_derived_names_are_deduplicated() {
        let projects = vec![
            project("web_prod", None),
            project("web_dev", None),
            project("db_prod", Some("")),
            project("misc", Some("web")),
            project("standalone", None),
        ];

        let names: Vec<&str> = derived_team_names(&projects).into_iter().collect();
        assert_eq!(names, vec!["db", "standalone", "web"]);
    }
}
