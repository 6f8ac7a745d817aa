//! Capacity Planner facade.
//!
//! Wraps a [`RestBackend`] with typed collection operations and performs the
//! start-of-run initialization: resolving the default deployment type and
//! team, and capturing a read-only snapshot of the target inventory.

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::error::{ConfigError, HttpError, Result, SyncError};
use crate::http::{decode, RestBackend};

use super::types::{
    DeploymentType, NewPod, NewTeam, Pod, Project, ProjectPayload, Resource, Team,
};

/// Names resolved once when connecting.
#[derive(Debug, Clone)]
pub struct PlannerDefaults {
    /// Team created on demand and used when a project's team cannot be resolved.
    pub team_name: String,
    /// Deployment type that must match exactly one record.
    pub deployment_type_name: String,
}

/// Target inventory as it was when the run started.
///
/// Never refreshed; lookups always re-fetch instead of reading it.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    /// Teams at start of run.
    pub teams: Vec<Team>,
    /// Pods at start of run.
    pub pods: Vec<Pod>,
    /// Projects at start of run.
    pub projects: Vec<Project>,
}

/// Typed client for the Capacity Planner API.
#[derive(Debug)]
pub struct CapacityPlanner<B> {
    /// REST backend.
    backend: B,
    /// Id of the default deployment type.
    default_deployment_type_id: String,
    /// Id of the default team.
    default_team_id: String,
    /// Start-of-run inventory.
    snapshot: Snapshot,
}

impl<B: RestBackend> CapacityPlanner<B> {
    /// Connects to Capacity Planner and performs initialization.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::DeploymentType`] if the default deployment type
    /// does not match exactly one record, or any HTTP error.
    pub async fn connect(backend: B, defaults: &PlannerDefaults) -> Result<Self> {
        info!("Initialising Capacity Planner");

        let default_deployment_type_id =
            resolve_default_deployment_type(&backend, &defaults.deployment_type_name).await?;
        debug!(
            "Default deployment type '{}' is {default_deployment_type_id}",
            defaults.deployment_type_name
        );

        let mut planner = Self {
            backend,
            default_deployment_type_id,
            default_team_id: String::new(),
            snapshot: Snapshot::default(),
        };

        let teams: Vec<Team> = planner.list().await?;
        planner.default_team_id = match teams.iter().find(|t| t.name == defaults.team_name) {
            Some(team) => team.id.clone(),
            None => {
                info!("Creating default team '{}'", defaults.team_name);
                planner.create_team(&defaults.team_name).await?.id
            }
        };

        planner.snapshot = Snapshot {
            teams: planner.list().await?,
            pods: planner.list().await?,
            projects: planner.list().await?,
        };

        Ok(planner)
    }

    /// Returns the underlying backend.
    #[must_use]
    pub const fn backend(&self) -> &B {
        &self.backend
    }

    /// Returns the id of the default deployment type.
    #[must_use]
    pub fn default_deployment_type_id(&self) -> &str {
        &self.default_deployment_type_id
    }

    /// Returns the id of the default team.
    #[must_use]
    pub fn default_team_id(&self) -> &str {
        &self.default_team_id
    }

    /// Returns the start-of-run snapshot.
    #[must_use]
    pub const fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    /// Fetches a full collection.
    ///
    /// # Errors
    ///
    /// Returns an error if the call fails or the response is not a list of `R`.
    pub async fn list<R: Resource>(&self) -> Result<Vec<R>> {
        let value = self.backend.get(R::COLLECTION, &[]).await?;
        decode(value, R::COLLECTION)
    }

    /// Creates a team and returns the created record.
    ///
    /// # Errors
    ///
    /// Returns an error if the call fails or the response carries no id.
    pub async fn create_team(&self, name: &str) -> Result<Team> {
        let value = self.post(Team::COLLECTION, &NewTeam { name }).await?;
        decode(value, "created team")
    }

    /// Creates a pod.
    ///
    /// # Errors
    ///
    /// Returns an error if the call fails.
    pub async fn create_pod(&self, pod: &NewPod) -> Result<Value> {
        self.post(Pod::COLLECTION, pod).await
    }

    /// Creates a project.
    ///
    /// # Errors
    ///
    /// Returns an error if the call fails.
    pub async fn create_project(&self, project: &ProjectPayload) -> Result<Value> {
        self.post(Project::COLLECTION, project).await
    }

    /// Overwrites every field of an existing project.
    ///
    /// # Errors
    ///
    /// Returns an error if the call fails.
    pub async fn update_project(&self, id: &str, project: &ProjectPayload) -> Result<Value> {
        let body = to_body(project)?;
        self.backend.put(&Project::item_path(id), &body).await
    }

    /// Deletes a record by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the call fails.
    pub async fn delete<R: Resource>(&self, id: &str) -> Result<()> {
        debug!("Deleting {} {id}", R::KIND);
        self.backend.delete(&R::item_path(id)).await?;
        Ok(())
    }

    async fn post<T: Serialize + Sync>(&self, path: &str, payload: &T) -> Result<Value> {
        let body = to_body(payload)?;
        self.backend.post(path, &body).await
    }
}

async fn resolve_default_deployment_type<B: RestBackend>(backend: &B, name: &str) -> Result<String> {
    let filter = format!("name={name}");
    let value = backend
        .get(DeploymentType::COLLECTION, &[("q", filter.as_str())])
        .await?;
    let matches: Vec<DeploymentType> = decode(value, DeploymentType::COLLECTION)?;

    match matches.as_slice() {
        [only] => Ok(only.id.clone()),
        _ => Err(SyncError::Config(ConfigError::DeploymentType {
            name: name.to_string(),
            matches: matches.len(),
        })),
    }
}

fn to_body<T: Serialize>(payload: &T) -> Result<Value> {
    serde_json::to_value(payload)
        .map_err(|e| SyncError::Http(HttpError::decode(format!("Failed to encode payload: {e}"))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeBackend;
    use serde_json::json;

    fn defaults() -> PlannerDefaults {
        PlannerDefaults {
            team_name: String::from("unassigned"),
            deployment_type_name: String::from("standard"),
        }
    }

    #[tokio::test]
    async fn test_connect_resolves_existing_defaults() {
        let backend = FakeBackend::new()
            .with_record("/api/deploymenttypes/", json!({"_id": "d1", "name": "standard"}))
            .with_record("/api/teams/", json!({"_id": "t1", "name": "unassigned"}))
            .with_record("/api/pods/", json!({"_id": "p1", "name": "cloud1"}));

        let planner = CapacityPlanner::connect(backend, &defaults())
            .await
            .expect("connect should succeed");

        assert_eq!(planner.default_deployment_type_id(), "d1");
        assert_eq!(planner.default_team_id(), "t1");
        assert_eq!(planner.snapshot().pods.len(), 1);
        assert!(planner.backend().calls_with_method("POST").is_empty());
    }

    #[tokio::test]
    async fn test_connect_creates_missing_default_team() {
        let backend = FakeBackend::new()
            .with_record("/api/deploymenttypes/", json!({"_id": "d1", "name": "standard"}));

        let planner = CapacityPlanner::connect(backend, &defaults())
            .await
            .expect("connect should succeed");

        let posts = planner.backend().calls_with_method("POST");
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].body, Some(json!({"name": "unassigned"})));
        assert!(!planner.default_team_id().is_empty());
        assert_eq!(planner.snapshot().teams.len(), 1);
    }

    #[tokio::test]
    async fn test_connect_fails_without_deployment_type() {
        let err = CapacityPlanner::connect(FakeBackend::new(), &defaults())
            .await
            .expect_err("connect should fail");

        assert!(matches!(
            err,
            SyncError::Config(ConfigError::DeploymentType { matches: 0, .. })
        ));
    }

    #[tokio::test]
    async fn test_connect_fails_on_ambiguous_deployment_type() {
        let backend = FakeBackend::new()
            .with_record("/api/deploymenttypes/", json!({"_id": "d1", "name": "standard"}))
            .with_record("/api/deploymenttypes/", json!({"_id": "d2", "name": "standard"}));

        let err = CapacityPlanner::connect(backend, &defaults())
            .await
            .expect_err("connect should fail");

        assert!(matches!(
            err,
            SyncError::Config(ConfigError::DeploymentType { matches: 2, .. })
        ));
    }

    #[tokio::test]
    async fn test_deployment_type_lookup_uses_name_filter() {
        let backend = FakeBackend::new()
            .with_record("/api/deploymenttypes/", json!({"_id": "d1", "name": "standard"}))
            .with_record("/api/deploymenttypes/", json!({"_id": "d2", "name": "5K"}));

        let planner = CapacityPlanner::connect(backend, &defaults())
            .await
            .expect("connect should succeed");

        let first = &planner.backend().calls()[0];
        assert_eq!(first.method, "GET");
        assert_eq!(first.query.as_deref(), Some("q=name=standard"));
    }
}
