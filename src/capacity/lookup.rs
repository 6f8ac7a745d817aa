//! Name-to-id resolution.
//!
//! Every lookup fetches the full collection again and scans it linearly, so
//! results reflect mutations made earlier in the same run. A miss is `None`,
//! never an error; callers pick the policy.

use crate::error::Result;
use crate::http::RestBackend;
use crate::sync::ProjectMatch;

use super::planner::CapacityPlanner;
use super::types::{DeploymentType, Pod, Project, Resource, Team};

impl<B: RestBackend> CapacityPlanner<B> {
    /// Returns the id of the first record in `R`'s collection satisfying `matcher`.
    ///
    /// # Errors
    ///
    /// Returns an error if the collection cannot be fetched.
    pub async fn resolve_id<R, F>(&self, matcher: F) -> Result<Option<String>>
    where
        R: Resource,
        F: Fn(&R) -> bool + Send,
    {
        let records: Vec<R> = self.list().await?;
        Ok(records
            .iter()
            .find(|record| matcher(record))
            .map(|record| record.id().to_string()))
    }

    /// Resolves a pod id by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the pod list cannot be fetched.
    pub async fn pod_id(&self, name: &str) -> Result<Option<String>> {
        self.resolve_id::<Pod, _>(|pod| pod.name == name).await
    }

    /// Resolves a team id by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the team list cannot be fetched.
    pub async fn team_id(&self, name: &str) -> Result<Option<String>> {
        self.resolve_id::<Team, _>(|team| team.name == name).await
    }

    /// Resolves a deployment type id by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the deployment type list cannot be fetched.
    pub async fn deployment_type_id(&self, name: &str) -> Result<Option<String>> {
        self.resolve_id::<DeploymentType, _>(|dt| dt.name == name).await
    }

    /// Resolves the name of the deployment type attached to a project.
    ///
    /// # Errors
    ///
    /// Returns an error if either list cannot be fetched.
    pub async fn deployment_type_name(&self, project_id: &str) -> Result<Option<String>> {
        let projects: Vec<Project> = self.list().await?;
        let Some(deployment_type_id) = projects
            .into_iter()
            .find(|p| p.id == project_id)
            .and_then(|p| p.deploymenttype_id)
        else {
            return Ok(None);
        };

        let deployment_types: Vec<DeploymentType> = self.list().await?;
        Ok(deployment_types
            .into_iter()
            .find(|dt| dt.id == deployment_type_id)
            .map(|dt| dt.name))
    }

    /// Resolves a project id under the given matching policy.
    ///
    /// # Errors
    ///
    /// Returns an error if the project list cannot be fetched.
    pub async fn project_id(
        &self,
        policy: ProjectMatch,
        name: &str,
        pod_id: Option<&str>,
    ) -> Result<Option<String>> {
        self.resolve_id::<Project, _>(|project| policy.matches(project, name, pod_id))
            .await
    }

    /// Returns the names of all teams.
    ///
    /// # Errors
    ///
    /// Returns an error if the team list cannot be fetched.
    pub async fn team_names(&self) -> Result<Vec<String>> {
        let teams: Vec<Team> = self.list().await?;
        Ok(teams.into_iter().map(|t| t.name).collect())
    }

    /// Returns all projects.
    ///
    /// # Errors
    ///
    /// Returns an error if the project list cannot be fetched.
    pub async fn projects(&self) -> Result<Vec<Project>> {
        self.list().await
    }
}
