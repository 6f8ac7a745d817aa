//! Reconciler for pushing Meteo inventory into Capacity Planner.
//!
//! Each command is a fixed sequence of passes. Every pass fetches what it
//! needs from Capacity Planner again, so later passes see the mutations of
//! earlier ones. Calls are issued one at a time and the first failure aborts
//! the run; nothing already applied is rolled back.

use tracing::{debug, info, info_span, warn, Instrument};

use crate::capacity::{CapacityPlanner, NewPod, Pod, Project, ProjectPayload, Resource, Team};
use crate::config::SyncConfig;
use crate::error::Result;
use crate::http::RestBackend;
use crate::meteo::{MeteoClient, MeteoCloud, MeteoProject};

use super::command::SyncCommand;
use super::diff::{partition_projects, projects_to_remove, teams_to_add, teams_to_remove};
use super::matching::{PROJECT_ID_LOOKUP, SINGLE_PROJECT_DELETE};
use super::report::{ChangeSummary, SnapshotCounts, SyncReport};
use super::team::{derived_team_names, team_name_for};

/// Applies sync commands against a connected [`CapacityPlanner`].
pub struct Reconciler<'a, B> {
    /// Connected Capacity Planner client.
    planner: &'a CapacityPlanner<B>,
    /// Configuration.
    config: &'a SyncConfig,
}

impl<'a, B: RestBackend> Reconciler<'a, B> {
    /// Creates a new reconciler.
    #[must_use]
    pub const fn new(planner: &'a CapacityPlanner<B>, config: &'a SyncConfig) -> Self {
        Self { planner, config }
    }

    /// Runs a command, fetching only the Meteo lists it needs.
    ///
    /// # Errors
    ///
    /// Returns the first HTTP or decode error encountered.
    pub async fn run<M: RestBackend>(
        &self,
        command: SyncCommand,
        meteo: &MeteoClient<M>,
    ) -> Result<SyncReport> {
        let mut report = SyncReport::start(command, SnapshotCounts::from(self.planner.snapshot()));
        let span = info_span!("sync", run_id = %report.run_id, command = %command);
        self.dispatch(command, meteo, &mut report.changes)
            .instrument(span)
            .await?;

        let report = report.finish();
        info!(
            "Sync '{command}' applied {} changes in {}ms",
            report.changes.total(),
            report.duration_ms()
        );
        Ok(report)
    }

    async fn dispatch<M: RestBackend>(
        &self,
        command: SyncCommand,
        meteo: &MeteoClient<M>,
        changes: &mut ChangeSummary,
    ) -> Result<()> {
        let clouds = if command.needs_clouds() {
            meteo.clouds().await?
        } else {
            Vec::new()
        };
        let projects = if command.needs_projects() {
            meteo.projects().await?
        } else {
            Vec::new()
        };

        match command {
            SyncCommand::Create => self.create(&clouds, &projects, changes).await,
            SyncCommand::Update => self.update(&projects, changes).await,
            SyncCommand::Delete => self.delete(changes).await,
        }
    }

    /// Bulk-loads pods, then teams, then projects.
    ///
    /// # Errors
    ///
    /// Returns the first failed call.
    pub async fn create(
        &self,
        clouds: &[MeteoCloud],
        projects: &[MeteoProject],
        changes: &mut ChangeSummary,
    ) -> Result<()> {
        info!("Creating all pods, teams and projects");
        self.create_pods(clouds, changes).await?;
        self.create_teams(projects, changes).await?;
        self.create_projects(projects, changes).await
    }

    /// Creates one pod per cloud.
    ///
    /// # Errors
    ///
    /// Returns the first failed call.
    pub async fn create_pods(&self, clouds: &[MeteoCloud], changes: &mut ChangeSummary) -> Result<()> {
        info!("Creating {} pods", clouds.len());
        let credentials = &self.config.pods.credentials;

        for cloud in clouds {
            let pod = NewPod {
                name: self.config.pod_name(&cloud.cloud_name),
                auth_url: cloud.auth_url.clone(),
                project: credentials.project.clone(),
                username: credentials.username.clone(),
                password: credentials.password.clone(),
                cpu: cloud.total_cpu.clone(),
                memory_mb: cloud.total_ram.clone(),
                cinder_gb: cloud.total_cinder_storage.clone(),
                cinder_iops: cloud.cinder_iops.clone(),
                enfs_gb: cloud.total_enfs_storage.clone(),
                enfs_iops: cloud.total_enfs_iops.clone(),
                cpu_contention_ratio: cloud.cpu_ratio.clone(),
            };
            debug!("Creating pod {}", pod.name);
            self.planner.create_pod(&pod).await?;
            changes.pods.created += 1;
        }
        Ok(())
    }

    /// Creates each distinct team derived from `projects`.
    ///
    /// # Errors
    ///
    /// Returns the first failed call.
    pub async fn create_teams(&self, projects: &[MeteoProject], changes: &mut ChangeSummary) -> Result<()> {
        let names = derived_team_names(projects);
        info!("Creating {} teams", names.len());

        for name in names {
            debug!("Creating team {name}");
            self.planner.create_team(name).await?;
            changes.teams.created += 1;
        }
        Ok(())
    }

    /// Creates projects, resolving pod, team and deployment type for each.
    ///
    /// A project whose pod does not exist is skipped. Unresolved teams and
    /// deployment types fall back to the defaults.
    ///
    /// # Errors
    ///
    /// Returns the first failed call.
    pub async fn create_projects<'p>(
        &self,
        projects: impl IntoIterator<Item = &'p MeteoProject>,
        changes: &mut ChangeSummary,
    ) -> Result<()> {
        info!("Creating projects");
        let deployment_type = &self.config.capacity_planner.project_deployment_type;

        for project in projects {
            let Some(pod_id) = self.resolve_pod(project).await? else {
                changes.projects.skipped += 1;
                continue;
            };
            let team_id = self.resolve_team(project).await?;
            let deployment_type_id = self.resolve_deployment_type(deployment_type).await?;

            debug!("Creating project {}", project.project_name);
            let payload = project_payload(project, pod_id, team_id, deployment_type_id);
            self.planner.create_project(&payload).await?;
            changes.projects.created += 1;
        }
        Ok(())
    }

    /// Incrementally syncs teams and projects with the Meteo project list.
    ///
    /// Pods are neither created nor removed.
    ///
    /// # Errors
    ///
    /// Returns the first failed call.
    pub async fn update(&self, projects: &[MeteoProject], changes: &mut ChangeSummary) -> Result<()> {
        info!("Updating teams and projects from {} source projects", projects.len());
        self.add_new_teams(projects, changes).await?;
        self.update_projects_and_teams(projects, changes).await?;
        self.remove_unused_projects(projects, changes).await?;
        self.remove_unused_teams(projects, changes).await
    }

    /// Creates derived teams Capacity Planner does not have yet.
    ///
    /// # Errors
    ///
    /// Returns the first failed call.
    pub async fn add_new_teams(&self, projects: &[MeteoProject], changes: &mut ChangeSummary) -> Result<()> {
        info!("Adding new teams");
        let existing = self.planner.team_names().await?;

        for name in teams_to_add(projects, &existing) {
            debug!("Adding team {name}");
            self.planner.create_team(name).await?;
            changes.teams.created += 1;
        }
        Ok(())
    }

    /// Creates new projects (and their teams) and updates existing ones.
    ///
    /// # Errors
    ///
    /// Returns the first failed call.
    pub async fn update_projects_and_teams(
        &self,
        projects: &[MeteoProject],
        changes: &mut ChangeSummary,
    ) -> Result<()> {
        let target = self.planner.projects().await?;
        let partition = partition_projects(projects, &target);
        info!(
            "Found {} new and {} existing projects",
            partition.new.len(),
            partition.existing.len()
        );

        for project in &partition.new {
            self.ensure_team(team_name_for(project), changes).await?;
        }
        self.create_projects(partition.new.iter().copied(), changes).await?;
        self.update_projects(&partition.existing, changes).await
    }

    /// Overwrites existing projects with freshly resolved fields.
    ///
    /// The project keeps its current deployment type. Projects whose pod or
    /// id cannot be resolved are skipped.
    ///
    /// # Errors
    ///
    /// Returns the first failed call.
    pub async fn update_projects(&self, projects: &[&MeteoProject], changes: &mut ChangeSummary) -> Result<()> {
        info!("Updating {} projects", projects.len());

        for project in projects {
            let Some(pod_id) = self.resolve_pod(project).await? else {
                changes.projects.skipped += 1;
                continue;
            };
            let Some(project_id) = self
                .planner
                .project_id(PROJECT_ID_LOOKUP, &project.project_name, Some(&pod_id))
                .await?
            else {
                warn!(
                    "Skipping project {}: no match by {PROJECT_ID_LOOKUP} in pod {pod_id}",
                    project.project_name
                );
                changes.projects.skipped += 1;
                continue;
            };

            let team_id = self.resolve_team(project).await?;
            let deployment_type_id = match self.planner.deployment_type_name(&project_id).await? {
                Some(name) => self.resolve_deployment_type(&name).await?,
                None => self.planner.default_deployment_type_id().to_string(),
            };

            debug!("Updating project {} ({project_id})", project.project_name);
            let payload = project_payload(project, pod_id, team_id, deployment_type_id);
            self.planner.update_project(&project_id, &payload).await?;
            changes.projects.updated += 1;
        }
        Ok(())
    }

    /// Deletes target projects whose name no source project carries.
    ///
    /// # Errors
    ///
    /// Returns the first failed call.
    pub async fn remove_unused_projects(
        &self,
        projects: &[MeteoProject],
        changes: &mut ChangeSummary,
    ) -> Result<()> {
        info!("Removing unused projects");
        let target = self.planner.projects().await?;

        for project in projects_to_remove(projects, &target) {
            debug!("Removing project {}", project.name);
            self.planner.delete::<Project>(&project.id).await?;
            changes.projects.deleted += 1;
        }
        Ok(())
    }

    /// Deletes target teams no source project derives to.
    ///
    /// This includes the default team when no project maps to it.
    ///
    /// # Errors
    ///
    /// Returns the first failed call.
    pub async fn remove_unused_teams(&self, projects: &[MeteoProject], changes: &mut ChangeSummary) -> Result<()> {
        info!("Removing unused teams");
        let target: Vec<Team> = self.planner.list().await?;

        for team in teams_to_remove(projects, &target) {
            debug!("Removing team {}", team.name);
            self.planner.delete::<Team>(&team.id).await?;
            changes.teams.deleted += 1;
        }
        Ok(())
    }

    /// Deletes all projects, then all teams, then all pods.
    ///
    /// # Errors
    ///
    /// Returns the first failed call.
    pub async fn delete(&self, changes: &mut ChangeSummary) -> Result<()> {
        info!("Deleting all projects, teams and pods");
        changes.projects.deleted += self.delete_all::<Project>().await?;
        changes.teams.deleted += self.delete_all::<Team>().await?;
        changes.pods.deleted += self.delete_all::<Pod>().await?;
        Ok(())
    }

    /// Deletes every team named `name` and returns how many were removed.
    ///
    /// # Errors
    ///
    /// Returns the first failed call.
    pub async fn delete_team(&self, name: &str) -> Result<usize> {
        let teams: Vec<Team> = self.planner.list().await?;
        let mut deleted = 0;

        for team in teams.iter().filter(|t| t.name == name) {
            self.planner.delete::<Team>(&team.id).await?;
            deleted += 1;
        }
        Ok(deleted)
    }

    /// Deletes every project matching `name` and `pod_id` and returns how many
    /// were removed.
    ///
    /// # Errors
    ///
    /// Returns the first failed call.
    pub async fn delete_project(&self, name: &str, pod_id: Option<&str>) -> Result<usize> {
        let projects = self.planner.projects().await?;
        let mut deleted = 0;

        for project in projects
            .iter()
            .filter(|p| SINGLE_PROJECT_DELETE.matches(p, name, pod_id))
        {
            self.planner.delete::<Project>(&project.id).await?;
            deleted += 1;
        }
        Ok(deleted)
    }

    async fn delete_all<R: Resource>(&self) -> Result<usize> {
        let records: Vec<R> = self.planner.list().await?;
        info!("Deleting {} {} records", records.len(), R::KIND);

        for record in &records {
            debug!("Deleting {} {}", R::KIND, record.name());
            self.planner.delete::<R>(record.id()).await?;
        }
        Ok(records.len())
    }

    async fn ensure_team(&self, name: &str, changes: &mut ChangeSummary) -> Result<()> {
        let existing = self.planner.team_names().await?;
        if !existing.iter().any(|team| team == name) {
            debug!("Adding team {name} for new project");
            self.planner.create_team(name).await?;
            changes.teams.created += 1;
        }
        Ok(())
    }

    async fn resolve_pod(&self, project: &MeteoProject) -> Result<Option<String>> {
        let pod_name = self.config.pod_name(&project.cloud);
        let pod_id = self.planner.pod_id(&pod_name).await?;
        if pod_id.is_none() {
            warn!(
                "Skipping project {}: pod {pod_name} does not exist",
                project.project_name
            );
        }
        Ok(pod_id)
    }

    async fn resolve_team(&self, project: &MeteoProject) -> Result<String> {
        let name = team_name_for(project);
        Ok(match self.planner.team_id(name).await? {
            Some(id) => id,
            None => {
                debug!("Team {name} not found, using default team");
                self.planner.default_team_id().to_string()
            }
        })
    }

    async fn resolve_deployment_type(&self, name: &str) -> Result<String> {
        Ok(match self.planner.deployment_type_id(name).await? {
            Some(id) => id,
            None => {
                debug!("Deployment type {name} not found, using default");
                self.planner.default_deployment_type_id().to_string()
            }
        })
    }
}

fn project_payload(
    project: &MeteoProject,
    pod_id: String,
    team_id: String,
    deploymenttype_id: String,
) -> ProjectPayload {
    ProjectPayload {
        pod_id,
        team_id,
        deploymenttype_id,
        name: project.project_name.clone(),
        cpu: project.allocated_cpu.clone(),
        memory_mb: project.allocated_ram.clone(),
        cinder_gb: project.allocated_storage.clone(),
    }
}
