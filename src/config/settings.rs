//! Configuration types for the sync.
//!
//! These structs map to the optional `cap-sync.yaml` file. Every field has a
//! default so that a run can be configured from CLI flags alone.

use serde::{Deserialize, Serialize};

/// Default Meteo base URL.
pub const DEFAULT_METEO_BASE_URL: &str = "http://10.45.207.10";

/// Deployment type assigned to every project created by the sync.
pub const DEFAULT_PROJECT_DEPLOYMENT_TYPE: &str = "5K";

/// Prefix added to Meteo cloud names to form Capacity Planner pod names.
pub const DEFAULT_POD_NAME_PREFIX: &str = "cloud";

/// Default HTTP request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SyncConfig {
    /// Capacity Planner connection settings.
    pub capacity_planner: CapacityPlannerConfig,
    /// Meteo connection settings.
    pub meteo: MeteoConfig,
    /// Settings applied to pods created from Meteo clouds.
    pub pods: PodSettings,
}

/// Capacity Planner connection settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct CapacityPlannerConfig {
    /// Base URL of the Capacity Planner API.
    pub base_url: Option<String>,
    /// Team that unresolved projects fall back to. Created if missing.
    pub default_team_name: Option<String>,
    /// Deployment type that must exist exactly once in Capacity Planner.
    pub default_deployment_type_name: Option<String>,
    /// Deployment type name used for newly created projects.
    pub project_deployment_type: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

/// Meteo connection settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct MeteoConfig {
    /// Base URL of the Meteo API.
    pub base_url: String,
    /// Path of the project list endpoint.
    pub projects_path: String,
    /// Path of the cloud list endpoint.
    pub clouds_path: String,
}

/// Settings applied to pods created from Meteo clouds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PodSettings {
    /// Prefix prepended to the cloud name.
    pub name_prefix: String,
    /// Credentials Capacity Planner uses to query each pod.
    pub credentials: PodCredentials,
}

/// Credentials stored on every created pod.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PodCredentials {
    /// `OpenStack` project the viewer account belongs to.
    pub project: String,
    /// Viewer account name.
    pub username: String,
    /// Viewer account password.
    pub password: String,
}

impl Default for CapacityPlannerConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            default_team_name: None,
            default_deployment_type_name: None,
            project_deployment_type: String::from(DEFAULT_PROJECT_DEPLOYMENT_TYPE),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl Default for MeteoConfig {
    fn default() -> Self {
        Self {
            base_url: String::from(DEFAULT_METEO_BASE_URL),
            projects_path: String::from("/typhoon/get-project-list-api/"),
            clouds_path: String::from("/typhoon/get-clouds-info-api/"),
        }
    }
}

impl Default for PodSettings {
    fn default() -> Self {
        Self {
            name_prefix: String::from(DEFAULT_POD_NAME_PREFIX),
            credentials: PodCredentials::default(),
        }
    }
}

impl Default for PodCredentials {
    fn default() -> Self {
        Self {
            project: String::from("Cap_Plan_Viewer"),
            username: String::from("cap_plan_user"),
            password: String::new(),
        }
    }
}

impl std::fmt::Debug for PodCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PodCredentials")
            .field("project", &self.project)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl SyncConfig {
    /// Returns the pod name Capacity Planner uses for a Meteo cloud.
    #[must_use]
    pub fn pod_name(&self, cloud_name: &str) -> String {
        format!("{}{cloud_name}", self.pods.name_prefix)
    }
}
