//! Credentials handed to spawned `OpenStack` clients.

use crate::config::PodCredentials;

/// Region exported for commands that need one.
pub const DEFAULT_REGION: &str = "RegionOne";

/// Keystone credentials for one cloud.
///
/// Applied to each child process only; the parent environment is never
/// modified.
#[derive(Clone, PartialEq, Eq)]
pub struct OpenStackEnv {
    /// Keystone endpoint.
    pub auth_url: String,
    /// Project (tenant) to scope to.
    pub project_name: String,
    /// Account name.
    pub username: String,
    /// Account password.
    pub password: String,
    /// Region for region-scoped commands.
    pub region: String,
}

impl OpenStackEnv {
    /// Builds the environment for a pod from its Keystone endpoint and the
    /// configured viewer credentials.
    #[must_use]
    pub fn for_pod(auth_url: impl Into<String>, credentials: &PodCredentials) -> Self {
        Self {
            auth_url: auth_url.into(),
            project_name: credentials.project.clone(),
            username: credentials.username.clone(),
            password: credentials.password.clone(),
            region: DEFAULT_REGION.to_string(),
        }
    }

    /// Overrides the region.
    #[must_use]
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        self
    }

    /// Variables to set on the child process.
    #[must_use]
    pub fn vars(&self, requires_region: bool) -> Vec<(String, String)> {
        let mut vars = vec![
            (String::from("OS_AUTH_URL"), self.auth_url.clone()),
            (String::from("OS_TENANT_NAME"), self.project_name.clone()),
            (String::from("OS_PROJECT_NAME"), self.project_name.clone()),
            (String::from("OS_USERNAME"), self.username.clone()),
            (String::from("OS_PASSWORD"), self.password.clone()),
        ];
        if requires_region {
            vars.push((String::from("OS_REGION_NAME"), self.region.clone()));
        }
        vars
    }
}

impl std::fmt::Debug for OpenStackEnv {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenStackEnv")
            .field("auth_url", &self.auth_url)
            .field("project_name", &self.project_name)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("region", &self.region)
            .finish()
    }
}
