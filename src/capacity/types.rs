//! Capacity Planner records and request payloads.

use serde::{Deserialize, Serialize};
use serde_json::Number;

/// Teams collection path.
pub const TEAMS_PATH: &str = "/api/teams/";

/// Pods collection path.
pub const PODS_PATH: &str = "/api/pods/";

/// Projects collection path.
pub const PROJECTS_PATH: &str = "/api/projects/";

/// Deployment types collection path.
pub const DEPLOYMENT_TYPES_PATH: &str = "/api/deploymenttypes/";

/// A Capacity Planner collection whose records have an opaque id and a name.
pub trait Resource: serde::de::DeserializeOwned + Send {
    /// Collection path, with trailing slash.
    const COLLECTION: &'static str;

    /// Human-readable kind used in logs.
    const KIND: &'static str;

    /// Opaque record id.
    fn id(&self) -> &str;

    /// Record name.
    fn name(&self) -> &str;

    /// Path of a single record.
    fn item_path(id: &str) -> String {
        format!("{}{id}", Self::COLLECTION)
    }
}

/// An ownership grouping for projects.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Team {
    /// Opaque id.
    #[serde(rename = "_id")]
    pub id: String,
    /// Team name.
    pub name: String,
}

/// One cloud's aggregate capacity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Pod {
    /// Opaque id.
    #[serde(rename = "_id")]
    pub id: String,
    /// Pod name, `cloud<name>` for pods created by the sync.
    pub name: String,
    /// Keystone endpoint.
    #[serde(default, rename = "authUrl", skip_serializing_if = "Option::is_none")]
    pub auth_url: Option<String>,
}

/// Reference classification attached to every project.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeploymentType {
    /// Opaque id.
    #[serde(rename = "_id")]
    pub id: String,
    /// Deployment type name.
    pub name: String,
}

/// One tenant's allocation within a pod.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Project {
    /// Opaque id.
    #[serde(rename = "_id")]
    pub id: String,
    /// Project name.
    pub name: String,
    /// Owning pod.
    #[serde(default)]
    pub pod_id: Option<String>,
    /// Owning team.
    #[serde(default)]
    pub team_id: Option<String>,
    /// Deployment type.
    #[serde(default)]
    pub deploymenttype_id: Option<String>,
    /// Allocated vCPUs.
    #[serde(default)]
    pub cpu: Option<Number>,
    /// Allocated memory in MB.
    #[serde(default)]
    pub memory_mb: Option<Number>,
    /// Allocated block storage in GB.
    #[serde(default)]
    pub cinder_gb: Option<Number>,
}

/// Body of a team POST.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct NewTeam<'a> {
    /// Team name.
    pub name: &'a str,
}

/// Body of a pod POST.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct NewPod {
    /// Pod name.
    pub name: String,
    /// Keystone endpoint.
    #[serde(rename = "authUrl")]
    pub auth_url: String,
    /// Viewer project.
    pub project: String,
    /// Viewer account.
    pub username: String,
    /// Viewer password.
    pub password: String,
    /// Total vCPUs.
    pub cpu: Number,
    /// Total memory in MB.
    pub memory_mb: Number,
    /// Total block storage in GB.
    pub cinder_gb: Number,
    /// Block storage IOPS.
    pub cinder_iops: Number,
    /// Total ENFS storage in GB.
    pub enfs_gb: Number,
    /// ENFS IOPS.
    pub enfs_iops: Number,
    /// CPU overcommit ratio.
    pub cpu_contention_ratio: Number,
}

/// Body of a project POST or PUT. A PUT overwrites every field.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ProjectPayload {
    /// Owning pod.
    pub pod_id: String,
    /// Owning team.
    pub team_id: String,
    /// Deployment type.
    pub deploymenttype_id: String,
    /// Project name.
    pub name: String,
    /// Allocated vCPUs.
    pub cpu: Number,
    /// Allocated memory in MB.
    pub memory_mb: Number,
    /// Allocated block storage in GB.
    pub cinder_gb: Number,
}

impl Resource for Team {
    const COLLECTION: &'static str = TEAMS_PATH;
    const KIND: &'static str = "team";

    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl Resource for Pod {
    const COLLECTION: &'static str = PODS_PATH;
    const KIND: &'static str = "pod";

    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl Resource for DeploymentType {
    const COLLECTION: &'static str = DEPLOYMENT_TYPES_PATH;
    const KIND: &'static str = "deployment type";

    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl Resource for Project {
    const COLLECTION: &'static str = PROJECTS_PATH;
    const KIND: &'static str = "project";

    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_project_decodes_underscore_id_and_missing_fields() {
        let project: Project = serde_json::from_value(json!({
            "_id": "abc",
            "name": "web_prod",
            "pod_id": "p1"
        }))
        .expect("project should decode");

        assert_eq!(project.id, "abc");
        assert_eq!(project.pod_id.as_deref(), Some("p1"));
        assert!(project.team_id.is_none());
        assert!(project.cpu.is_none());
    }

    #[test]
    fn test_pod_payload_field_names() {
        let pod = NewPod {
            name: String::from("cloud1"),
            auth_url: String::from("http://keystone:5000/v3"),
            project: String::from("viewer"),
            username: String::from("user"),
            password: String::from("pw"),
            cpu: Number::from(64),
            memory_mb: Number::from(262_144),
            cinder_gb: Number::from(1000),
            cinder_iops: Number::from(5000),
            enfs_gb: Number::from(200),
            enfs_iops: Number::from(800),
            cpu_contention_ratio: Number::from(4),
        };

        let value = serde_json::to_value(&pod).expect("pod should serialize");
        assert_eq!(value["authUrl"], "http://keystone:5000/v3");
        assert_eq!(value["cpu"], 64);
        assert!(value.get("auth_url").is_none());
    }

    #[test]
    fn test_payload_escapes_names() {
        let team = NewTeam { name: "quote\"team" };
        let value = serde_json::to_string(&team).expect("team should serialize");
        assert_eq!(value, r#"{"name":"quote\"team"}"#);
    }

    #[test]
    fn test_item_path() {
        assert_eq!(Team::item_path("t1"), "/api/teams/t1");
        assert_eq!(Project::item_path("x"), "/api/projects/x");
    }
}
