//! Meteo inventory records.
//!
//! Meteo reports quantities either as JSON numbers or as numeric strings;
//! both decode to [`Number`] so they are forwarded to Capacity Planner as
//! numbers.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Number;

/// A cloud (one Capacity Planner pod).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MeteoCloud {
    /// Cloud name, without the pod prefix.
    #[serde(deserialize_with = "string_or_number")]
    pub cloud_name: String,
    /// Keystone endpoint.
    pub auth_url: String,
    /// Total vCPUs.
    #[serde(deserialize_with = "number_or_string")]
    pub total_cpu: Number,
    /// Total memory in MB.
    #[serde(deserialize_with = "number_or_string")]
    pub total_ram: Number,
    /// Total block storage in GB.
    #[serde(deserialize_with = "number_or_string")]
    pub total_cinder_storage: Number,
    /// Block storage IOPS.
    #[serde(deserialize_with = "number_or_string")]
    pub cinder_iops: Number,
    /// Total ENFS storage in GB.
    #[serde(deserialize_with = "number_or_string")]
    pub total_enfs_storage: Number,
    /// ENFS IOPS.
    #[serde(deserialize_with = "number_or_string")]
    pub total_enfs_iops: Number,
    /// CPU overcommit ratio.
    #[serde(deserialize_with = "number_or_string")]
    pub cpu_ratio: Number,
}

/// A tenant project.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MeteoProject {
    /// `OpenStack` project name, conventionally `<team>_<suffix>`.
    pub project_name: String,
    /// Cloud the project lives in.
    #[serde(deserialize_with = "string_or_number")]
    pub cloud: String,
    /// Explicit owning team, empty when unknown.
    #[serde(default)]
    pub team: Option<String>,
    /// Allocated vCPUs.
    #[serde(deserialize_with = "number_or_string")]
    pub allocated_cpu: Number,
    /// Allocated memory in MB.
    #[serde(deserialize_with = "number_or_string")]
    pub allocated_ram: Number,
    /// Allocated block storage in GB.
    #[serde(deserialize_with = "number_or_string")]
    pub allocated_storage: Number,
}

/// Body of the project list endpoint.
#[derive(Debug, Deserialize)]
pub(crate) struct ProjectList {
    pub projects: Vec<MeteoProject>,
}

/// Body of the cloud list endpoint.
#[derive(Debug, Deserialize)]
pub(crate) struct CloudList {
    pub clouds: Vec<MeteoCloud>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Number(Number),
    Text(String),
}

fn number_or_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Number, D::Error> {
    match Scalar::deserialize(deserializer)? {
        Scalar::Number(n) => Ok(n),
        Scalar::Text(s) => serde_json::from_str(s.trim())
            .map_err(|_| serde::de::Error::custom(format!("expected a number, found '{s}'"))),
    }
}

fn string_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    match Scalar::deserialize(deserializer)? {
        Scalar::Number(n) => Ok(n.to_string()),
        Scalar::Text(s) => Ok(s),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_project_accepts_numeric_strings() {
        let project: MeteoProject = serde_json::from_value(json!({
            "project_name": "web_prod",
            "cloud": 3,
            "team": "",
            "allocated_cpu": "16",
            "allocated_ram": 32768,
            "allocated_storage": " 250.5 "
        }))
        .expect("project should decode");

        assert_eq!(project.cloud, "3");
        assert_eq!(project.allocated_cpu, Number::from(16));
        assert_eq!(project.allocated_ram, Number::from(32768));
        assert_eq!(project.allocated_storage.as_f64(), Some(250.5));
        assert_eq!(project.team.as_deref(), Some(""));
    }

    #[test]
    fn test_project_team_is_optional() {
        let project: MeteoProject = serde_json::from_value(json!({
            "project_name": "web_prod",
            "cloud": "3",
            "allocated_cpu": 1,
            "allocated_ram": 1,
            "allocated_storage": 1
        }))
        .expect("project should decode");

        assert!(project.team.is_none());
    }

    #[test]
    fn test_non_numeric_string_is_rejected() {
        let result: Result<MeteoProject, _> = serde_json::from_value(json!({
            "project_name": "web_prod",
            "cloud": "3",
            "allocated_cpu": "lots",
            "allocated_ram": 1,
            "allocated_storage": 1
        }));

        assert!(result.is_err());
    }

    #[test]
    fn test_cloud_list_decodes() {
        let list: CloudList = serde_json::from_value(json!({
            "clouds": [{
                "cloud_name": "7",
                "auth_url": "http://keystone:5000/v3",
                "total_cpu": "512",
                "total_ram": "1048576",
                "total_cinder_storage": "20000",
                "cinder_iops": "10000",
                "total_enfs_storage": "5000",
                "total_enfs_iops": "2000",
                "cpu_ratio": "4.0"
            }]
        }))
        .expect("cloud list should decode");

        assert_eq!(list.clouds.len(), 1);
        assert_eq!(list.clouds[0].total_cpu, Number::from(512));
        assert_eq!(list.clouds[0].cpu_ratio.as_f64(), Some(4.0));
    }
}
