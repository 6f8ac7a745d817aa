//! Project matching policies.
//!
//! Routines disagree on what identifies a project: some match on name only,
//! others on name and pod. Each routine names its policy here so the
//! difference stays visible and can be changed in one place.

use crate::capacity::Project;

/// How a Capacity Planner project is matched against a source project.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectMatch {
    /// Same name, any pod.
    Name,
    /// Same name and same pod id.
    NameAndPod,
}

/// Partitioning source projects into new and existing.
pub const UPDATE_PARTITION: ProjectMatch = ProjectMatch::Name;

/// Finding the project id to PUT.
pub const PROJECT_ID_LOOKUP: ProjectMatch = ProjectMatch::NameAndPod;

/// Deciding whether a target project is still present in the source.
pub const UNUSED_PROJECT_REMOVAL: ProjectMatch = ProjectMatch::Name;

/// Deleting a single named project.
pub const SINGLE_PROJECT_DELETE: ProjectMatch = ProjectMatch::NameAndPod;

impl ProjectMatch {
    /// Returns true if `candidate` is the project identified by `name` and `pod_id`.
    ///
    /// Under [`ProjectMatch::NameAndPod`] a `None` pod id only matches a
    /// candidate without a pod.
    #[must_use]
    pub fn matches(self, candidate: &Project, name: &str, pod_id: Option<&str>) -> bool {
        match self {
            Self::Name => candidate.name == name,
            Self::NameAndPod => candidate.name == name && candidate.pod_id.as_deref() == pod_id,
        }
    }
}

impl std::fmt::Display for ProjectMatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Name => "name",
            Self::NameAndPod => "name+pod",
        };
        write!(f, "{s}")
    }
}
