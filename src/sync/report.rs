//! Run report.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::capacity::Snapshot;

use super::command::SyncCommand;

/// Mutations applied to one kind of record.
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
pub struct ResourceCounts {
    /// Records created.
    pub created: usize,
    /// Records updated in place.
    pub updated: usize,
    /// Records deleted.
    pub deleted: usize,
    /// Source records that could not be applied.
    pub skipped: usize,
}

/// Mutations applied during a run.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct ChangeSummary {
    /// Pod mutations.
    pub pods: ResourceCounts,
    /// Team mutations.
    pub teams: ResourceCounts,
    /// Project mutations.
    pub projects: ResourceCounts,
}

/// Record counts in the start-of-run snapshot.
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
pub struct SnapshotCounts {
    /// Teams.
    pub teams: usize,
    /// Pods.
    pub pods: usize,
    /// Projects.
    pub projects: usize,
}

/// Outcome of a single sync run.
#[derive(Debug, Clone, Serialize)]
pub struct SyncReport {
    /// Unique run identifier.
    pub run_id: Uuid,
    /// Command that ran.
    pub command: SyncCommand,
    /// When the run started.
    pub started_at: DateTime<Utc>,
    /// When the run finished.
    pub finished_at: DateTime<Utc>,
    /// Target inventory size before the run.
    pub before: SnapshotCounts,
    /// Mutations applied.
    pub changes: ChangeSummary,
}

impl ResourceCounts {
    /// Total number of mutations.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.created + self.updated + self.deleted
    }
}

impl ChangeSummary {
    /// Total number of mutations across all kinds.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.pods.total() + self.teams.total() + self.projects.total()
    }

    /// Returns true if nothing was mutated.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

impl From<&Snapshot> for SnapshotCounts {
    fn from(snapshot: &Snapshot) -> Self {
        Self {
            teams: snapshot.teams.len(),
            pods: snapshot.pods.len(),
            projects: snapshot.projects.len(),
        }
    }
}

impl SyncReport {
    /// Starts a report for a run.
    #[must_use]
    pub fn start(command: SyncCommand, before: SnapshotCounts) -> Self {
        let now = Utc::now();
        Self {
            run_id: Uuid::new_v4(),
            command,
            started_at: now,
            finished_at: now,
            before,
            changes: ChangeSummary::default(),
        }
    }

    /// Stamps the finish time.
    #[must_use]
    pub fn finish(mut self) -> Self {
        self.finished_at = Utc::now();
        self
    }

    /// Wall-clock duration of the run in milliseconds.
    #[must_use]
    pub fn duration_ms(&self) -> i64 {
        (self.finished_at - self.started_at).num_milliseconds()
    }
}

impl std::fmt::Display for SyncReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Sync '{}' finished ({}):", self.command, self.run_id)?;
        for (kind, counts) in [
            ("Pods", &self.changes.pods),
            ("Teams", &self.changes.teams),
            ("Projects", &self.changes.projects),
        ] {
            writeln!(
                f,
                "  {kind}: {} created, {} updated, {} deleted, {} skipped",
                counts.created, counts.updated, counts.deleted, counts.skipped
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_totals() {
        let mut summary = ChangeSummary::default();
        assert!(summary.is_empty());

        summary.teams.created = 2;
        summary.projects.deleted = 1;
        summary.projects.skipped = 4;

        assert_eq!(summary.total(), 3);
        assert!(!summary.is_empty());
    }

    #[test]
    fn test_report_json_shape() {
        let report = SyncReport::start(SyncCommand::Update, SnapshotCounts::default()).finish();
        let value = serde_json::to_value(&report).expect("report should serialize");

        assert_eq!(value["command"], "update");
        assert_eq!(value["changes"]["teams"]["created"], 0);
        assert!(report.duration_ms() >= 0);
    }

    #[test]
    fn test_report_display() {
        let mut report = SyncReport::start(SyncCommand::Delete, SnapshotCounts::default());
        report.changes.pods.deleted = 3;

        let rendered = report.to_string();
        assert!(rendered.contains("Sync 'delete'"));
        assert!(rendered.contains("Pods: 0 created, 0 updated, 3 deleted"));
    }
}
