//! Output formatting for the run report.

use colored::Colorize;
use std::fmt::Write;
use tabled::{Table, Tabled};

use crate::sync::{ResourceCounts, SyncReport};

use super::commands::OutputFormat;

/// Output formatter for CLI.
#[derive(Debug)]
pub struct OutputFormatter {
    /// Output format.
    format: OutputFormat,
}

/// Per-kind change row for table display.
#[derive(Tabled)]
struct ChangeRow {
    #[tabled(rename = "Resource")]
    resource: &'static str,
    #[tabled(rename = "Before")]
    before: usize,
    #[tabled(rename = "Created")]
    created: usize,
    #[tabled(rename = "Updated")]
    updated: usize,
    #[tabled(rename = "Deleted")]
    deleted: usize,
    #[tabled(rename = "Skipped")]
    skipped: usize,
}

impl ChangeRow {
    const fn new(resource: &'static str, before: usize, counts: &ResourceCounts) -> Self {
        Self {
            resource,
            before,
            created: counts.created,
            updated: counts.updated,
            deleted: counts.deleted,
            skipped: counts.skipped,
        }
    }
}

impl OutputFormatter {
    /// Creates a new output formatter.
    #[must_use]
    pub const fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Formats a run report for display.
    #[must_use]
    pub fn format_report(&self, report: &SyncReport) -> String {
        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(report).unwrap_or_default(),
            OutputFormat::Text => Self::format_report_text(report),
        }
    }

    fn format_report_text(report: &SyncReport) -> String {
        let mut output = String::new();

        let _ = writeln!(
            output,
            "\n{} Sync '{}' completed in {}ms",
            "✓".green(),
            report.command.to_string().bold(),
            report.duration_ms()
        );
        let _ = writeln!(output, "   Run: {}", report.run_id);
        let _ = writeln!(
            output,
            "   Started: {}\n",
            report.started_at.format("%Y-%m-%d %H:%M:%S UTC")
        );

        let changes = &report.changes;
        let rows = vec![
            ChangeRow::new("Pods", report.before.pods, &changes.pods),
            ChangeRow::new("Teams", report.before.teams, &changes.teams),
            ChangeRow::new("Projects", report.before.projects, &changes.projects),
        ];
        output.push_str(&Table::new(rows).to_string());
        output.push('\n');

        let skipped = changes.pods.skipped + changes.teams.skipped + changes.projects.skipped;
        if changes.is_empty() {
            let _ = writeln!(output, "\nNo changes applied.");
        } else {
            let _ = writeln!(
                output,
                "\n{} changes applied",
                changes.total().to_string().green()
            );
        }
        if skipped > 0 {
            let _ = writeln!(
                output,
                "{} {} source records skipped, see warnings above",
                "⚠".yellow(),
                skipped
            );
        }

        output
    }
}
