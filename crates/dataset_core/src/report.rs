//! Validation reports.

use crate::{LogicalSchema, Severity, Stage, ValidationIssue};
use serde::Serialize;

/// Overall outcome of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Pass,
    Fail,
}

/// Counters describing what a run looked at.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReportStats {
    /// Directories listed, including the root
    pub directories_scanned: usize,

    /// Leaf directories (partitions), including empty ones
    pub partitions: usize,

    /// Data files found by the walk
    pub files_discovered: usize,

    /// Data files whose metadata was read successfully
    pub files_read: usize,

    /// Columns in the reconciled schema
    pub columns: usize,
}

/// Final result of validating one dataset.
///
/// Holds no timestamps or durations: validating an unchanged tree twice
/// produces equal reports.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    /// Dataset root as given by the caller
    pub root: String,

    /// Pass iff no issue has severity error
    pub verdict: Verdict,

    /// Whether the run was interrupted before every file was read
    pub aborted: bool,

    /// Partition keys, outermost first, as found on the deepest branch
    pub partition_keys: Vec<String>,

    /// Reconciled schema of every readable file
    pub schema: LogicalSchema,

    pub stats: ReportStats,

    /// Issues ordered by stage, then by discovery order
    pub issues: Vec<ValidationIssue>,
}

impl Report {
    pub fn passed(&self) -> bool {
        self.verdict == Verdict::Pass
    }

    /// Issues with severity error.
    pub fn errors(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.issues.iter().filter(|i| i.severity == Severity::Error)
    }

    /// Issues with severity warning.
    pub fn warnings(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.issues.iter().filter(|i| i.severity == Severity::Warning)
    }

    pub fn error_count(&self) -> usize {
        self.errors().count()
    }

    pub fn warning_count(&self) -> usize {
        self.warnings().count()
    }

    /// Issues found by one stage.
    pub fn issues_in(&self, stage: Stage) -> impl Iterator<Item = &ValidationIssue> {
        self.issues.iter().filter(move |i| i.stage == stage)
    }

    /// Issues with the given kind code, e.g. `"EmptyPartition"`.
    pub fn issues_with_code<'a>(
        &'a self,
        code: &'a str,
    ) -> impl Iterator<Item = &'a ValidationIssue> + 'a {
        self.issues.iter().filter(move |i| i.kind.code() == code)
    }

    /// Pretty JSON rendering of the report.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
