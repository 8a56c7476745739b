//! Issue accumulation and report assembly.

use dataset_core::{
    IssueKind, LogicalSchema, Report, ReportStats, Severity, ValidationIssue, Verdict,
};
use std::path::Path;

/// Renders a root-relative path as an issue location.
///
/// The root itself is `.`; separators are always `/`.
pub fn location(relative: &Path) -> String {
    if relative.as_os_str().is_empty() {
        return ".".to_string();
    }
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Everything but the issues that goes into a [`Report`].
#[derive(Debug, Clone, Default)]
pub struct ReportParts {
    pub root: String,
    pub aborted: bool,
    pub partition_keys: Vec<String>,
    pub schema: LogicalSchema,
    pub stats: ReportStats,
}

/// Collects issues from every stage of a run, in discovery order.
#[derive(Debug, Default)]
pub struct IssueCollector {
    issues: Vec<ValidationIssue>,
}

impl IssueCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an issue of `kind` at `location`.
    pub fn push(&mut self, kind: IssueKind, location: impl Into<String>) {
        self.issues.push(ValidationIssue::new(kind, location));
    }

    pub fn extend(&mut self, issues: impl IntoIterator<Item = ValidationIssue>) {
        self.issues.extend(issues);
    }

    pub fn issues(&self) -> &[ValidationIssue] {
        &self.issues
    }

    pub fn len(&self) -> usize {
        self.issues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn has_errors(&self) -> bool {
        self.issues.iter().any(|i| i.is_error())
    }

    /// Orders the issues by stage and decides the verdict.
    ///
    /// The sort is stable, so discovery order holds within a stage. In
    /// strict mode every warning becomes an error.
    pub fn finalize(self, parts: ReportParts, strict: bool) -> Report {
        let mut issues = self.issues;

        if strict {
            for issue in issues.iter_mut() {
                issue.severity = Severity::Error;
            }
        }

        issues.sort_by_key(|issue| issue.stage);

        let verdict = if issues.iter().any(|i| i.is_error()) {
            Verdict::Fail
        } else {
            Verdict::Pass
        };

        Report {
            root: parts.root,
            verdict,
            aborted: parts.aborted,
            partition_keys: parts.partition_keys,
            schema: parts.schema,
            stats: parts.stats,
            issues,
        }
    }
}
