//! Validation findings.
//!
//! Every problem the engine finds is a [`ValidationIssue`]. Issues are
//! collected, never raised: a failing run still lists everything it found.

use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// How serious an issue is. Only errors fail a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// The pipeline stage that found an issue. Declaration order is report order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Structure,
    Schema,
    Partition,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Structure => write!(f, "structure"),
            Stage::Schema => write!(f, "schema"),
            Stage::Partition => write!(f, "partition"),
        }
    }
}

/// What went wrong.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "code")]
pub enum IssueKind {
    /// A directory holds both partition subdirectories and data files
    #[error("directory mixes partition subdirectories with {files} data file(s); the files were not checked")]
    MixedLeafDirectory { files: usize },

    /// A leaf directory without data files
    #[error("partition directory contains no data files")]
    EmptyPartition,

    /// Two branches use different partition keys at the same depth
    #[error("partition key '{actual}' at depth {depth} conflicts with key '{expected}' used by '{other}'")]
    PartitionKeyMismatch {
        depth: usize,
        expected: String,
        actual: String,
        other: String,
    },

    /// A `key=` or `=value` directory
    #[error("directory name '{name}' is not a valid key=value partition")]
    InvalidPartitionDirectory { name: String },

    /// A plain directory where only partition directories are expected
    #[error("directory '{name}' is not a key=value partition directory")]
    UnexpectedDirectory { name: String },

    #[error("symbolic link was not followed")]
    SymlinkNotFollowed,

    #[error("cannot list directory: {cause}")]
    UnreadableDirectory { cause: String },

    /// Corrupt, truncated, unsupported or timed-out file footer
    #[error("cannot read file metadata: {cause}")]
    UnreadableFile { cause: String },

    /// The run was interrupted before every file was read
    #[error("validation aborted; {unread} file(s) were not checked")]
    Aborted { unread: usize },

    /// A column type that neither matches nor widens to the dataset schema
    #[error("column '{column}' has type {actual}, expected {expected}")]
    IncompatibleColumnType {
        column: String,
        expected: String,
        actual: String,
    },

    /// Column set differs from the dataset schema while evolution is disabled
    #[error(
        "column set differs from the dataset schema (missing: [{}], unexpected: [{}])",
        .missing.join(", "),
        .unexpected.join(", ")
    )]
    ColumnSetMismatch {
        missing: Vec<String>,
        unexpected: Vec<String>,
    },

    /// A partition key also stored as a data column of a conflicting type
    #[error("partition key '{column}' = '{value}' conflicts with the file's data column of type {column_type}")]
    PartitionColumnShadowing {
        column: String,
        column_type: String,
        value: String,
    },

    /// Directory value disagrees with the value recorded in the file
    #[error("partition '{key}' is '{expected}' in the directory name but '{actual}' in the file")]
    PartitionValueMismatch {
        key: String,
        expected: String,
        actual: String,
    },

    /// Same key/value sequence reached through two different directories
    #[error("partition {partition} is also stored under '{other}'")]
    DuplicatePartition { partition: String, other: String },

    /// Fewer partition levels than the rest of the dataset
    #[error(
        "partition is missing levels: expected keys [{}], found [{}]",
        .expected.join("/"),
        .actual.join("/")
    )]
    IncompletePartitioning {
        expected: Vec<String>,
        actual: Vec<String>,
    },
}

impl IssueKind {
    /// The stage this kind of issue belongs to.
    pub fn stage(&self) -> Stage {
        match self {
            IssueKind::MixedLeafDirectory { .. }
            | IssueKind::EmptyPartition
            | IssueKind::PartitionKeyMismatch { .. }
            | IssueKind::InvalidPartitionDirectory { .. }
            | IssueKind::UnexpectedDirectory { .. }
            | IssueKind::SymlinkNotFollowed
            | IssueKind::UnreadableDirectory { .. }
            | IssueKind::UnreadableFile { .. }
            | IssueKind::Aborted { .. } => Stage::Structure,
            IssueKind::IncompatibleColumnType { .. }
            | IssueKind::ColumnSetMismatch { .. }
            | IssueKind::PartitionColumnShadowing { .. } => Stage::Schema,
            IssueKind::PartitionValueMismatch { .. }
            | IssueKind::DuplicatePartition { .. }
            | IssueKind::IncompletePartitioning { .. } => Stage::Partition,
        }
    }

    /// Severity before any strict-mode promotion.
    pub fn default_severity(&self) -> Severity {
        match self {
            IssueKind::EmptyPartition | IssueKind::SymlinkNotFollowed => Severity::Warning,
            _ => Severity::Error,
        }
    }

    /// Stable identifier of the kind, as used in JSON output.
    pub fn code(&self) -> &'static str {
        match self {
            IssueKind::MixedLeafDirectory { .. } => "MixedLeafDirectory",
            IssueKind::EmptyPartition => "EmptyPartition",
            IssueKind::PartitionKeyMismatch { .. } => "PartitionKeyMismatch",
            IssueKind::InvalidPartitionDirectory { .. } => "InvalidPartitionDirectory",
            IssueKind::UnexpectedDirectory { .. } => "UnexpectedDirectory",
            IssueKind::SymlinkNotFollowed => "SymlinkNotFollowed",
            IssueKind::UnreadableDirectory { .. } => "UnreadableDirectory",
            IssueKind::UnreadableFile { .. } => "UnreadableFile",
            IssueKind::Aborted { .. } => "Aborted",
            IssueKind::IncompatibleColumnType { .. } => "IncompatibleColumnType",
            IssueKind::ColumnSetMismatch { .. } => "ColumnSetMismatch",
            IssueKind::PartitionColumnShadowing { .. } => "PartitionColumnShadowing",
            IssueKind::PartitionValueMismatch { .. } => "PartitionValueMismatch",
            IssueKind::DuplicatePartition { .. } => "DuplicatePartition",
            IssueKind::IncompletePartitioning { .. } => "IncompletePartitioning",
        }
    }
}

/// A single finding, tied to a location relative to the dataset root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationIssue {
    pub severity: Severity,
    pub stage: Stage,

    /// File or directory path relative to the dataset root (`.` for the root)
    pub location: String,

    /// Human-readable description
    pub message: String,

    /// Structured details
    pub kind: IssueKind,
}

impl ValidationIssue {
    /// Creates an issue with the kind's default stage and severity.
    pub fn new(kind: IssueKind, location: impl Into<String>) -> Self {
        Self {
            severity: kind.default_severity(),
            stage: kind.stage(),
            location: location.into(),
            message: kind.to_string(),
            kind,
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} {}: {}",
            self.stage,
            self.kind.code(),
            self.location,
            self.message
        )
    }
}
