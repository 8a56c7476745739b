//! # Dataset Validator
//!
//! Validation engine for partitioned Parquet datasets.
//!
//! A run goes through four stages:
//!
//! - **Walk**: list the tree under the root and group data files by their
//!   `key=value` partition directories
//! - **Read**: read each file's footer concurrently, never its data pages
//! - **Reconcile**: fold the file schemas into one dataset schema
//! - **Partition checks**: compare directory values with what the files
//!   record about themselves
//!
//! Every finding becomes a [`dataset_core::ValidationIssue`] in the final
//! [`dataset_core::Report`].
//!
//! ## Example
//!
//! ```no_run
//! use dataset_core::ValidatorConfigBuilder;
//! use dataset_validator::DatasetValidator;
//! use std::path::Path;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ValidatorConfigBuilder::new().strict(true).build()?;
//! let validator = DatasetValidator::new(config)?;
//!
//! let report = validator.validate(Path::new("/data/events")).await?;
//! println!("{}", report.to_json()?);
//! # Ok(())
//! # }
//! ```

pub mod collector;
pub mod converter;
pub mod engine;
pub mod partition;
pub mod reader;
pub mod reconciler;
pub mod walker;

pub use collector::{IssueCollector, ReportParts};
pub use converter::{arrow_field_to_column, arrow_type_to_logical};
pub use engine::{CancellationFlag, DatasetValidator};
pub use partition::PartitionValidator;
pub use reader::{
    ColumnRange, DataFile, FileMetadata, MetadataReader, ParquetMetadataReader, ReadError,
};
pub use reconciler::SchemaReconciler;
pub use walker::{FolderWalker, PartitionGroup, WalkOutcome};
