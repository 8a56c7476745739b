//! # Dataset Core
//!
//! Core data model for the Partitioned Dataset Validator.
//!
//! A partitioned dataset is a directory tree of `key=value` partition
//! directories whose leaves hold Parquet files. This crate holds the types
//! shared by every stage of a validation run:
//!
//! - **LogicalType / Column**: closed set of column types read from footers
//! - **CompatibilityRules**: the widening allow-list used to reconcile schemas
//! - **PartitionPath**: `key=value` segments from the root to a leaf
//! - **ValidationIssue / Report**: findings and the final verdict
//! - **ValidatorConfig**: every tunable of a run
//!
//! ## Example
//!
//! ```rust
//! use dataset_core::{CompatibilityRules, LogicalType};
//!
//! let rules = CompatibilityRules::default();
//! assert_eq!(
//!     rules.unify(&LogicalType::Int32, &LogicalType::Int64),
//!     Some(LogicalType::Int64)
//! );
//! assert_eq!(rules.unify(&LogicalType::Int32, &LogicalType::Utf8), None);
//! ```

pub mod builder;
pub mod compat;
pub mod config;
pub mod error;
pub mod issue;
pub mod partition;
pub mod report;
pub mod schema;
pub mod types;

pub use builder::*;
pub use compat::*;
pub use config::*;
pub use error::*;
pub use issue::*;
pub use partition::*;
pub use report::*;
pub use schema::*;
pub use types::*;
