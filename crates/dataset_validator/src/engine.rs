//! Main validation engine.
//!
//! [`DatasetValidator`] runs the stages of a validation in order: walk the
//! directory tree, read every data file's footer, reconcile the schemas,
//! then check partition values. Problems found along the way are collected
//! into the final [`Report`]; only a missing or unusable root is an error.

use crate::collector::{IssueCollector, ReportParts, location};
use crate::partition::{PartitionValidator, deepest_keys};
use crate::reader::{DataFile, FileMetadata, MetadataReader, ParquetMetadataReader, ReadError};
use crate::reconciler::SchemaReconciler;
use crate::walker::{FolderWalker, PartitionGroup};
use dataset_core::{
    EntryFilter, IssueKind, Report, ReportStats, Result, ValidatorConfig, ValidatorError,
};
use futures::StreamExt;
use futures::stream;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Shared flag that asks a running validation to stop.
///
/// The engine checks it after each file read; files already in flight
/// finish, nothing new is scheduled.
#[derive(Debug, Clone, Default)]
pub struct CancellationFlag(Arc<AtomicBool>);

impl CancellationFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

struct ReadOutcome {
    files: Vec<DataFile>,
    discovered: usize,
    aborted: bool,
}

/// Validation engine for partitioned datasets.
///
/// # Example
///
/// ```no_run
/// use dataset_core::ValidatorConfig;
/// use dataset_validator::DatasetValidator;
/// use std::path::Path;
///
/// # async fn run() -> dataset_core::Result<()> {
/// let validator = DatasetValidator::new(ValidatorConfig::default())?;
/// let report = validator.validate(Path::new("/data/events")).await?;
///
/// if report.passed() {
///     println!("Dataset is valid");
/// } else {
///     for issue in report.errors() {
///         println!("{}", issue);
///     }
/// }
/// # Ok(())
/// # }
/// ```
pub struct DatasetValidator {
    config: ValidatorConfig,
    reader: Arc<dyn MetadataReader>,
    cancel: CancellationFlag,
}

impl DatasetValidator {
    /// Creates a validator that reads Parquet footers.
    pub fn new(config: ValidatorConfig) -> Result<Self> {
        let reader = Arc::new(ParquetMetadataReader::from_config(&config));
        Self::with_reader(config, reader)
    }

    /// Creates a validator with a custom metadata reader.
    pub fn with_reader(config: ValidatorConfig, reader: Arc<dyn MetadataReader>) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            reader,
            cancel: CancellationFlag::new(),
        })
    }

    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    /// Returns a handle that cancels this validator's runs.
    pub fn cancellation_flag(&self) -> CancellationFlag {
        self.cancel.clone()
    }

    /// Validates the dataset under `root`.
    ///
    /// Returns `Err` only if the root is missing or not a directory.
    /// Everything else is reported as issues in the returned report.
    pub async fn validate(&self, root: &Path) -> Result<Report> {
        let start = Instant::now();
        info!("Validating dataset at {}", root.display());

        check_root(root).await?;
        let filter = EntryFilter::from_config(&self.config)?;

        let mut issues = IssueCollector::new();
        let walker = FolderWalker::new(filter, self.config.file_timeout());
        let walk = walker.walk(root, &mut issues).await;
        info!(
            directories = walk.directories_scanned,
            partitions = walk.groups.len(),
            files = walk.file_count(),
            "Directory walk complete"
        );

        let read = self.read_files(root, &walk.groups, &mut issues).await;
        info!(
            read = read.files.len(),
            discovered = read.discovered,
            "Metadata read complete"
        );

        let (schema, schema_issues) = SchemaReconciler::from_config(&self.config).reconcile(&read.files);
        debug!("Reconciled schema has {} column(s)", schema.len());
        issues.extend(schema_issues);

        if self.config.schema_only {
            debug!("Schema-only mode, skipping partition checks");
        } else {
            let validator = PartitionValidator::from_config(&self.config);
            issues.extend(validator.validate(&walk.groups, &read.files));
        }

        if read.aborted {
            let unread = read.discovered - read.files.len();
            warn!("Validation aborted with {} file(s) unchecked", unread);
            issues.push(IssueKind::Aborted { unread }, ".");
        }

        let stats = ReportStats {
            directories_scanned: walk.directories_scanned,
            partitions: walk.groups.len(),
            files_discovered: read.discovered,
            files_read: read.files.len(),
            columns: schema.len(),
        };
        let parts = ReportParts {
            root: root.display().to_string(),
            aborted: read.aborted,
            partition_keys: deepest_keys(&walk.groups),
            schema,
            stats,
        };
        let report = issues.finalize(parts, self.config.strict);

        info!(
            verdict = ?report.verdict,
            errors = report.error_count(),
            warnings = report.warning_count(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Validation finished"
        );
        Ok(report)
    }

    /// Reads every discovered file with at most `workers` reads in flight.
    ///
    /// Results arrive in discovery order regardless of completion order.
    async fn read_files(
        &self,
        root: &Path,
        groups: &[PartitionGroup],
        issues: &mut IssueCollector,
    ) -> ReadOutcome {
        let jobs: Vec<(usize, PathBuf)> = groups
            .iter()
            .enumerate()
            .flat_map(|(index, group)| group.files.iter().map(move |file| (index, file.clone())))
            .collect();
        let discovered = jobs.len();
        let timeout = self.config.file_timeout();

        let mut results = stream::iter(jobs.into_iter().map(|(index, relative)| {
            let reader = Arc::clone(&self.reader);
            let path = root.join(&relative);
            async move {
                let result = read_with_timeout(reader, path, timeout).await;
                (index, relative, result)
            }
        }))
        .buffered(self.config.workers);

        let mut files = Vec::with_capacity(discovered);
        let mut processed = 0;
        let mut aborted = false;

        while let Some((index, relative, result)) = results.next().await {
            processed += 1;
            let file_location = location(&relative);
            match result {
                Ok(metadata) => {
                    debug!("Read {} ({} rows)", file_location, metadata.num_rows);
                    files.push(DataFile {
                        location: file_location,
                        partition: groups[index].path.clone(),
                        group: index,
                        metadata,
                    });
                }
                Err(err) => {
                    warn!("Cannot read {}: {}", file_location, err);
                    issues.push(
                        IssueKind::UnreadableFile {
                            cause: err.to_string(),
                        },
                        file_location,
                    );
                }
            }

            if processed < discovered && self.cancel.is_cancelled() {
                aborted = true;
                break;
            }
        }

        ReadOutcome {
            files,
            discovered,
            aborted,
        }
    }
}

async fn check_root(root: &Path) -> Result<()> {
    match tokio::fs::metadata(root).await {
        Ok(metadata) if metadata.is_dir() => Ok(()),
        Ok(_) => Err(ValidatorError::RootNotADirectory(root.to_path_buf())),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            Err(ValidatorError::RootNotFound(root.to_path_buf()))
        }
        Err(e) => Err(ValidatorError::io(root, e)),
    }
}

async fn read_with_timeout(
    reader: Arc<dyn MetadataReader>,
    path: PathBuf,
    timeout: Duration,
) -> std::result::Result<FileMetadata, ReadError> {
    let task = tokio::task::spawn_blocking(move || reader.read_metadata(&path));
    match tokio::time::timeout(timeout, task).await {
        Ok(Ok(result)) => result,
        Ok(Err(join)) => Err(ReadError::Join(join.to_string())),
        Err(_) => Err(ReadError::Timeout(timeout)),
    }
}
