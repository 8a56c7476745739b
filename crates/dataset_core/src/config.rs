//! Validator configuration.
//!
//! Every tunable of a run lives in [`ValidatorConfig`], which is passed in
//! explicitly. Files on disk are parsed by the `dataset_config` crate; CLI
//! flags override individual fields with the `with_*` methods.

use crate::{CompatibilityRules, DEFAULT_NULL_PARTITION_VALUE, Result, ValidatorError};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default per-file timeout in milliseconds.
pub const DEFAULT_FILE_TIMEOUT_MS: u64 = 30_000;

/// Default prefix of footer key/value entries carrying partition values.
pub const DEFAULT_PARTITION_METADATA_PREFIX: &str = "partition.";

fn default_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

/// Configuration of a validation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidatorConfig {
    /// Promote warnings to errors
    pub strict: bool,

    /// Skip partition value checks
    pub schema_only: bool,

    /// Allow files to add columns the dataset schema has not seen
    pub allow_schema_evolution: bool,

    /// Maximum number of footers read concurrently
    pub workers: usize,

    /// Timeout for one file read or directory listing
    pub file_timeout_ms: u64,

    /// Entries whose name starts with one of these are skipped
    pub hidden_prefixes: Vec<String>,

    /// Regular expressions; matching entry names are skipped
    pub ignore_patterns: Vec<String>,

    /// If non-empty, only files with these extensions are data files
    pub data_file_extensions: Vec<String>,

    /// Prefix of footer key/value entries that record partition values
    pub partition_metadata_prefix: String,

    /// Directory value that stands for a null partition
    pub null_partition_value: String,

    /// Allowed type widenings
    pub compatibility: CompatibilityRules,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            strict: false,
            schema_only: false,
            allow_schema_evolution: true,
            workers: default_workers(),
            file_timeout_ms: DEFAULT_FILE_TIMEOUT_MS,
            hidden_prefixes: vec![".".to_string(), "_".to_string()],
            ignore_patterns: Vec::new(),
            data_file_extensions: Vec::new(),
            partition_metadata_prefix: DEFAULT_PARTITION_METADATA_PREFIX.to_string(),
            null_partition_value: DEFAULT_NULL_PARTITION_VALUE.to_string(),
            compatibility: CompatibilityRules::default(),
        }
    }
}

impl ValidatorConfig {
    /// Creates a configuration with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets strict mode.
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Sets schema-only mode.
    pub fn with_schema_only(mut self, schema_only: bool) -> Self {
        self.schema_only = schema_only;
        self
    }

    /// Sets the number of concurrent footer reads.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    /// Sets the per-file timeout.
    pub fn with_file_timeout(mut self, timeout: Duration) -> Self {
        self.file_timeout_ms = timeout.as_millis() as u64;
        self
    }

    /// Sets the widening allow-list.
    pub fn with_compatibility(mut self, compatibility: CompatibilityRules) -> Self {
        self.compatibility = compatibility;
        self
    }

    pub fn file_timeout(&self) -> Duration {
        Duration::from_millis(self.file_timeout_ms)
    }

    /// Checks value ranges and compiles the ignore patterns.
    pub fn validate(&self) -> Result<()> {
        if self.workers == 0 {
            return Err(ValidatorError::configuration("workers must be at least 1"));
        }
        if self.file_timeout_ms == 0 {
            return Err(ValidatorError::configuration(
                "file_timeout_ms must be greater than 0",
            ));
        }
        if self.null_partition_value.is_empty() {
            return Err(ValidatorError::configuration(
                "null_partition_value cannot be empty",
            ));
        }
        EntryFilter::from_config(self).map(|_| ())
    }
}

/// Decides which directory entries take part in a run.
#[derive(Debug, Clone)]
pub struct EntryFilter {
    hidden_prefixes: Vec<String>,
    ignore: Vec<Regex>,
    extensions: Vec<String>,
}

impl EntryFilter {
    /// Builds the filter, compiling the configured ignore patterns.
    pub fn from_config(config: &ValidatorConfig) -> Result<Self> {
        let ignore = config
            .ignore_patterns
            .iter()
            .map(|pattern| {
                Regex::new(pattern).map_err(|source| ValidatorError::InvalidPattern {
                    pattern: pattern.clone(),
                    source,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            hidden_prefixes: config
                .hidden_prefixes
                .iter()
                .filter(|p| !p.is_empty())
                .cloned()
                .collect(),
            ignore,
            extensions: config
                .data_file_extensions
                .iter()
                .map(|e| e.trim_start_matches('.').to_ascii_lowercase())
                .collect(),
        })
    }

    /// Returns true for hidden or ignored entries of any kind.
    pub fn is_skipped(&self, name: &str) -> bool {
        self.hidden_prefixes.iter().any(|p| name.starts_with(p.as_str()))
            || self.ignore.iter().any(|re| re.is_match(name))
    }

    /// Returns true if a regular file with this name is a data file.
    pub fn is_data_file(&self, name: &str) -> bool {
        if self.extensions.is_empty() {
            return true;
        }
        match name.rsplit_once('.') {
            Some((_, ext)) => self.extensions.contains(&ext.to_ascii_lowercase()),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let config = ValidatorConfig::default();
        assert!(!config.strict);
        assert!(config.allow_schema_evolution);
        assert!(config.workers >= 1);
        assert_eq!(config.file_timeout(), Duration::from_secs(30));
        assert_eq!(config.partition_metadata_prefix, "partition.");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_values() {
        assert!(ValidatorConfig::new().with_workers(0).validate().is_err());

        let mut config = ValidatorConfig::new();
        config.ignore_patterns.push("([".to_string());
        assert!(matches!(
            config.validate(),
            Err(ValidatorError::InvalidPattern { .. })
        ));
    }

    #[test]
    fn test_entry_filter() {
        let mut config = ValidatorConfig::new();
        config.ignore_patterns.push(r"\.crc$".to_string());
        let filter = EntryFilter::from_config(&config).unwrap();

        assert!(filter.is_skipped("_SUCCESS"));
        assert!(filter.is_skipped(".hidden"));
        assert!(filter.is_skipped("part-0.parquet.crc"));
        assert!(!filter.is_skipped("part-0.parquet"));
        assert!(filter.is_data_file("README"));
    }

    #[test]
    fn test_extension_filter() {
        let mut config = ValidatorConfig::new();
        config.data_file_extensions = vec![".Parquet".to_string()];
        let filter = EntryFilter::from_config(&config).unwrap();

        assert!(filter.is_data_file("a.parquet"));
        assert!(filter.is_data_file("a.PARQUET"));
        assert!(!filter.is_data_file("a.json"));
        assert!(!filter.is_data_file("README"));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: ValidatorConfig = serde_json::from_str(r#"{"strict": true}"#).unwrap();
        assert!(config.strict);
        assert_eq!(config.hidden_prefixes, vec![".", "_"]);
        assert_eq!(config.compatibility, CompatibilityRules::default());
    }
}
