//! Builder pattern for validator configurations.

use crate::{CompatibilityRules, Result, ValidatorConfig, Widening};

/// Builder for creating a [`ValidatorConfig`].
///
/// Starts from the defaults; `build` checks the result.
///
/// # Example
///
/// ```rust
/// use dataset_core::{ValidatorConfigBuilder, Widening};
///
/// let config = ValidatorConfigBuilder::new()
///     .strict(true)
///     .workers(4)
///     .ignore_pattern(r"\.crc$")
///     .allow(Widening::IntegerToFloat)
///     .build()
///     .unwrap();
///
/// assert!(config.strict);
/// assert!(config.compatibility.allows(Widening::IntegerToFloat));
/// ```
#[derive(Debug, Default)]
pub struct ValidatorConfigBuilder {
    config: ValidatorConfig,
}

impl ValidatorConfigBuilder {
    /// Creates a builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Promotes warnings to errors.
    pub fn strict(mut self, strict: bool) -> Self {
        self.config.strict = strict;
        self
    }

    /// Skips partition value checks.
    pub fn schema_only(mut self, schema_only: bool) -> Self {
        self.config.schema_only = schema_only;
        self
    }

    /// Allows or forbids schema evolution across files.
    pub fn allow_schema_evolution(mut self, allow: bool) -> Self {
        self.config.allow_schema_evolution = allow;
        self
    }

    /// Sets the number of concurrent footer reads.
    pub fn workers(mut self, workers: usize) -> Self {
        self.config.workers = workers;
        self
    }

    /// Sets the per-file timeout in milliseconds.
    pub fn file_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.config.file_timeout_ms = timeout_ms;
        self
    }

    /// Replaces the hidden prefixes.
    pub fn hidden_prefixes(mut self, prefixes: Vec<String>) -> Self {
        self.config.hidden_prefixes = prefixes;
        self
    }

    /// Adds an ignore pattern.
    pub fn ignore_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.config.ignore_patterns.push(pattern.into());
        self
    }

    /// Adds a data file extension.
    pub fn data_file_extension(mut self, extension: impl Into<String>) -> Self {
        self.config.data_file_extensions.push(extension.into());
        self
    }

    /// Sets the footer key prefix for embedded partition values.
    pub fn partition_metadata_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.config.partition_metadata_prefix = prefix.into();
        self
    }

    /// Sets the directory value that stands for null.
    pub fn null_partition_value(mut self, value: impl Into<String>) -> Self {
        self.config.null_partition_value = value.into();
        self
    }

    /// Replaces the widening allow-list.
    pub fn compatibility(mut self, rules: CompatibilityRules) -> Self {
        self.config.compatibility = rules;
        self
    }

    /// Adds one widening to the allow-list.
    pub fn allow(mut self, widening: Widening) -> Self {
        self.config.compatibility.allowed.insert(widening);
        self
    }

    /// Removes one widening from the allow-list.
    pub fn deny(mut self, widening: Widening) -> Self {
        self.config.compatibility.allowed.remove(&widening);
        self
    }

    /// Builds and validates the configuration.
    pub fn build(self) -> Result<ValidatorConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}
