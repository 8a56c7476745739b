//! Configuration loading for the Partitioned Dataset Validator.
//!
//! Parses a [`ValidatorConfig`] from YAML or TOML. Every field is optional;
//! missing fields keep their defaults.
//!
//! # Example
//!
//! ```rust
//! use dataset_config::parse_yaml;
//!
//! let yaml = r#"
//! strict: true
//! ignore_patterns:
//!   - '\.crc$'
//! compatibility:
//!   allowed: [integer_promotion, nullability]
//! "#;
//!
//! let config = parse_yaml(yaml).expect("Failed to parse config");
//! assert!(config.strict);
//! ```

use dataset_core::ValidatorConfig;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur while loading a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// YAML parsing or deserialization failed
    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml_ng::Error),

    /// TOML parsing or deserialization failed
    #[error("Failed to parse TOML: {0}")]
    TomlError(String),

    /// File I/O error
    #[error("File I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Unsupported file format
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    /// Invalid file extension
    #[error("Invalid or missing file extension")]
    InvalidExtension,

    /// Values parsed but are out of range
    #[error("Invalid configuration: {0}")]
    Invalid(#[from] dataset_core::ValidatorError),
}

/// Result type alias for configuration loading.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Supported configuration file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// YAML format (.yml, .yaml)
    Yaml,
    /// TOML format (.toml)
    Toml,
}

/// Parse a configuration from a YAML string.
pub fn parse_yaml(content: &str) -> Result<ValidatorConfig> {
    // An empty document means "all defaults".
    if content.trim().is_empty() {
        return Ok(ValidatorConfig::default());
    }
    let config: ValidatorConfig = serde_yaml_ng::from_str(content)?;
    config.validate()?;
    Ok(config)
}

/// Parse a configuration from a TOML string.
///
/// # Example
///
/// ```rust
/// use dataset_config::parse_toml;
///
/// let toml = r#"
/// workers = 2
/// data_file_extensions = ["parquet"]
///
/// [compatibility]
/// allowed = ["integer_promotion"]
/// "#;
///
/// let config = parse_toml(toml).unwrap();
/// assert_eq!(config.workers, 2);
/// ```
pub fn parse_toml(content: &str) -> Result<ValidatorConfig> {
    let config: ValidatorConfig =
        toml::from_str(content).map_err(|e| ConfigError::TomlError(e.to_string()))?;
    config.validate()?;
    Ok(config)
}

/// Detect the configuration format from a file path based on its extension.
///
/// # Errors
///
/// Returns `ConfigError::InvalidExtension` if the file has no extension.
/// Returns `ConfigError::UnsupportedFormat` if the extension is not recognized.
pub fn detect_format(path: &Path) -> Result<ConfigFormat> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .ok_or(ConfigError::InvalidExtension)?;

    match extension.to_lowercase().as_str() {
        "yaml" | "yml" => Ok(ConfigFormat::Yaml),
        "toml" => Ok(ConfigFormat::Toml),
        other => Err(ConfigError::UnsupportedFormat(other.to_string())),
    }
}

/// Parse a configuration file with automatic format detection.
///
/// # Example
///
/// ```no_run
/// use dataset_config::parse_file;
/// use std::path::Path;
///
/// let config = parse_file(Path::new("pdv.toml")).unwrap();
/// println!("Using {} workers", config.workers);
/// ```
pub fn parse_file(path: &Path) -> Result<ValidatorConfig> {
    let format = detect_format(path)?;
    let content = std::fs::read_to_string(path)?;

    match format {
        ConfigFormat::Yaml => parse_yaml(&content),
        ConfigFormat::Toml => parse_toml(&content),
    }
}

/// Serialize a configuration in the given format.
pub fn to_string(config: &ValidatorConfig, format: ConfigFormat) -> Result<String> {
    match format {
        ConfigFormat::Yaml => Ok(serde_yaml_ng::to_string(config)?),
        ConfigFormat::Toml => {
            toml::to_string_pretty(config).map_err(|e| ConfigError::TomlError(e.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dataset_core::{CompatibilityRules, Widening};
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_parse_yaml_full() {
        let yaml = r#"
strict: true
schema_only: false
allow_schema_evolution: false
workers: 3
file_timeout_ms: 1500
hidden_prefixes: ["."]
ignore_patterns: ['\.crc$', '^tmp-']
data_file_extensions: [parquet]
partition_metadata_prefix: "dataset.partition."
null_partition_value: "null"
compatibility:
  allowed: [float_promotion, decimal_widening]
"#;
        let config = parse_yaml(yaml).unwrap();
        assert!(config.strict);
        assert!(!config.allow_schema_evolution);
        assert_eq!(config.workers, 3);
        assert_eq!(config.file_timeout_ms, 1500);
        assert_eq!(config.hidden_prefixes, vec![".".to_string()]);
        assert_eq!(config.ignore_patterns.len(), 2);
        assert_eq!(config.partition_metadata_prefix, "dataset.partition.");
        assert_eq!(config.null_partition_value, "null");
        assert!(config.compatibility.allows(Widening::DecimalWidening));
        assert!(!config.compatibility.allows(Widening::IntegerPromotion));
    }

    #[test]
    fn test_parse_yaml_empty_is_default() {
        let config = parse_yaml("").unwrap();
        assert_eq!(config, ValidatorConfig::default());
    }

    #[test]
    fn test_parse_toml_partial() {
        let toml = r#"
strict = true

[compatibility]
allowed = ["nullability"]
"#;
        let config = parse_toml(toml).unwrap();
        assert!(config.strict);
        assert!(config.allow_schema_evolution);
        assert_eq!(
            config.compatibility,
            CompatibilityRules::exact().allow(Widening::Nullability)
        );
    }

    #[test]
    fn test_unknown_widening_is_rejected() {
        let result = parse_toml("[compatibility]\nallowed = [\"string_to_int\"]\n");
        assert!(matches!(result, Err(ConfigError::TomlError(_))));
    }

    #[test]
    fn test_out_of_range_values_are_rejected() {
        let result = parse_yaml("workers: 0");
        assert!(matches!(result, Err(ConfigError::Invalid(_))));

        let result = parse_toml("ignore_patterns = [\"([\"]");
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_detect_format() {
        assert_eq!(
            detect_format(Path::new("pdv.yml")).unwrap(),
            ConfigFormat::Yaml
        );
        assert_eq!(
            detect_format(Path::new("pdv.TOML")).unwrap(),
            ConfigFormat::Toml
        );
        assert!(matches!(
            detect_format(Path::new("pdv")),
            Err(ConfigError::InvalidExtension)
        ));
        assert!(matches!(
            detect_format(Path::new("pdv.json")),
            Err(ConfigError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_parse_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("pdv.toml");
        fs::write(&path, "workers = 5\n").unwrap();

        let config = parse_file(&path).unwrap();
        assert_eq!(config.workers, 5);

        let missing = dir.path().join("missing.yaml");
        assert!(matches!(parse_file(&missing), Err(ConfigError::IoError(_))));
    }

    #[test]
    fn test_round_trip_default_config() {
        let config = ValidatorConfig::default();
        for format in [ConfigFormat::Yaml, ConfigFormat::Toml] {
            let text = to_string(&config, format).unwrap();
            let parsed = match format {
                ConfigFormat::Yaml => parse_yaml(&text).unwrap(),
                ConfigFormat::Toml => parse_toml(&text).unwrap(),
            };
            assert_eq!(parsed, config);
        }
    }
}
