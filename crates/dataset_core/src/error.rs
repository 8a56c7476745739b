//! Fatal errors.
//!
//! Only problems that make a meaningful traversal impossible are errors in
//! the `Result` sense. Everything else is a [`crate::ValidationIssue`].

use std::path::PathBuf;
use thiserror::Error;

/// Result type for validator operations.
pub type Result<T> = std::result::Result<T, ValidatorError>;

/// Errors that abort a run before a report exists.
#[derive(Error, Debug)]
pub enum ValidatorError {
    /// Dataset root does not exist
    #[error("Dataset root not found: {}", .0.display())]
    RootNotFound(PathBuf),

    /// Dataset root exists but is not a directory
    #[error("Dataset root is not a directory: {}", .0.display())]
    RootNotADirectory(PathBuf),

    /// I/O failure on the dataset root itself
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        /// Path being accessed
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },

    /// An ignore pattern is not a valid regular expression
    #[error("Invalid ignore pattern '{pattern}': {source}")]
    InvalidPattern {
        /// The offending pattern
        pattern: String,
        /// Regex compilation error
        source: regex::Error,
    },

    /// Configuration values are out of range
    #[error("Invalid configuration: {0}")]
    Configuration(String),
}

impl ValidatorError {
    /// Creates an I/O error for `path`.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Creates a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }
}
