use anyhow::Result;
use std::time::Duration;
use tracing::info;

use super::{load_config, run_validation};
use crate::output;

/// Flags that override the configuration file.
pub struct Options {
    pub config: Option<String>,
    pub strict: bool,
    pub schema_only: bool,
    pub workers: Option<usize>,
    pub timeout_ms: Option<u64>,
}

pub async fn execute(root: &str, options: &Options, format: &str) -> Result<()> {
    info!("Validating dataset: {}", root);

    let mut config = load_config(options.config.as_deref())?;
    if options.strict {
        config = config.with_strict(true);
    }
    if options.schema_only {
        config = config.with_schema_only(true);
    }
    if let Some(workers) = options.workers {
        config = config.with_workers(workers);
    }
    if let Some(timeout_ms) = options.timeout_ms {
        config = config.with_file_timeout(Duration::from_millis(timeout_ms));
    }

    info!("Strict mode: {}", config.strict);
    info!("Schema only: {}", config.schema_only);

    let report = run_validation(root, config).await?;

    output::print_validation_report(&report, format);

    if !report.passed() {
        std::process::exit(1);
    }

    Ok(())
}
