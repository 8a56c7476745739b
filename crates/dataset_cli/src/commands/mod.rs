pub mod init;
pub mod schema;
pub mod validate;

use anyhow::{Context, Result};
use dataset_config::parse_file;
use dataset_core::{Report, ValidatorConfig};
use dataset_validator::DatasetValidator;
use std::path::Path;
use tracing::{info, warn};

/// Loads the configuration file, or the defaults when none is given.
pub fn load_config(config_path: Option<&str>) -> Result<ValidatorConfig> {
    match config_path {
        Some(path) => {
            info!("Loading configuration: {}", path);
            parse_file(Path::new(path))
                .with_context(|| format!("Failed to load configuration file: {}", path))
        }
        None => Ok(ValidatorConfig::default()),
    }
}

/// Validates `root`, stopping early after the current file on Ctrl-C.
pub async fn run_validation(root: &str, config: ValidatorConfig) -> Result<Report> {
    let validator = DatasetValidator::new(config).context("Invalid configuration")?;

    let flag = validator.cancellation_flag();
    let interrupt = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, finishing the files in flight");
            flag.cancel();
        }
    });

    let result = validator.validate(Path::new(root)).await;
    interrupt.abort();

    Ok(result?)
}
