use anyhow::Result;
use tracing::info;

use super::{load_config, run_validation};
use crate::output;

pub async fn execute(root: &str, config_path: Option<&str>, format: &str) -> Result<()> {
    info!("Reading dataset schema: {}", root);

    // Partition values are irrelevant to the schema.
    let config = load_config(config_path)?.with_schema_only(true);
    let report = run_validation(root, config).await?;

    output::print_schema(&report, format);

    Ok(())
}
