use anyhow::{Context, Result, anyhow};
use dataset_config::{ConfigFormat, detect_format, to_string};
use dataset_core::ValidatorConfig;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use tracing::info;

use crate::output;

pub fn execute(output_path: Option<&str>, format: Option<&str>) -> Result<()> {
    let format = match (format, output_path) {
        (Some("yaml"), _) => ConfigFormat::Yaml,
        (Some("toml"), _) => ConfigFormat::Toml,
        (Some(other), _) => return Err(anyhow!("Unsupported format: {}", other)),
        (None, Some(path)) => detect_format(Path::new(path))
            .with_context(|| format!("Cannot infer the format of {}; pass --format", path))?,
        (None, None) => ConfigFormat::Yaml,
    };
    info!("Writing default configuration as {:?}", format);

    let content = to_string(&ValidatorConfig::default(), format)
        .context("Failed to serialize the default configuration")?;

    if let Some(path) = output_path {
        let mut file = File::create(path)
            .with_context(|| format!("Failed to create output file: {}", path))?;
        file.write_all(content.as_bytes())
            .with_context(|| format!("Failed to write to file: {}", path))?;
        output::print_success(&format!("Configuration written to: {}", path));
    } else {
        print!("{}", content);
    }

    Ok(())
}
