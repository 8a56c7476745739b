mod commands;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "pdv")]
#[command(version, about = "Partitioned Dataset Validator CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a partitioned dataset
    Validate {
        /// Dataset root directory
        root: String,

        /// Configuration file (YAML or TOML)
        #[arg(short, long)]
        config: Option<String>,

        /// Enable strict validation mode (fail on warnings)
        #[arg(short, long)]
        strict: bool,

        /// Check schemas only, skip partition value checks
        #[arg(long)]
        schema_only: bool,

        /// Number of concurrent footer reads
        #[arg(short, long)]
        workers: Option<usize>,

        /// Per-file timeout in milliseconds
        #[arg(long)]
        timeout_ms: Option<u64>,

        /// Output format: text, json
        #[arg(short, long, default_value = "text", value_parser = ["text", "json"])]
        format: String,
    },

    /// Print the reconciled schema and partition keys of a dataset
    Schema {
        /// Dataset root directory
        root: String,

        /// Configuration file (YAML or TOML)
        #[arg(short, long)]
        config: Option<String>,

        /// Output format: text, json
        #[arg(short, long, default_value = "text", value_parser = ["text", "json"])]
        format: String,
    },

    /// Write the default configuration
    Init {
        /// Output file path (defaults to stdout)
        #[arg(short, long)]
        output: Option<String>,

        /// Configuration format: yaml, toml (defaults to the output extension)
        #[arg(short, long, value_parser = ["yaml", "toml"])]
        format: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // Logs go to stderr so that JSON reports on stdout stay parseable.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_level(true)
                .compact(),
        )
        .with(filter)
        .init();

    match cli.command {
        Commands::Validate {
            root,
            config,
            strict,
            schema_only,
            workers,
            timeout_ms,
            format,
        } => {
            let options = commands::validate::Options {
                config,
                strict,
                schema_only,
                workers,
                timeout_ms,
            };
            commands::validate::execute(&root, &options, &format).await
        }

        Commands::Schema {
            root,
            config,
            format,
        } => commands::schema::execute(&root, config.as_deref(), &format).await,

        Commands::Init { output, format } => {
            commands::init::execute(output.as_deref(), format.as_deref())
        }
    }
}
