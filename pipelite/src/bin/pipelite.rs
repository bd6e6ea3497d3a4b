//! Command-line entry point for the pipeline driver.

use clap::Parser;
use pipelite::{PipelineConfig, PipelineDriver};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Sequence ML pipeline stages by invoking external components.
///
/// Behavior is fully parameterized by the configuration file; individual keys
/// can be overridden on the command line, e.g.
/// `pipelite main.steps=download,basic_cleaning`.
#[derive(Debug, Parser)]
#[command(name = "pipelite", version)]
struct Cli {
    /// Path to the pipeline configuration file.
    #[arg(long, default_value = "config.yaml")]
    config: PathBuf,

    /// Configuration overrides of the form `section.key=value`.
    #[arg(value_name = "KEY=VALUE")]
    overrides: Vec<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = PipelineConfig::load(&cli.config, &cli.overrides)?;

    PipelineDriver::with_mlflow().run(config).await?;
    Ok(())
}
