mod config;
mod data;
mod error;
mod pipeline;

use std::path::PathBuf;

use anyhow::bail;
use clap::Parser;

use config::CleanerConfig;

/// Clean one tabular lab-data file: standardize headers, coerce column
/// types, impute missing values, drop duplicate rows, and write a workbook
/// holding the cleaned data plus a per-column metadata report.
#[derive(Parser)]
#[command(name = "tidylab", version)]
struct Cli {
    /// Raw .csv / .xlsx / .xlsm file to clean
    input: PathBuf,

    /// JSON file overriding parts of the default cleaning configuration
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write the cleaned workbook to this path instead of the configured
    /// output location (gives concurrent runs separate artifacts)
    #[arg(long)]
    output: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => CleanerConfig::from_json_file(path)?,
        None => CleanerConfig::default(),
    };
    if let Some(output) = cli.output {
        config.set_output_path(output);
    }

    if !config.is_allowed(&cli.input) {
        bail!(
            "invalid file format '{}' (allowed: {})",
            cli.input.display(),
            config.allowed_extensions.join(", ")
        );
    }

    let output = pipeline::clean_file(&cli.input, &config)?;
    println!("{}", output.display());
    Ok(())
}
