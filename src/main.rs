use clap::Parser;
use color_eyre::Result;
use env_logger::Env;
use log::info;
use std::path::PathBuf;

use nemsgen::config_loader;
use nemsgen::orchestrator::{self, WriteOptions};

/// Configuration utility for NEMS/NUOPC coupled modeling systems
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the coupled-system configuration YAML file
    #[arg(short, long)]
    config: PathBuf,

    /// Output directory for the generated descriptor files
    #[arg(short, long, default_value = "nems_output")]
    output: PathBuf,

    /// Overwrite existing descriptor files
    #[arg(long)]
    overwrite: bool,

    /// Include a generated-with version comment in each file
    #[arg(long)]
    include_version: bool,
}

fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    // Parse command-line arguments
    let args = Args::parse();

    // Initialize logging with default filter level of "info"
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    info!("Starting NEMSGen configuration generator");
    info!("Configuration file: {:?}", args.config);
    info!("Output directory: {:?}", args.output);

    let config = config_loader::load_config(&args.config)?;

    let options = WriteOptions {
        overwrite: args.overwrite,
        version: args
            .include_version
            .then(|| env!("CARGO_PKG_VERSION").to_string()),
    };

    let filenames = orchestrator::generate_configuration(&config, &args.output, &options)?;
    for filename in &filenames {
        info!("Generated {:?}", filename);
    }

    info!("Configuration generation completed successfully");
    Ok(())
}
