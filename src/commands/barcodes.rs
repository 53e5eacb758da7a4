use clap::{Parser, Subcommand};
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File};
use dotenvy::dotenv;
use rayon::ThreadPoolBuilder;
use std::path::PathBuf;
use tracing::info;

use crate::barcodes::constants;
use crate::barcodes::{self, BarcodeConfig, PipelineError};

///////////////////////////////////////////////////////////////////////////////

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    #[command(name = "find")]
    Find(FindCommand),
}

#[derive(Parser, Debug, Clone)]
pub struct FindCommand {
    // Input FASTQ file, plain or gzip compressed
    #[arg()]
    pub input: PathBuf,

    // Output directory
    #[arg(long, short, default_value = "./output")]
    pub output_dir: PathBuf,

    // Optional settings file
    #[arg(long, short)]
    pub config: Option<PathBuf>,

    // Anchor detection
    #[arg(long, short = 'a')]
    pub anchor_cutoff: Option<f64>,
    #[arg(long)]
    pub anchor_sample_size: Option<usize>,

    // Expected number of true barcodes
    #[arg(long, short = 'n')]
    pub cells: Option<usize>,

    // Work partitioning
    #[arg(long)]
    pub chunk_size: Option<usize>,
    #[arg(long)]
    pub max_reads: Option<usize>,
    #[arg(long, short)]
    pub threads: Option<usize>,
}

///////////////////////////////////////////////////////////////////////////////

/// Layers defaults, the optional settings file, `BARCODES_*` environment variables and the
/// command line flags, in increasing priority.
pub fn load_settings(cmd: &FindCommand) -> Result<Config, PipelineError> {
    dotenv().ok();

    let mut builder = ConfigBuilder::<DefaultState>::default()
        .set_default("anchor_cutoff", constants::DEFAULT_ANCHOR_CUTOFF)?
        .set_default("cells", constants::DEFAULT_CELLS as i64)?
        .set_default("chunk_size", constants::DEFAULT_CHUNK_SIZE as i64)?;

    if let Some(path) = &cmd.config {
        builder = builder.add_source(File::from(path.as_path()));
    }

    let settings = builder
        .add_source(Environment::with_prefix("BARCODES"))
        .set_override_option("anchor_cutoff", cmd.anchor_cutoff)?
        .set_override_option("anchor_sample_size", cmd.anchor_sample_size.map(|v| v as i64))?
        .set_override_option("cells", cmd.cells.map(|v| v as i64))?
        .set_override_option("chunk_size", cmd.chunk_size.map(|v| v as i64))?
        .set_override_option("max_reads", cmd.max_reads.map(|v| v as i64))?
        .set_override_option("threads", cmd.threads.map(|v| v as i64))?
        .build()?;

    Ok(settings)
}

pub fn command(cmds: Commands) -> Result<(), PipelineError> {
    match cmds {
        Commands::Find(cmd) => {
            tracing_subscriber::fmt()
                .compact()
                .with_max_level(tracing::Level::INFO)
                .init();

            let settings = load_settings(&cmd)?;
            let config = BarcodeConfig::from_settings(&settings)?;
            info!("{:?}", config);

            if let Some(threads) = config.threads {
                ThreadPoolBuilder::new()
                    .num_threads(threads)
                    .build_global()?;
            }

            let report = barcodes::run(&cmd.input, &cmd.output_dir, &config)?;
            info!(
                "{} of {} distinct candidates accepted as barcodes",
                report.accepted.len(),
                report.distinct_candidates
            );
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn find_command(args: &[&str]) -> FindCommand {
        let mut argv = vec!["find", "reads.fastq"];
        argv.extend_from_slice(args);
        FindCommand::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_defaults_without_flags() {
        let settings = load_settings(&find_command(&[])).unwrap();
        let config = BarcodeConfig::from_settings(&settings).unwrap();

        assert_eq!(config.anchor.cutoff, constants::DEFAULT_ANCHOR_CUTOFF);
        assert_eq!(config.cells, constants::DEFAULT_CELLS);
        assert_eq!(config.chunk_size, constants::DEFAULT_CHUNK_SIZE);
        assert_eq!(config.max_reads, None);
    }

    #[test]
    fn test_flags_override_settings_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        std::fs::write(&path, "cells = 42\nanchor_cutoff = 0.6\nanchor_sample_size = 100\n").unwrap();

        let cmd = find_command(&["--config", path.to_str().unwrap(), "--anchor-cutoff", "0.9"]);
        let config = BarcodeConfig::from_settings(&load_settings(&cmd).unwrap()).unwrap();

        assert_eq!(config.cells, 42);
        assert_eq!(config.anchor.cutoff, 0.9);
        assert_eq!(config.anchor.sample_size, Some(100));
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let cmd = find_command(&["--anchor-cutoff", "1.5"]);
        let settings = load_settings(&cmd).unwrap();
        assert!(matches!(
            BarcodeConfig::from_settings(&settings),
            Err(PipelineError::Barcode(barcodes::BarcodeError::InvalidConfig(_)))
        ));
    }
}
