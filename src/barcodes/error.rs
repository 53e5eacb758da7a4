use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the analysis core. None of them are recoverable for the current run.
#[derive(Error, Debug)]
pub enum BarcodeError {
    #[error("Malformed input: {0}")]
    MalformedInput(String),

    #[error("No position has a maximum base frequency below the anchor cutoff {cutoff}")]
    AnchorNotFound { cutoff: f64 },

    #[error("Cannot select rank {cells}: only {available} distinct candidates")]
    InsufficientCandidates { cells: usize, available: usize },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Errors raised while running the pipeline end to end, I/O included.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Barcode(#[from] BarcodeError),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("FASTQ parsing error: {0}")]
    Fastq(#[from] bio::io::fastq::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Failed to build thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

impl PipelineError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        PipelineError::Io {
            path: path.into(),
            source,
        }
    }
}
