//! Locates the boundary between the variable barcode and the conserved anchor.

use rayon::prelude::*;
use tracing::debug;

use crate::barcodes::config::AnchorConfig;
use crate::barcodes::error::BarcodeError;
use crate::barcodes::frequency::{base_frequencies, check_read, BaseFrequencyTable};

/// Result of anchor detection over a read set.
#[derive(Debug, Clone)]
pub struct AnchorDetection {
    pub frequencies: BaseFrequencyTable,
    /// First position of the anchor; candidates are reads truncated to `[0, anchor_start)`.
    pub anchor_start: usize,
    pub candidates: Vec<String>,
}

/// Returns one past the rightmost position whose maximum base frequency is below `cutoff`.
pub fn find_anchor_start(table: &BaseFrequencyTable, cutoff: f64) -> Result<usize, BarcodeError> {
    table
        .max_frequencies()
        .iter()
        .rposition(|&max_frequency| max_frequency < cutoff)
        .map(|position| position + 1)
        .ok_or(BarcodeError::AnchorNotFound { cutoff })
}

/// Cuts every read down to its barcode, validating each one against `read_len`.
pub fn truncate_reads<S>(
    reads: &[S],
    read_len: usize,
    anchor_start: usize,
) -> Result<Vec<String>, BarcodeError>
where
    S: AsRef<str> + Sync,
{
    reads
        .par_iter()
        .enumerate()
        .map(|(index, read)| -> Result<String, BarcodeError> {
            let read = read.as_ref();
            check_read(index, read.as_bytes(), read_len)?;
            Ok(read[..anchor_start].to_string())
        })
        .collect()
}

pub fn detect_anchor<S>(reads: &[S], config: &AnchorConfig) -> Result<AnchorDetection, BarcodeError>
where
    S: AsRef<str> + Sync,
{
    config.validate()?;

    let sample = match config.sample_size {
        Some(size) => &reads[..size.min(reads.len())],
        None => reads,
    };
    let frequencies = base_frequencies(sample)?;
    let anchor_start = find_anchor_start(&frequencies, config.cutoff)?;
    debug!(
        "Anchor starts at {} of {} (from {} reads)",
        anchor_start,
        frequencies.read_len(),
        frequencies.read_count()
    );

    let candidates = truncate_reads(reads, frequencies.read_len(), anchor_start)?;

    Ok(AnchorDetection {
        frequencies,
        anchor_start,
        candidates,
    })
}
