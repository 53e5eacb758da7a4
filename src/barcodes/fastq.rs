//! Loads read sequences from plain or gzip-compressed FASTQ files.

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use bio::io::fastq;
use flate2::read::MultiGzDecoder;
use tracing::{debug, info};

use crate::barcodes::constants;
use crate::barcodes::error::{BarcodeError, PipelineError};

/// Opens `path`, transparently decompressing it when it starts with the gzip magic bytes.
pub fn open_input(path: &Path) -> Result<Box<dyn Read + Send>, PipelineError> {
    let file = File::open(path).map_err(|e| PipelineError::io(path, e))?;
    let mut reader = BufReader::new(file);

    let is_gzip = reader
        .fill_buf()
        .map_err(|e| PipelineError::io(path, e))?
        .starts_with(&constants::GZIP_MAGIC);
    debug!("{} gzip compressed: {}", path.display(), is_gzip);

    if is_gzip {
        Ok(Box::new(MultiGzDecoder::new(reader)))
    } else {
        Ok(Box::new(reader))
    }
}

/// Reads the sequence of every record, stopping after `max_reads` records when given.
pub fn read_sequences(path: &Path, max_reads: Option<usize>) -> Result<Vec<String>, PipelineError> {
    info!("Reading sequences from {}", path.display());

    let reader = fastq::Reader::new(open_input(path)?);
    let mut sequences = Vec::new();

    for record in reader.records().take(max_reads.unwrap_or(usize::MAX)) {
        let record = record?;
        let sequence = std::str::from_utf8(record.seq()).map_err(|_| {
            BarcodeError::MalformedInput(format!(
                "sequence of record {} is not valid UTF-8",
                record.id()
            ))
        })?;
        sequences.push(sequence.to_string());
    }

    info!("Read {} sequences", sequences.len());
    Ok(sequences)
}
