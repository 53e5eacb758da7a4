//! Per-position base composition across a set of equal-length reads.

use rayon::prelude::*;
use strum::IntoEnumIterator;

use crate::barcodes::error::BarcodeError;
use crate::barcodes::nucleotide::Nucleotide;

type BaseCounts = [u64; Nucleotide::COUNT];

/// Counts of each base at each read position.
#[derive(Debug, Clone, PartialEq)]
pub struct BaseFrequencyTable {
    read_count: usize,
    counts: Vec<BaseCounts>,
}

impl BaseFrequencyTable {
    pub fn read_count(&self) -> usize {
        self.read_count
    }

    pub fn read_len(&self) -> usize {
        self.counts.len()
    }

    pub fn frequency(&self, position: usize, nucleotide: Nucleotide) -> f64 {
        self.counts[position][nucleotide.index()] as f64 / self.read_count as f64
    }

    /// Frequencies at `position` in alphabetic base order. They sum to 1.
    pub fn frequencies(&self, position: usize) -> [f64; Nucleotide::COUNT] {
        let mut frequencies = [0.0; Nucleotide::COUNT];
        for nucleotide in Nucleotide::iter() {
            frequencies[nucleotide.index()] = self.frequency(position, nucleotide);
        }
        frequencies
    }

    pub fn max_frequency(&self, position: usize) -> f64 {
        let max_count = self.counts[position].iter().copied().max().unwrap_or(0);
        max_count as f64 / self.read_count as f64
    }

    pub fn max_frequencies(&self) -> Vec<f64> {
        (0..self.read_len()).map(|p| self.max_frequency(p)).collect()
    }
}

/// Rejects a read whose length differs from `read_len` or that holds a symbol outside ACGT.
pub(crate) fn check_read(index: usize, read: &[u8], read_len: usize) -> Result<(), BarcodeError> {
    check_length(index, read, read_len)?;
    if let Some(position) = read.iter().position(|&b| Nucleotide::from_byte(b).is_none()) {
        return Err(invalid_base(index, position, read[position]));
    }
    Ok(())
}

fn check_length(index: usize, read: &[u8], read_len: usize) -> Result<(), BarcodeError> {
    if read.len() != read_len {
        return Err(BarcodeError::MalformedInput(format!(
            "read {} has length {}, expected {}",
            index,
            read.len(),
            read_len
        )));
    }
    Ok(())
}

fn invalid_base(index: usize, position: usize, byte: u8) -> BarcodeError {
    BarcodeError::MalformedInput(format!(
        "read {} has invalid base '{}' at position {}",
        index,
        byte.escape_ascii(),
        position
    ))
}

/// Builds the frequency table, failing on the first malformed read.
pub fn base_frequencies<S>(reads: &[S]) -> Result<BaseFrequencyTable, BarcodeError>
where
    S: AsRef<str> + Sync,
{
    let first = reads
        .first()
        .ok_or_else(|| BarcodeError::MalformedInput("no reads to analyse".to_string()))?;
    let read_len = first.as_ref().len();

    let counts = reads
        .par_iter()
        .enumerate()
        .try_fold(
            || vec![[0u64; Nucleotide::COUNT]; read_len],
            |mut counts, (index, read)| {
                let read = read.as_ref().as_bytes();
                check_length(index, read, read_len)?;
                for (position, &byte) in read.iter().enumerate() {
                    let nucleotide = Nucleotide::from_byte(byte)
                        .ok_or_else(|| invalid_base(index, position, byte))?;
                    counts[position][nucleotide.index()] += 1;
                }
                Ok::<_, BarcodeError>(counts)
            },
        )
        .try_reduce(
            || vec![[0u64; Nucleotide::COUNT]; read_len],
            |mut left, right| {
                for (l, r) in left.iter_mut().zip(right) {
                    for (a, b) in l.iter_mut().zip(r) {
                        *a += b;
                    }
                }
                Ok(left)
            },
        )?;

    Ok(BaseFrequencyTable {
        read_count: reads.len(),
        counts,
    })
}
