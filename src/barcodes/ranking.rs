//! Ranks candidates by degree and picks the accept/reject cutoff.

use std::collections::BTreeMap;

use crate::barcodes::error::BarcodeError;
use crate::barcodes::index::CandidateIndex;
use crate::barcodes::neighbors::NeighborMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedCandidate {
    pub barcode: String,
    pub degree: usize,
    /// Reads that truncated to this barcode.
    pub reads: u64,
}

/// Candidates sorted by degree, highest first, with the degree found at the `cells` rank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ranking {
    pub threshold: usize,
    pub ranked: Vec<RankedCandidate>,
}

impl Ranking {
    pub fn accepted(&self) -> Vec<String> {
        select_accepted(&self.ranked, self.threshold)
    }

    pub fn accepted_count(&self) -> usize {
        accepted_len(&self.ranked, self.threshold)
    }
}

/// Stable sort by degree, descending; ties keep first-seen order.
pub fn rank_candidates(
    index: &CandidateIndex,
    neighbors: &NeighborMap,
    cells: usize,
) -> Result<Ranking, BarcodeError> {
    if cells == 0 {
        return Err(BarcodeError::InvalidConfig(
            "cells must be at least 1".to_string(),
        ));
    }
    if cells > neighbors.len() {
        return Err(BarcodeError::InsufficientCandidates {
            cells,
            available: neighbors.len(),
        });
    }

    let mut ranked: Vec<RankedCandidate> = neighbors
        .degrees()
        .into_iter()
        .map(|(id, degree)| RankedCandidate {
            barcode: index.candidate(id).to_string(),
            degree,
            reads: index.occurrences(id),
        })
        .collect();
    ranked.sort_by(|a, b| b.degree.cmp(&a.degree));

    let threshold = ranked[cells - 1].degree;
    Ok(Ranking { threshold, ranked })
}

fn accepted_len(ranked: &[RankedCandidate], threshold: usize) -> usize {
    ranked
        .iter()
        .position(|candidate| candidate.degree < threshold)
        .unwrap_or(ranked.len())
}

/// The head of `ranked` up to the first candidate whose degree falls below `threshold`.
pub fn select_accepted(ranked: &[RankedCandidate], threshold: usize) -> Vec<String> {
    ranked[..accepted_len(ranked, threshold)]
        .iter()
        .map(|candidate| candidate.barcode.clone())
        .collect()
}

/// `(degree, number of candidates)` in ascending degree order.
pub fn degree_histogram(ranked: &[RankedCandidate]) -> Vec<(usize, usize)> {
    let mut histogram: BTreeMap<usize, usize> = BTreeMap::new();
    for candidate in ranked {
        *histogram.entry(candidate.degree).or_insert(0) += 1;
    }
    histogram.into_iter().collect()
}
