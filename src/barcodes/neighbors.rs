//! Hamming-1 neighbor graph over the barcode candidates.

use std::collections::{HashMap, HashSet};

use rayon::prelude::*;
use strum::IntoEnumIterator;

use crate::barcodes::index::CandidateIndex;
use crate::barcodes::nucleotide::Nucleotide;

/// Candidate id -> ids of the candidates one substitution away from it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NeighborMap {
    neighbors: HashMap<usize, HashSet<usize>>,
}

impl NeighborMap {
    /// Number of distinct candidates processed as a source.
    pub fn len(&self) -> usize {
        self.neighbors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.neighbors.is_empty()
    }

    pub fn neighbors(&self, id: usize) -> Option<&HashSet<usize>> {
        self.neighbors.get(&id)
    }

    pub fn degree(&self, id: usize) -> usize {
        self.neighbors.get(&id).map_or(0, HashSet::len)
    }

    /// `(id, degree)` for every source, in ascending id order.
    pub fn degrees(&self) -> Vec<(usize, usize)> {
        let mut degrees: Vec<(usize, usize)> = self
            .neighbors
            .iter()
            .map(|(&id, neighbors)| (id, neighbors.len()))
            .collect();
        degrees.sort_unstable_by_key(|&(id, _)| id);
        degrees
    }

    /// Adds every substitution variant of `candidate` found in `index` to its neighbor set.
    fn record(&mut self, index: &CandidateIndex, candidate: &[u8]) {
        let Some(source) = index.id_of(candidate) else {
            return;
        };
        let neighbors = self.neighbors.entry(source).or_default();

        let mut variant = candidate.to_vec();
        for (position, &original) in candidate.iter().enumerate() {
            for nucleotide in Nucleotide::iter() {
                let base = nucleotide.as_byte();
                if base == original {
                    continue;
                }
                variant[position] = base;
                if let Some(id) = index.id_of(&variant) {
                    neighbors.insert(id);
                }
            }
            variant[position] = original;
        }
    }

    /// Set union per key.
    fn merge(mut self, mut other: NeighborMap) -> NeighborMap {
        if self.neighbors.len() < other.neighbors.len() {
            std::mem::swap(&mut self, &mut other);
        }
        for (id, neighbors) in other.neighbors {
            self.neighbors.entry(id).or_default().extend(neighbors);
        }
        self
    }
}

/// Builds the neighbor map from every candidate occurrence.
///
/// Occurrences are split into partitions of `chunk_size`; each rayon worker fills its own
/// map and the partial maps are merged afterwards, so the result does not depend on how the
/// occurrences were partitioned.
pub fn build_neighbor_map<S>(index: &CandidateIndex, candidates: &[S], chunk_size: usize) -> NeighborMap
where
    S: AsRef<str> + Sync,
{
    candidates
        .par_chunks(chunk_size.max(1))
        .fold(NeighborMap::default, |mut map, chunk| {
            for candidate in chunk {
                map.record(index, candidate.as_ref().as_bytes());
            }
            map
        })
        .reduce(NeighborMap::default, NeighborMap::merge)
}
