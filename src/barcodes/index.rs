//! Exact-membership index over the distinct barcode candidates.

use std::collections::HashMap;

/// Static index of distinct candidates. Ids follow first-seen order, so iterating ids in
/// ascending order replays the order candidates were encountered in the reads.
///
/// Immutable once built and shared read-only by the neighbor graph workers.
#[derive(Debug, Clone, Default)]
pub struct CandidateIndex {
    ids: HashMap<Box<[u8]>, usize>,
    candidates: Vec<String>,
    occurrences: Vec<u64>,
}

impl CandidateIndex {
    pub fn build<S: AsRef<str>>(candidates: &[S]) -> Self {
        let mut index = CandidateIndex::default();
        for candidate in candidates {
            let candidate = candidate.as_ref();
            match index.ids.get(candidate.as_bytes()) {
                Some(&id) => index.occurrences[id] += 1,
                None => {
                    let id = index.candidates.len();
                    index.ids.insert(candidate.as_bytes().into(), id);
                    index.candidates.push(candidate.to_string());
                    index.occurrences.push(1);
                }
            }
        }
        index
    }

    pub fn contains(&self, candidate: &[u8]) -> bool {
        self.ids.contains_key(candidate)
    }

    pub fn id_of(&self, candidate: &[u8]) -> Option<usize> {
        self.ids.get(candidate).copied()
    }

    pub fn candidate(&self, id: usize) -> &str {
        &self.candidates[id]
    }

    /// Number of reads that truncated to this candidate.
    pub fn occurrences(&self, id: usize) -> u64 {
        self.occurrences[id]
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}
