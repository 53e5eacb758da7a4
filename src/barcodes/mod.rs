//! Barcode discovery from fixed-length reads.
//!
//! Reads are split into a variable barcode and a conserved anchor by looking at per-position
//! base frequencies. Every barcode candidate is then linked to the candidates one substitution
//! away from it; true barcodes collect many such error variants, so ranking candidates by that
//! degree and cutting at the expected number of cells separates them from noise.

pub mod anchor;
pub mod config;
pub mod constants;
pub mod error;
pub mod fastq;
pub mod frequency;
pub mod index;
pub mod neighbors;
pub mod nucleotide;
pub mod output;
pub mod ranking;

use std::path::Path;

use tracing::info;

pub use anchor::{detect_anchor, AnchorDetection};
pub use config::{AnchorConfig, BarcodeConfig};
pub use error::{BarcodeError, PipelineError};
pub use frequency::BaseFrequencyTable;
pub use index::CandidateIndex;
pub use neighbors::{build_neighbor_map, NeighborMap};
pub use ranking::{rank_candidates, select_accepted, RankedCandidate, Ranking};

/// Everything one analysis run produces.
#[derive(Debug, Clone)]
pub struct BarcodeReport {
    pub total_reads: usize,
    pub anchor_cutoff: f64,
    pub cells: usize,
    pub frequencies: BaseFrequencyTable,
    pub anchor_start: usize,
    pub distinct_candidates: usize,
    pub ranking: Ranking,
    pub accepted: Vec<String>,
}

/// Indexes the truncated reads, builds their neighbor graph and ranks it.
pub fn build_neighbor_degrees<S>(truncated_reads: &[S], cells: usize) -> Result<Ranking, BarcodeError>
where
    S: AsRef<str> + Sync,
{
    let index = CandidateIndex::build(truncated_reads);
    let neighbors = build_neighbor_map(&index, truncated_reads, constants::DEFAULT_CHUNK_SIZE);
    rank_candidates(&index, &neighbors, cells)
}

pub fn find_barcodes<S>(reads: &[S], config: &BarcodeConfig) -> Result<BarcodeReport, BarcodeError>
where
    S: AsRef<str> + Sync,
{
    config.validate()?;

    let AnchorDetection {
        frequencies,
        anchor_start,
        candidates,
    } = detect_anchor(reads, &config.anchor)?;
    info!(
        "Anchor starts at position {} of {}",
        anchor_start,
        frequencies.read_len()
    );

    let index = CandidateIndex::build(&candidates);
    info!("Indexed {} distinct candidates", index.len());

    let neighbors = build_neighbor_map(&index, &candidates, config.chunk_size);
    let ranking = rank_candidates(&index, &neighbors, config.cells)?;
    let accepted = ranking.accepted();
    info!(
        "Degree threshold {} accepts {} barcodes",
        ranking.threshold,
        accepted.len()
    );

    Ok(BarcodeReport {
        total_reads: reads.len(),
        anchor_cutoff: config.anchor.cutoff,
        cells: config.cells,
        frequencies,
        anchor_start,
        distinct_candidates: index.len(),
        ranking,
        accepted,
    })
}

/// Reads `input`, finds its barcodes and writes every result file into `output_dir`.
pub fn run(input: &Path, output_dir: &Path, config: &BarcodeConfig) -> Result<BarcodeReport, PipelineError> {
    config.validate()?;

    let reads = fastq::read_sequences(input, config.max_reads)?;
    let report = find_barcodes(&reads, config)?;
    output::write_report(output_dir, &report)?;

    info!("Processing complete.");
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(cutoff: f64, cells: usize) -> BarcodeConfig {
        BarcodeConfig {
            anchor: AnchorConfig {
                cutoff,
                sample_size: None,
            },
            cells,
            chunk_size: 2,
            ..BarcodeConfig::default()
        }
    }

    #[test]
    fn test_small_scenario() {
        let reads = ["AAAA", "AAAA", "AAAT", "CCCC"];

        assert!(matches!(
            find_barcodes(&reads, &config(0.5, 1)),
            Err(BarcodeError::AnchorNotFound { .. })
        ));

        let report = find_barcodes(&reads, &config(0.8, 1)).unwrap();
        assert_eq!(report.anchor_start, 4);
        assert_eq!(report.distinct_candidates, 3);
        assert_eq!(report.ranking.ranked[0].barcode, "AAAA");
        assert_eq!(report.ranking.threshold, 1);
        assert_eq!(report.accepted, vec!["AAAA", "AAAT"]);
        assert!(!report.accepted.contains(&"CCCC".to_string()));
    }

    #[test]
    fn test_true_barcodes_outrank_their_errors() {
        let anchor = "TTTTTTTT";
        let truths = ["ACGTAC", "GTCAGT", "CATGCA"];
        let mut reads = Vec::new();
        for truth in truths {
            reads.push(format!("{}{}", truth, anchor));
            // One error variant per position.
            for position in 0..truth.len() {
                let mut variant = truth.as_bytes().to_vec();
                variant[position] = if variant[position] == b'A' { b'C' } else { b'A' };
                reads.push(format!("{}{}", String::from_utf8(variant).unwrap(), anchor));
            }
        }

        let report = find_barcodes(&reads, &config(0.8, 3)).unwrap();
        assert_eq!(report.anchor_start, 6);
        assert_eq!(report.ranking.threshold, 6);
        assert_eq!(report.accepted, truths);
    }

    #[test]
    fn test_pipeline_is_deterministic() {
        let reads: Vec<String> = (0..300)
            .map(|i: usize| {
                let barcode: String = (0..5).map(|k| ['A', 'C', 'G', 'T'][(i >> (k % 3)) % 4]).collect();
                format!("{}GATTACA", barcode)
            })
            .collect();
        let config = config(0.9, 5);

        let first = find_barcodes(&reads, &config).unwrap();
        let second = find_barcodes(&reads, &config).unwrap();
        assert_eq!(first.accepted, second.accepted);
        assert_eq!(first.ranking, second.ranking);
    }

    #[test]
    fn test_build_neighbor_degrees() {
        let ranking = build_neighbor_degrees(&["AAA", "AAC", "AAG", "TTT"], 3).unwrap();
        assert_eq!(ranking.threshold, 2);
        assert_eq!(ranking.accepted(), vec!["AAA", "AAC", "AAG"]);
        assert!(matches!(
            build_neighbor_degrees(&["AAA", "AAC"], 3),
            Err(BarcodeError::InsufficientCandidates { .. })
        ));
    }
}
