use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use csv::Writer;
use strum::IntoEnumIterator;
use tracing::info;

use crate::barcodes::constants;
use crate::barcodes::error::PipelineError;
use crate::barcodes::frequency::BaseFrequencyTable;
use crate::barcodes::nucleotide::Nucleotide;
use crate::barcodes::ranking::{degree_histogram, Ranking};
use crate::barcodes::BarcodeReport;

/// Writes every result file of `report` into `output_dir`, creating it if needed.
pub fn write_report(output_dir: &Path, report: &BarcodeReport) -> Result<(), PipelineError> {
    info!("Writing results to {}", output_dir.display());

    std::fs::create_dir_all(output_dir).map_err(|e| PipelineError::io(output_dir, e))?;

    write_barcodes(&output_dir.join(constants::BARCODES_FILE), &report.accepted)?;
    write_ranked_candidates(
        &output_dir.join(constants::RANKED_CANDIDATES_FILE),
        &report.ranking,
    )?;
    write_base_frequencies(
        &output_dir.join(constants::BASE_FREQUENCIES_FILE),
        &report.frequencies,
    )?;
    write_degree_histogram(
        &output_dir.join(constants::DEGREE_HISTOGRAM_FILE),
        &report.ranking,
    )?;
    write_summary(&output_dir.join(constants::SUMMARY_FILE), report)?;

    Ok(())
}

/// One accepted barcode per line.
pub fn write_barcodes(path: &Path, barcodes: &[String]) -> Result<(), PipelineError> {
    let file = File::create(path).map_err(|e| PipelineError::io(path, e))?;
    let mut wtr = BufWriter::new(file);
    for barcode in barcodes {
        writeln!(wtr, "{}", barcode).map_err(|e| PipelineError::io(path, e))?;
    }
    wtr.flush().map_err(|e| PipelineError::io(path, e))?;
    Ok(())
}

pub fn write_ranked_candidates(path: &Path, ranking: &Ranking) -> Result<(), PipelineError> {
    let accepted = ranking.accepted_count();
    let mut wtr = Writer::from_path(path)?;
    wtr.write_record(["Barcode", "Degree", "Reads", "Accepted"])?;
    for (rank, candidate) in ranking.ranked.iter().enumerate() {
        wtr.write_record([
            candidate.barcode.clone(),
            candidate.degree.to_string(),
            candidate.reads.to_string(),
            (rank < accepted).to_string(),
        ])?;
    }
    wtr.flush().map_err(|e| PipelineError::io(path, e))?;
    Ok(())
}

pub fn write_base_frequencies(path: &Path, table: &BaseFrequencyTable) -> Result<(), PipelineError> {
    let mut wtr = Writer::from_path(path)?;

    let mut header = vec!["Position".to_string()];
    header.extend(Nucleotide::iter().map(|nucleotide| nucleotide.to_string()));
    header.push("Max".to_string());
    wtr.write_record(&header)?;

    for position in 0..table.read_len() {
        let mut record = vec![position.to_string()];
        record.extend(
            table
                .frequencies(position)
                .iter()
                .map(|frequency| format!("{:.6}", frequency)),
        );
        record.push(format!("{:.6}", table.max_frequency(position)));
        wtr.write_record(&record)?;
    }
    wtr.flush().map_err(|e| PipelineError::io(path, e))?;
    Ok(())
}

pub fn write_degree_histogram(path: &Path, ranking: &Ranking) -> Result<(), PipelineError> {
    let mut wtr = Writer::from_path(path)?;
    wtr.write_record(["Degree", "Candidates"])?;
    for (degree, candidates) in degree_histogram(&ranking.ranked) {
        wtr.write_record([degree.to_string(), candidates.to_string()])?;
    }
    wtr.flush().map_err(|e| PipelineError::io(path, e))?;
    Ok(())
}

pub fn write_summary(path: &Path, report: &BarcodeReport) -> Result<(), PipelineError> {
    let rows = [
        ("Total Reads", report.total_reads.to_string()),
        ("Frequency Reads", report.frequencies.read_count().to_string()),
        ("Read Length", report.frequencies.read_len().to_string()),
        ("Anchor Cutoff", report.anchor_cutoff.to_string()),
        ("Anchor Start", report.anchor_start.to_string()),
        ("Distinct Candidates", report.distinct_candidates.to_string()),
        ("Cells", report.cells.to_string()),
        ("Degree Threshold", report.ranking.threshold.to_string()),
        ("Accepted Barcodes", report.accepted.len().to_string()),
    ];

    let mut wtr = Writer::from_path(path)?;
    wtr.write_record(["Metric", "Value"])?;
    for (metric, value) in rows {
        wtr.write_record([metric, value.as_str()])?;
    }
    wtr.flush().map_err(|e| PipelineError::io(path, e))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::barcodes::{find_barcodes, BarcodeConfig};

    #[test]
    fn test_writes_all_files() {
        let reads = ["AAAAGG", "AAATGG", "AAAAGG", "CCCCGG"];
        let config = BarcodeConfig {
            cells: 1,
            ..BarcodeConfig::default()
        };
        let report = find_barcodes(&reads, &config).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("nested").join("out");
        write_report(&out, &report).unwrap();

        let barcodes = std::fs::read_to_string(out.join(constants::BARCODES_FILE)).unwrap();
        assert_eq!(barcodes, "AAAA\nAAAT\n");

        let ranked = std::fs::read_to_string(out.join(constants::RANKED_CANDIDATES_FILE)).unwrap();
        let lines: Vec<&str> = ranked.lines().collect();
        assert_eq!(lines[0], "Barcode,Degree,Reads,Accepted");
        assert_eq!(lines[1], "AAAA,1,2,true");
        assert_eq!(lines[3], "CCCC,0,1,false");

        let frequencies = std::fs::read_to_string(out.join(constants::BASE_FREQUENCIES_FILE)).unwrap();
        let lines: Vec<&str> = frequencies.lines().collect();
        assert_eq!(lines[0], "Position,A,C,G,T,Max");
        assert_eq!(lines.len(), 7);
        assert_eq!(lines[5], "4,0.000000,0.000000,1.000000,0.000000,1.000000");

        let histogram = std::fs::read_to_string(out.join(constants::DEGREE_HISTOGRAM_FILE)).unwrap();
        assert_eq!(histogram, "Degree,Candidates\n0,1\n1,2\n");

        let summary = std::fs::read_to_string(out.join(constants::SUMMARY_FILE)).unwrap();
        assert!(summary.contains("Anchor Start,4"));
        assert!(summary.contains("Accepted Barcodes,2"));
    }
}
