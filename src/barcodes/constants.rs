// Constants for barcode discovery
//
// Anchor detection
pub const DEFAULT_ANCHOR_CUTOFF: f64 = 0.8;

// Neighbor graph partitions
pub const DEFAULT_CHUNK_SIZE: usize = 10_000;

// Expected number of cells when none is configured
pub const DEFAULT_CELLS: usize = 10_000;

// Gzip magic bytes
pub const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

// Output files
pub const BARCODES_FILE: &str = "barcodes.txt";
pub const RANKED_CANDIDATES_FILE: &str = "ranked_candidates.csv";
pub const BASE_FREQUENCIES_FILE: &str = "base_frequencies.csv";
pub const DEGREE_HISTOGRAM_FILE: &str = "degree_histogram.csv";
pub const SUMMARY_FILE: &str = "summary.csv";
