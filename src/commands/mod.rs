pub mod barcodes;
