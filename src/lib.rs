pub mod barcodes;
pub mod cli;
pub mod commands;
