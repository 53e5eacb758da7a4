use clap::{Parser, Subcommand};

use crate::commands;

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(subcommand)]
    Barcodes(commands::barcodes::Commands),
}

#[derive(Parser)]
#[command(
    name = "barcode-finder",
    color = clap::ColorChoice::Always,
    author = "Barcode Finder",
    version = "0.1.0",
    about = "Finds true cell barcodes among sequencing reads by their Hamming-1 neighbor degree",
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}
