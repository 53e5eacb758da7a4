use clap::Parser;

use barcode_finder::cli::{Cli, Commands};
use barcode_finder::commands;

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Barcodes(cmd) => commands::barcodes::command(cmd),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
