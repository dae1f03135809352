//! Crosscheck CLI - cross-dataset quality reports.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Analyze {
            files,
            output,
            json,
            value_column,
            as_of,
        } => commands::analyze::run(files, output, json, value_column, as_of, cli.verbose),

        Commands::Score { files, json, as_of } => commands::score::run(files, json, as_of),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
