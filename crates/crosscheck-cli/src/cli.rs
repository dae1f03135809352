//! CLI argument definitions using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Crosscheck: cross-dataset quality analysis for related tabular exports
#[derive(Parser)]
#[command(name = "crosscheck")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analyze related data files and report integration findings
    Analyze {
        /// Paths to the data files (CSV/TSV)
        #[arg(value_name = "FILES", required = true)]
        files: Vec<PathBuf>,

        /// Write the full report as JSON to this path
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print the report as JSON instead of text
        #[arg(long)]
        json: bool,

        /// Column to price impact against (overrides detection)
        #[arg(long, value_name = "DATASET.COLUMN")]
        value_column: Option<String>,

        /// Reference date for freshness checks (YYYY-MM-DD, default: today)
        #[arg(long, value_name = "DATE")]
        as_of: Option<String>,
    },

    /// Show only the quality scorecard
    Score {
        /// Paths to the data files (CSV/TSV)
        #[arg(value_name = "FILES", required = true)]
        files: Vec<PathBuf>,

        /// Output as JSON
        #[arg(long)]
        json: bool,

        /// Reference date for freshness checks (YYYY-MM-DD, default: today)
        #[arg(long, value_name = "DATE")]
        as_of: Option<String>,
    },
}
