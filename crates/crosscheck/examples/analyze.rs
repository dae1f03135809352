//! Example: Analyze related tabular exports with Crosscheck.
//!
//! Usage:
//!   cargo run --example analyze -- <file> [<file>...]
//!
//! Example:
//!   cargo run --example analyze -- orders.csv customers.csv

use std::env;
use std::path::PathBuf;

use crosscheck::Crosscheck;

fn main() {
    let files: Vec<PathBuf> = env::args().skip(1).map(PathBuf::from).collect();

    if files.is_empty() {
        eprintln!("Usage: cargo run --example analyze -- <file> [<file>...]");
        eprintln!("\nExample:");
        eprintln!("  cargo run --example analyze -- orders.csv customers.csv");
        std::process::exit(1);
    }

    let separator = "=".repeat(80);
    println!("{}", separator);
    println!("Crosscheck Analysis");
    println!("{}", separator);
    println!();

    let engine = Crosscheck::new();
    let outcome = engine.analyze_paths(&files);

    for failure in &outcome.failures {
        eprintln!("Skipped {}: {}", failure.path.display(), failure.message);
    }

    let Some(report) = outcome.report else {
        eprintln!("No datasets could be loaded.");
        std::process::exit(1);
    };

    println!("## Datasets ({})", report.datasets.len());
    println!();
    for profile in &report.datasets {
        println!(
            "  {:20} {:>7} rows  {:>3} columns  looks like: {}",
            profile.name,
            profile.row_count,
            profile.column_count,
            profile.entity.label()
        );
    }
    println!();

    println!("## Findings ({})", report.findings.len());
    println!();
    for finding in &report.findings {
        let pct = finding
            .percentage()
            .map(|p| format!(" ({p:.1}%)"))
            .unwrap_or_default();
        println!(
            "  [{}] {} records affected{}",
            finding.severity().label(),
            finding.affected_count(),
            pct
        );
    }
    println!();

    println!("## Scorecard");
    for (name, score) in report.scorecard.dimension_entries() {
        match score {
            Some(value) => println!("  {:14} {:>5.1}", name, value),
            None => println!("  {:14}   N/A", name),
        }
    }
    println!(
        "  {:14} {:>5.1}  [{}]",
        "composite",
        report.scorecard.composite,
        report.scorecard.label.label()
    );
    println!();

    println!("## Recommendations ({})", report.recommendations.len());
    println!();
    for (i, rec) in report.recommendations.iter().enumerate() {
        println!("  {}. [{}] {}", i + 1, rec.severity.label(), rec.title);
        println!("     {}", rec.metric);
        println!();
    }

    println!("{}", separator);
}
