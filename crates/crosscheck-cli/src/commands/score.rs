//! Score command - show only the quality scorecard.

use std::path::PathBuf;

use colored::Colorize;

use super::{build_engine, paint_score, print_failures};

pub fn run(
    files: Vec<PathBuf>,
    json: bool,
    as_of: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let engine = build_engine(None, as_of.as_deref())?;

    let outcome = engine.analyze_paths(&files);
    print_failures(&outcome.failures);

    let Some(report) = outcome.report else {
        return Err("no datasets could be loaded".into());
    };
    let scorecard = &report.scorecard;

    if json {
        println!("{}", serde_json::to_string_pretty(scorecard)?);
        return Ok(());
    }

    println!();
    println!("{}", "Quality scorecard".bold());
    for (name, score) in scorecard.dimension_entries() {
        println!("  {:<13} {}", name, paint_score(score));
    }
    println!(
        "  {:<13} {}  {} (grade {})",
        "Composite".bold(),
        paint_score(Some(scorecard.composite)),
        scorecard.label.label(),
        scorecard.grade.label()
    );

    if !scorecard.details.validity_issues.is_empty() {
        println!();
        println!("{}", "Validity issues".bold());
        for issue in &scorecard.details.validity_issues {
            println!("  - {}", issue);
        }
    }

    if let Some(days) = scorecard.details.timeliness.days_old {
        println!();
        println!(
            "Most recent record: {} day(s) old, {} future-dated value(s)",
            days, scorecard.details.timeliness.future_values
        );
    }

    Ok(())
}
