//! Analyze command - run all checks and render the full report.

use std::path::PathBuf;

use colored::Colorize;
use crosscheck::checks::{DuplicateKind, SampleRows};
use crosscheck::AnalysisReport;

use super::{build_engine, format_count, paint_score, paint_severity, print_failures};

const MAX_ORPHANS_SHOWN: usize = 3;
const MAX_DUPLICATES_SHOWN: usize = 4;
const MAX_GAPS_SHOWN: usize = 3;
const MAX_SAMPLE_COLUMNS: usize = 6;

pub fn run(
    files: Vec<PathBuf>,
    output: Option<PathBuf>,
    json: bool,
    value_column: Option<String>,
    as_of: Option<String>,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let engine = build_engine(value_column.as_deref(), as_of.as_deref())?;

    if !json {
        println!(
            "{} {} file(s)...",
            "Loading".cyan().bold(),
            files.len().to_string().white()
        );
    }

    let outcome = engine.analyze_paths(&files);
    print_failures(&outcome.failures);

    let Some(report) = outcome.report else {
        return Err("no datasets could be loaded".into());
    };

    if let Some(ref path) = output {
        std::fs::write(path, report.to_json()?)?;
        if !json {
            println!(
                "{} {}",
                "Saved report to".green().bold(),
                path.display().to_string().white()
            );
        }
    }

    if json {
        println!("{}", report.to_json()?);
        return Ok(());
    }

    render_report(&report, verbose);
    Ok(())
}

fn render_report(report: &AnalysisReport, verbose: bool) {
    let sep = "=".repeat(65);
    let sep2 = "-".repeat(65);

    println!();
    println!("{}", sep);
    println!(
        "  {}",
        "DATA QUALITY REPORT — 3 CRITICAL INTEGRATION CHECKS".bold()
    );
    println!("{}", sep);

    println!();
    println!("{}", "Datasets".bold());
    for ds in &report.datasets {
        println!(
            "  {}: {} rows × {} columns  [{}]",
            ds.name.white().bold(),
            format_count(ds.row_count),
            ds.column_count,
            ds.entity.label()
        );
    }
    println!(
        "  Domain: {} (confidence {:.0}%)",
        report.domain.domain.label(),
        report.domain.confidence * 100.0
    );
    if verbose {
        println!("  Process flow: {}", report.domain.domain.process_flow());
        println!("{}", "Join candidates".bold());
        for candidate in &report.join_candidates {
            println!(
                "  {} ({} ↔ {})",
                candidate.label, candidate.dataset_a, candidate.dataset_b
            );
        }
    }

    // CHECK 1
    println!();
    println!("{}", "CHECK 1 ▶ ORPHAN RECORDS".bold());
    println!("  Records that have no matching counterpart in a related file.");
    println!("{}", sep2);
    let orphans: Vec<_> = report.orphan_findings().collect();
    if orphans.is_empty() {
        println!("  No orphan records detected across detected join keys.");
    } else {
        for finding in orphans.iter().take(MAX_ORPHANS_SHOWN) {
            println!();
            println!(
                "  {}  |  key: {}",
                finding.direction.white().bold(),
                finding.key
            );
            println!(
                "  Orphans: {}  ({}% of source file)",
                format_count(finding.orphan_count).red(),
                finding.pct_of_source
            );
            println!("  Example values: {}", finding.example_values.join(", "));
            print_sample_rows(&finding.sample_rows, "  Sample rows from source:");
        }
    }

    // CHECK 2
    println!();
    println!("{}", "CHECK 2 ▶ ENTITY DUPLICATES".bold());
    println!("  Same real-world entity registered under multiple IDs or");
    println!("  with slightly different spellings.");
    println!("{}", sep2);
    let duplicates: Vec<_> = report.duplicate_findings().collect();
    if duplicates.is_empty() {
        println!("  No entity duplicates detected.");
    } else {
        for finding in duplicates.iter().take(MAX_DUPLICATES_SHOWN) {
            println!();
            println!(
                "  File: {}  |  Type: {}",
                finding.dataset.white().bold(),
                finding.kind.label()
            );
            println!(
                "  Affected entities: {}",
                format_count(finding.duplicate_count).red()
            );
            match &finding.kind {
                DuplicateKind::SameNameMultipleIds { groups } => {
                    for group in groups.iter().take(3) {
                        println!(
                            "    '{}' → IDs: {}  ({} IDs)",
                            group.name,
                            group.appears_with_ids.join(", "),
                            group.id_count
                        );
                    }
                }
                DuplicateKind::FuzzyName { pairs } => {
                    for pair in pairs.iter().take(3) {
                        println!(
                            "    '{}' ≈ '{}'  (similarity {})",
                            pair.value_a, pair.value_b, pair.similarity
                        );
                    }
                }
            }
        }
    }

    // CHECK 3
    println!();
    println!("{}", "CHECK 3 ▶ PROCESS FLOW GAPS".bold());
    println!("  Records present in an upstream stage but absent from the");
    println!("  expected downstream stage.");
    println!("{}", sep2);
    let gaps: Vec<_> = report.gap_findings().collect();
    if gaps.is_empty() {
        println!("  No process flow gaps detected (or insufficient file structure).");
    } else {
        for finding in gaps.iter().take(MAX_GAPS_SHOWN) {
            println!();
            println!(
                "  {}  →→  {}  |  key: {}",
                finding.stage_from.white().bold(),
                finding.stage_to.white().bold(),
                finding.key
            );
            println!(
                "  Missing downstream: {}  ({}% of upstream)",
                format_count(finding.missing_count).red(),
                finding.pct_of_upstream
            );
            println!(
                "  Example IDs not found in {}: {}",
                finding.stage_to,
                finding.example_ids.join(", ")
            );
            print_sample_rows(
                &finding.sample_rows,
                "  Sample rows from upstream that have no continuation:",
            );
        }
    }

    // Scorecard
    println!();
    println!("{}", sep);
    println!("  {}", "SCORECARD".bold());
    println!("{}", sep2);
    for (name, score) in report.scorecard.dimension_entries() {
        println!("  {:<13} {}", name, paint_score(score));
    }
    println!(
        "  {:<13} {}  {} (grade {})",
        "Composite".bold(),
        paint_score(Some(report.scorecard.composite)),
        report.scorecard.label.label(),
        report.scorecard.grade.label()
    );
    if verbose && !report.scorecard.details.validity_issues.is_empty() {
        println!("  Validity issues:");
        for issue in &report.scorecard.details.validity_issues {
            println!("    - {}", issue);
        }
    }

    // Impact
    if !report.impact.items.is_empty() {
        println!();
        println!("  {}", "ESTIMATED IMPACT".bold());
        println!("{}", sep2);
        if let Some(avg) = report.impact.avg_value {
            println!("  Average transaction value: ${:.2}", avg);
        }
        for item in &report.impact.items {
            match item.value {
                Some(value) => println!(
                    "  {}: {} records — ${:.2} at risk ({})",
                    item.label,
                    format_count(item.count),
                    value,
                    item.risk
                ),
                None => println!(
                    "  {}: {} records ({})",
                    item.label,
                    format_count(item.count),
                    item.risk
                ),
            }
        }
        if let Some(total) = report.impact.total_value {
            println!("  {} ${:.2}", "Total estimated:".bold(), total);
        }
    }

    // Recommendations
    if !report.recommendations.is_empty() {
        println!();
        println!("  {}", "RECOMMENDATIONS".bold());
        println!("{}", sep2);
        for rec in &report.recommendations {
            println!();
            println!("  [{}] {}", paint_severity(rec.severity), rec.title.bold());
            println!("    {}", rec.metric);
            if verbose {
                println!("    Why: {}", rec.root_cause);
                for (i, step) in rec.steps.iter().enumerate() {
                    println!("    {}. {}", i + 1, step);
                }
                println!("    Effort: {}  |  Prevention: {}", rec.effort, rec.prevention);
            }
        }
    }

    println!();
    println!("{}", sep);
    println!(
        "  {} finding(s): {} critical, {} high, {} medium",
        report.summary.finding_count,
        report.summary.findings_by_severity.critical.to_string().red(),
        report.summary.findings_by_severity.high.to_string().red(),
        report.summary.findings_by_severity.medium.to_string().yellow()
    );
    println!("{}", sep);
}

fn print_sample_rows(samples: &SampleRows, header: &str) {
    if samples.is_empty() {
        return;
    }
    println!("{}", header);
    let shown = samples.columns.len().min(MAX_SAMPLE_COLUMNS);
    println!("    {}", samples.columns[..shown].join("  |  ").dimmed());
    for row in &samples.rows {
        let cells: Vec<&str> = row
            .iter()
            .take(shown)
            .map(String::as_str)
            .collect();
        println!("    {}", cells.join("  |  "));
    }
}
