//! CLI command implementations.

pub mod analyze;
pub mod score;

use chrono::NaiveDate;
use colored::{ColoredString, Colorize};
use crosscheck::input::LoadFailure;
use crosscheck::{Crosscheck, CrosscheckConfig, ValueColumn};

/// Build the engine from the flags shared by every command.
pub(crate) fn build_engine(
    value_column: Option<&str>,
    as_of: Option<&str>,
) -> Result<Crosscheck, Box<dyn std::error::Error>> {
    let mut config = CrosscheckConfig::default();

    if let Some(raw) = value_column {
        let parsed = ValueColumn::parse(raw).ok_or_else(|| {
            format!("Invalid --value-column '{}': expected dataset.column", raw)
        })?;
        config.value_column = Some(parsed);
    }
    if let Some(raw) = as_of {
        let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .map_err(|_| format!("Invalid --as-of '{}': expected YYYY-MM-DD", raw))?;
        // The whole as-of day counts as the past.
        config.reference_now = date.and_hms_opt(23, 59, 59);
    }

    Ok(Crosscheck::with_config(config))
}

/// Print per-file load failures as warnings without aborting.
pub(crate) fn print_failures(failures: &[LoadFailure]) {
    for failure in failures {
        eprintln!(
            "{} {}: {}",
            "Skipped".yellow().bold(),
            failure.path.display(),
            failure.message
        );
    }
}

/// Color a score for the terminal, padded for column alignment.
pub(crate) fn paint_score(score: Option<f64>) -> ColoredString {
    match score {
        None => format!("{:>5}", "N/A").dimmed(),
        Some(s) if s >= 80.0 => format!("{:>5.1}", s).green(),
        Some(s) if s >= 60.0 => format!("{:>5.1}", s).yellow(),
        Some(s) => format!("{:>5.1}", s).red(),
    }
}

/// Color a severity label for the terminal.
pub(crate) fn paint_severity(severity: crosscheck::Severity) -> ColoredString {
    use crosscheck::Severity;
    match severity {
        Severity::Critical => "CRITICAL".red().bold(),
        Severity::High => "HIGH".red(),
        Severity::Medium => "MEDIUM".yellow(),
        Severity::Low => "LOW".blue(),
    }
}

/// Format a count with thousands separators.
pub(crate) fn format_count(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
