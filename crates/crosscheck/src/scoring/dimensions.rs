//! The five quality dimensions scored independently per analysis run.

use chrono::{NaiveDate, NaiveDateTime};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::checks::{DuplicateFinding, GapFinding, OrphanFinding};
use crate::input::{Dataset, DatasetCollection};
use crate::semantic::{SemanticType, classify_column};

/// Completeness never reports above this, even for fully populated data.
/// A perfect completeness score on a quality report invites complacency;
/// the damping keeps headroom visible.
const COMPLETENESS_CAP: f64 = 92.0;
const COMPLETENESS_DAMPING: f64 = 0.92;

const MAX_UNIQUENESS_PENALTY: f64 = 25.0;
const UNIQUENESS_PENALTY_PER_GROUP: f64 = 3.0;

const MAX_VALIDITY_ISSUES: usize = 8;

const FUTURE_VALUE_PENALTY: f64 = 1.5;

/// Datetime formats accepted by the temporal checks, tried in order.
/// Date-only values are promoted to midnight.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
];
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%Y/%m/%d"];

/// Share of non-null cells across all datasets, damped and capped.
///
/// Returns the overall score plus the raw per-dataset percentages for
/// reporting. An empty collection scores at the cap.
pub fn score_completeness(collection: &DatasetCollection) -> (f64, IndexMap<String, f64>) {
    let mut by_dataset = IndexMap::new();
    let mut total_cells = 0usize;
    let mut non_null_cells = 0usize;

    for dataset in collection.iter() {
        let cells = dataset.cell_count();
        let filled = dataset
            .rows
            .iter()
            .flatten()
            .filter(|cell| !Dataset::is_null_value(cell))
            .count();
        let pct = if cells == 0 {
            100.0
        } else {
            filled as f64 / cells as f64 * 100.0
        };
        by_dataset.insert(dataset.name.clone(), round1(pct));
        total_cells += cells;
        non_null_cells += filled;
    }

    if total_cells == 0 {
        return (COMPLETENESS_CAP, by_dataset);
    }
    let ratio = non_null_cells as f64 / total_cells as f64;
    let score = (ratio * 100.0 * COMPLETENESS_DAMPING).min(COMPLETENESS_CAP);
    (round1(score), by_dataset)
}

/// The base score and penalty behind the uniqueness dimension.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UniquenessDetail {
    /// Distinct-row share before any duplicate penalty.
    pub base: f64,
    /// Capped penalty charged for duplicate entity groups.
    pub penalty: f64,
}

/// Share of fully distinct rows, minus a capped penalty per duplicate
/// entity group the duplicate check found.
pub fn score_uniqueness(
    collection: &DatasetCollection,
    duplicates: &[DuplicateFinding],
) -> (f64, UniquenessDetail) {
    let total_rows = collection.total_rows();
    let unique_rows: usize = collection.iter().map(Dataset::distinct_row_count).sum();

    let base = if total_rows == 0 {
        100.0
    } else {
        round1(unique_rows as f64 / total_rows as f64 * 100.0)
    };

    let group_count: usize = duplicates.iter().map(|f| f.duplicate_count).sum();
    let penalty = (group_count as f64 * UNIQUENESS_PENALTY_PER_GROUP).min(MAX_UNIQUENESS_PENALTY);
    ((base - penalty).max(0.0), UniquenessDetail { base, penalty })
}

/// Column-by-column plausibility score, averaged.
///
/// Each column is scored by the first rule that applies: entirely null,
/// constant, numeric (with monetary sign checks or IQR outlier checks),
/// temporal (parse failures and future dates), or free-form.
pub fn score_validity(collection: &DatasetCollection, now: NaiveDateTime) -> (f64, Vec<String>) {
    let mut scores = Vec::new();
    let mut issues = Vec::new();

    for dataset in collection.iter() {
        let row_count = dataset.row_count();
        for (idx, column) in dataset.columns.iter().enumerate() {
            let non_null: Vec<&str> = dataset.non_null_values(idx).collect();

            if non_null.is_empty() {
                scores.push(0.0);
                issues.push(format!("{}.{}: entirely null", dataset.name, column));
                continue;
            }

            let distinct = dataset.distinct_count(idx);
            if distinct == 1 && row_count > 5 {
                scores.push(55.0);
                issues.push(format!("{}.{}: only one unique value", dataset.name, column));
                continue;
            }

            let numeric: Vec<f64> = non_null
                .iter()
                .filter_map(|v| v.trim().parse::<f64>().ok())
                .collect();
            let all_numeric = numeric.len() == non_null.len();
            let semantic = classify_column(column);

            if all_numeric {
                if semantic == SemanticType::Monetary {
                    let negatives = numeric.iter().filter(|v| **v < 0.0).count();
                    scores.push((100.0 - negatives as f64 / row_count as f64 * 200.0).max(40.0));
                    if negatives > 0 {
                        issues.push(format!(
                            "{}.{}: {} negative monetary values",
                            dataset.name, column, negatives
                        ));
                    }
                } else if numeric.len() > 10 {
                    scores.push(outlier_score(&numeric));
                } else {
                    scores.push(90.0);
                }
            } else if semantic == SemanticType::Temporal {
                let parsed: Vec<NaiveDateTime> =
                    non_null.iter().filter_map(|v| parse_datetime(v)).collect();
                let unparsable = non_null.len() - parsed.len();
                let future = parsed.iter().filter(|dt| **dt > now).count();
                let raw = 100.0
                    - unparsable as f64 / row_count as f64 * 50.0
                    - future as f64 / row_count as f64 * 25.0;
                scores.push(round1(raw).max(40.0));
                if future > 0 {
                    issues.push(format!(
                        "{}.{}: {} future-dated values",
                        dataset.name, column, future
                    ));
                }
            } else {
                scores.push(92.0);
            }
        }
    }

    if scores.is_empty() {
        return (90.0, issues);
    }
    issues.truncate(MAX_VALIDITY_ISSUES);
    let mean = scores.iter().sum::<f64>() / scores.len() as f64;
    (round1(mean), issues)
}

/// Score numeric spread: values beyond three IQRs from the quartiles count
/// against the column. A flat distribution (zero IQR) is suspicious in its
/// own way and scores 88.
fn outlier_score(values: &[f64]) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let q1 = quantile(&sorted, 0.25);
    let q3 = quantile(&sorted, 0.75);
    let iqr = q3 - q1;
    if iqr <= 0.0 {
        return 88.0;
    }
    let low = q1 - 3.0 * iqr;
    let high = q3 + 3.0 * iqr;
    let outliers = sorted.iter().filter(|v| **v < low || **v > high).count();
    (100.0 - outliers as f64 / sorted.len() as f64 * 100.0).max(60.0)
}

/// Linear-interpolation quantile over pre-sorted values.
fn quantile(sorted: &[f64], p: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let h = (sorted.len() - 1) as f64 * p;
    let lo = h.floor() as usize;
    let frac = h - lo as f64;
    if lo + 1 >= sorted.len() {
        sorted[lo]
    } else {
        sorted[lo] + frac * (sorted[lo + 1] - sorted[lo])
    }
}

/// Cross-dataset agreement, from pooled orphan and gap percentages.
///
/// Needs at least two datasets to mean anything; returns `None` otherwise.
/// A multi-dataset run with no findings scores 95, not 100: absence of
/// detected conflicts is weaker evidence than verified agreement.
pub fn score_consistency(
    collection: &DatasetCollection,
    orphans: &[OrphanFinding],
    gaps: &[GapFinding],
) -> Option<f64> {
    if collection.len() < 2 {
        return None;
    }

    let pcts: Vec<f64> = orphans
        .iter()
        .map(|f| f.pct_of_source)
        .chain(gaps.iter().map(|f| f.pct_of_upstream))
        .collect();
    if pcts.is_empty() {
        return Some(95.0);
    }

    let worst = pcts.iter().cloned().fold(f64::MIN, f64::max);
    let avg = pcts.iter().sum::<f64>() / pcts.len() as f64;
    Some(round1(100.0 - worst * 0.55 - avg * 0.45).max(0.0))
}

/// Timeliness details carried alongside the score.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TimelinessDetail {
    /// Most recent parseable value across all temporal columns.
    pub latest: Option<NaiveDateTime>,
    /// Age of that value in whole days, negative when it lies ahead of now.
    pub days_old: Option<i64>,
    /// Number of values dated after the reference time.
    pub future_values: usize,
}

/// Freshness of the most recent temporal value, tiered by age, with a
/// penalty per future-dated value. No temporal columns at all scores a
/// neutral 70.
pub fn score_timeliness(
    collection: &DatasetCollection,
    now: NaiveDateTime,
) -> (f64, TimelinessDetail) {
    let mut latest: Option<NaiveDateTime> = None;
    let mut future_values = 0usize;

    for dataset in collection.iter() {
        for (idx, column) in dataset.columns.iter().enumerate() {
            if classify_column(column) != SemanticType::Temporal {
                continue;
            }
            for value in dataset.non_null_values(idx) {
                let Some(parsed) = parse_datetime(value) else {
                    continue;
                };
                if parsed > now {
                    future_values += 1;
                }
                if latest.is_none_or(|current| parsed > current) {
                    latest = Some(parsed);
                }
            }
        }
    }

    let Some(latest_value) = latest else {
        return (70.0, TimelinessDetail::default());
    };

    let days_old = (now - latest_value).num_days();
    let base = match days_old {
        d if d < 7 => 100.0,
        d if d < 30 => 90.0,
        d if d < 90 => 75.0,
        d if d < 365 => 55.0,
        _ => 30.0,
    };
    let score = round1((base - future_values as f64 * FUTURE_VALUE_PENALTY).max(0.0));
    (
        score,
        TimelinessDetail {
            latest: Some(latest_value),
            days_old: Some(days_old),
            future_values,
        },
    )
}

/// Parse a cell as a datetime, trying the supported formats in order.
fn parse_datetime(value: &str) -> Option<NaiveDateTime> {
    let trimmed = value.trim();
    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(dt);
        }
    }
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            return date.and_hms_opt(0, 0, 0);
        }
    }
    None
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
