//! Orphan detection: key values present on one side of a join candidate
//! but missing from the other.

use crate::input::{Dataset, DatasetCollection};
use crate::joins::JoinCandidate;

use super::finding::{OrphanFinding, SampleRows};

const MAX_EXAMPLES: usize = 5;
const MAX_SAMPLE_ROWS: usize = 3;

/// Check every join candidate in both directions and report distinct key
/// values with no counterpart. Candidates whose columns cannot be resolved
/// are skipped. Findings are sorted by affected share, worst first.
pub fn check_orphans(
    collection: &DatasetCollection,
    candidates: &[JoinCandidate],
) -> Vec<OrphanFinding> {
    let mut findings = Vec::new();

    for candidate in candidates {
        let (Some(a), Some(b)) = (
            collection.get(&candidate.dataset_a),
            collection.get(&candidate.dataset_b),
        ) else {
            continue;
        };
        let (Some(idx_a), Some(idx_b)) = (
            a.column_index(&candidate.column_a),
            b.column_index(&candidate.column_b),
        ) else {
            continue;
        };

        let values_a = a.distinct_values(idx_a);
        let values_b = b.distinct_values(idx_b);

        let only_in_a: Vec<&str> = values_a.difference(&values_b).copied().collect();
        let only_in_b: Vec<&str> = values_b.difference(&values_a).copied().collect();

        if let Some(finding) = build_finding(a, idx_a, &b.name, &candidate.label, only_in_a) {
            findings.push(finding);
        }
        if let Some(finding) = build_finding(b, idx_b, &a.name, &candidate.label, only_in_b) {
            findings.push(finding);
        }
    }

    findings.sort_by(|x, y| {
        y.pct_of_source
            .partial_cmp(&x.pct_of_source)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    findings
}

fn build_finding(
    source: &Dataset,
    key_idx: usize,
    target: &str,
    key: &str,
    mut orphans: Vec<&str>,
) -> Option<OrphanFinding> {
    if orphans.is_empty() {
        return None;
    }

    // Percentage base is the full row count, not the distinct value count.
    let pct = orphans.len() as f64 / source.row_count() as f64 * 100.0;

    orphans.sort_unstable();
    let examples: Vec<String> = orphans
        .iter()
        .take(MAX_EXAMPLES)
        .map(|v| v.to_string())
        .collect();

    let sample_rows: Vec<Vec<String>> = source
        .rows
        .iter()
        .filter(|row| {
            row.get(key_idx)
                .is_some_and(|cell| examples.iter().any(|e| e == cell))
        })
        .take(MAX_SAMPLE_ROWS)
        .cloned()
        .collect();

    Some(OrphanFinding {
        direction: format!("{} → {}", source.name, target),
        source: source.name.clone(),
        target: target.to_string(),
        key: key.to_string(),
        orphan_count: orphans.len(),
        pct_of_source: round1(pct),
        example_values: examples,
        sample_rows: SampleRows {
            columns: source.columns.clone(),
            rows: sample_rows,
        },
    })
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
