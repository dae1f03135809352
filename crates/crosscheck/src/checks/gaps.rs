//! Process flow gaps: records that entered one pipeline stage but never
//! reached the next.

use crate::input::{Dataset, DatasetCollection};
use crate::joins::{JoinCandidate, JoinKind};
use crate::semantic::lexicon::STAGE_KEYWORDS;

use super::finding::{GapFinding, SampleRows};

const MAX_EXAMPLES: usize = 5;
const MAX_SAMPLE_ROWS: usize = 3;

/// Rank assigned to a dataset whose name matches no stage keyword.
const UNRANKED: usize = 999;

/// Order datasets into a pipeline by stage keyword, then walk adjacent
/// pairs and report upstream identifiers that never appear downstream.
///
/// When no dataset name matches any stage keyword, row counts decide the
/// order instead: funnels shrink, so the biggest dataset goes first.
pub fn check_gaps(collection: &DatasetCollection, candidates: &[JoinCandidate]) -> Vec<GapFinding> {
    if collection.len() < 2 {
        return Vec::new();
    }

    let mut pipeline: Vec<&Dataset> = collection.iter().collect();
    let ranks: Vec<usize> = pipeline.iter().map(|d| stage_rank(&d.name)).collect();
    if ranks.iter().all(|r| *r == ranks[0]) {
        pipeline.sort_by(|a, b| b.row_count().cmp(&a.row_count()));
    } else {
        pipeline.sort_by_key(|d| stage_rank(&d.name));
    }

    let mut findings = Vec::new();
    for pair in pipeline.windows(2) {
        let (upstream, downstream) = (pair[0], pair[1]);
        let Some(candidate) = candidate_for(candidates, &upstream.name, &downstream.name) else {
            continue;
        };
        let (Some(up_col), Some(down_col)) = (
            candidate.column_for(&upstream.name),
            candidate.column_for(&downstream.name),
        ) else {
            continue;
        };
        let (Some(up_idx), Some(down_idx)) = (
            upstream.column_index(up_col),
            downstream.column_index(down_col),
        ) else {
            continue;
        };

        let up_values = upstream.distinct_values(up_idx);
        let down_values = downstream.distinct_values(down_idx);
        let mut missing: Vec<&str> = up_values.difference(&down_values).copied().collect();
        if missing.is_empty() {
            continue;
        }

        // Percentage base is the distinct upstream identifier count.
        let pct = missing.len() as f64 / up_values.len() as f64 * 100.0;

        missing.sort_unstable();
        let examples: Vec<String> = missing
            .iter()
            .take(MAX_EXAMPLES)
            .map(|v| v.to_string())
            .collect();
        let sample_rows: Vec<Vec<String>> = upstream
            .rows
            .iter()
            .filter(|row| {
                row.get(up_idx)
                    .is_some_and(|cell| examples.iter().any(|e| e == cell))
            })
            .take(MAX_SAMPLE_ROWS)
            .cloned()
            .collect();

        findings.push(GapFinding {
            stage_from: upstream.name.clone(),
            stage_to: downstream.name.clone(),
            key: candidate.label.clone(),
            missing_count: missing.len(),
            pct_of_upstream: round1(pct),
            example_ids: examples,
            sample_rows: SampleRows {
                columns: upstream.columns.clone(),
                rows: sample_rows,
            },
        });
    }

    findings.sort_by(|x, y| {
        y.pct_of_upstream
            .partial_cmp(&x.pct_of_upstream)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    findings
}

/// Position of the first stage keyword the name contains.
fn stage_rank(name: &str) -> usize {
    let lower = name.to_lowercase();
    STAGE_KEYWORDS
        .iter()
        .position(|kw| lower.contains(kw))
        .unwrap_or(UNRANKED)
}

/// Pick the join candidate linking a stage pair. A shared-name candidate
/// between exactly these two datasets wins; otherwise any candidate that
/// links both, in discovery order.
fn candidate_for<'a>(
    candidates: &'a [JoinCandidate],
    upstream: &str,
    downstream: &str,
) -> Option<&'a JoinCandidate> {
    candidates
        .iter()
        .find(|c| c.kind == JoinKind::SharedName && c.links(upstream, downstream))
        .or_else(|| candidates.iter().find(|c| c.links(upstream, downstream)))
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
