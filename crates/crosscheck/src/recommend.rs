//! Remediation recommendations derived from findings and scores.
//!
//! Each recommendation pairs a headline metric with a root-cause sketch and
//! concrete steps, ready for a report or ticket. Wording stays close to the
//! operational vocabulary analysts expect (SQL audits, constraints, alerts).

use serde::{Deserialize, Serialize};

use crate::checks::{DuplicateFinding, GapFinding, OrphanFinding, Severity};
use crate::scoring::Scorecard;

const MAX_PER_CHECK: usize = 2;
const COMPLETENESS_REC_THRESHOLD: f64 = 85.0;

/// A remediation recommendation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendation {
    pub severity: Severity,
    pub title: String,
    /// One-line quantified headline.
    pub metric: String,
    /// What the problem does to downstream consumers.
    pub impact: String,
    pub root_cause: String,
    /// Ordered remediation steps.
    pub steps: Vec<String>,
    pub effort: String,
    pub prevention: String,
}

/// Build recommendations from the worst findings of each check, plus a
/// completeness recommendation when that score dips below 85. Sorted most
/// severe first; ties keep check order (orphans, duplicates, gaps).
pub fn generate_recommendations(
    orphans: &[OrphanFinding],
    duplicates: &[DuplicateFinding],
    gaps: &[GapFinding],
    scorecard: &Scorecard,
) -> Vec<Recommendation> {
    let mut recs = Vec::new();

    for finding in orphans.iter().take(MAX_PER_CHECK) {
        recs.push(Recommendation {
            severity: finding.severity(),
            title: format!("Fix referential integrity — {}", finding.direction),
            metric: format!(
                "{} records ({:.1}%) have no matching counterpart",
                format_count(finding.orphan_count),
                finding.pct_of_source
            ),
            impact: "These records vanish from joined reports and revenue calculations"
                .to_string(),
            root_cause: format!(
                "Records keyed on '{key}' exist in '{src}' but not in '{tgt}'. Typical causes: \
                 partial ETL loads, out-of-order inserts, or siloed source systems.",
                key = finding.key,
                src = finding.source,
                tgt = finding.target
            ),
            steps: vec![
                format!(
                    "Audit orphans: SELECT a.* FROM {src} a LEFT JOIN {tgt} b ON a.{key} = \
                     b.{key} WHERE b.{key} IS NULL",
                    src = finding.source,
                    tgt = finding.target,
                    key = finding.key
                ),
                "Classify results: distinguish cancelled/voided records from genuine gaps"
                    .to_string(),
                "For genuine gaps: re-extract from source system or trigger downstream creation"
                    .to_string(),
                format!(
                    "Add validation rule or FK constraint on '{}' in your pipeline",
                    finding.key
                ),
                "Set up daily reconciliation alert if orphan rate exceeds 0.5%".to_string(),
            ],
            effort: "Medium — 4–8 hours".to_string(),
            prevention: format!(
                "Referential constraint on '{}' + daily reconciliation job",
                finding.key
            ),
        });
    }

    for finding in duplicates.iter().take(MAX_PER_CHECK) {
        recs.push(Recommendation {
            severity: finding.severity(),
            title: format!("Resolve entity duplicates — '{}'", finding.dataset),
            metric: format!(
                "{} duplicate entities ({})",
                finding.duplicate_count,
                finding.kind.label()
            ),
            impact: "Inflated counts, double billing risk, broken customer segmentation"
                .to_string(),
            root_cause: format!(
                "Type: {}. Duplicates arise from multiple source systems, absent unique \
                 constraints, or manual entry without deduplication at intake.",
                finding.kind.label()
            ),
            steps: vec![
                "Run: SELECT name, COUNT(DISTINCT id) cnt FROM table GROUP BY name HAVING cnt > 1"
                    .to_string(),
                "For each group: designate a 'golden record' (most complete + most recent)"
                    .to_string(),
                "Remap all child records (orders, invoices) to the golden record ID".to_string(),
                "Archive duplicates with a 'merged_into_id' column for audit trail".to_string(),
                "Add UNIQUE constraint on the natural key (e.g. name + email, or name + region)"
                    .to_string(),
                "Implement fuzzy-match check at data entry: flag similarity > 85% before save"
                    .to_string(),
            ],
            effort: "High — 1–2 days".to_string(),
            prevention: "Unique constraint + real-time fuzzy-match check at ingestion layer"
                .to_string(),
        });
    }

    for finding in gaps.iter().take(MAX_PER_CHECK) {
        recs.push(Recommendation {
            severity: finding.severity(),
            title: format!(
                "Close process gap — {} → {}",
                finding.stage_from, finding.stage_to
            ),
            metric: format!(
                "{} records ({:.1}%) stall between stages",
                format_count(finding.missing_count),
                finding.pct_of_upstream
            ),
            impact: "Broken workflows, SLA violations, incomplete audit trails".to_string(),
            root_cause: format!(
                "Records reach '{from}' but never appear in '{to}'. Caused by failed \
                 automation, silent rejections, or manual handoffs that get skipped.",
                from = finding.stage_from,
                to = finding.stage_to
            ),
            steps: vec![
                format!(
                    "List stuck IDs: SELECT * FROM {from} WHERE id NOT IN (SELECT id FROM {to})",
                    from = finding.stage_from,
                    to = finding.stage_to
                ),
                "Check their status: cancelled/failed vs. genuinely missing".to_string(),
                "Inspect system logs at the handoff point for silent errors".to_string(),
                "For stuck-but-valid records: replay the automation or manually advance them"
                    .to_string(),
                format!(
                    "Alert rule: if any record stays in {} > 48h without moving, trigger \
                     Slack/email alert",
                    finding.stage_from
                ),
            ],
            effort: "Medium — 2–6 hours".to_string(),
            prevention: format!(
                "SLA monitoring between {} and {}, target < 1% gap",
                finding.stage_from, finding.stage_to
            ),
        });
    }

    if scorecard.completeness < COMPLETENESS_REC_THRESHOLD {
        recs.push(Recommendation {
            severity: Severity::Medium,
            title: "Improve data completeness".to_string(),
            metric: format!(
                "Completeness score: {:.1}% — significant nulls detected",
                scorecard.completeness
            ),
            impact: "Null values cause incorrect aggregations and unreliable KPIs".to_string(),
            root_cause: "Nulls result from optional fields, failed ETL steps, or schema \
                         mismatches between source and target."
                .to_string(),
            steps: vec![
                "Profile nulls: SELECT col, COUNT(*) - COUNT(col) AS nulls, \
                 ROUND(100.0*(COUNT(*)-COUNT(col))/COUNT(*),1) pct FROM table"
                    .to_string(),
                "Classify: valid optional nulls vs. missing required values".to_string(),
                "For required fields: add NOT NULL constraint and backfill from source system"
                    .to_string(),
                "Document expected null rate per column as a quality baseline".to_string(),
                "Monitor: alert when null rate exceeds baseline by more than +2% in any \
                 pipeline run"
                    .to_string(),
            ],
            effort: "Low–Medium — depends on source system access".to_string(),
            prevention: "Schema validation + null-rate baseline monitoring at ingestion"
                .to_string(),
        });
    }

    recs.sort_by(|a, b| b.severity.cmp(&a.severity));
    recs
}

/// Format a count with thousands separators.
fn format_count(n: usize) -> String {
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
