//! Finding types produced by the integration checks.

use serde::{Deserialize, Serialize};

/// Severity of a finding or recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    /// Get a human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
            Severity::Critical => "critical",
        }
    }
}

/// A few rows lifted from a dataset so a finding can be displayed with
/// context. Carries its own headers; findings stay self-contained records.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SampleRows {
    /// Column headers of the source dataset.
    pub columns: Vec<String>,
    /// Row values, one entry per column.
    pub rows: Vec<Vec<String>>,
}

impl SampleRows {
    /// Whether any rows were captured.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Key values present in one dataset but missing from its counterpart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrphanFinding {
    /// Display direction, e.g. `"orders → customers"`.
    pub direction: String,
    /// Dataset holding the orphan values.
    pub source: String,
    /// Dataset the values are missing from.
    pub target: String,
    /// Join candidate label the check ran on.
    pub key: String,
    /// Number of distinct orphan values.
    pub orphan_count: usize,
    /// Orphan count as a share of the source dataset's total row count.
    pub pct_of_source: f64,
    /// Up to 5 example values, lexicographically sorted.
    pub example_values: Vec<String>,
    /// Up to 3 source rows matching the example values.
    pub sample_rows: SampleRows,
}

impl OrphanFinding {
    /// Severity from the share of affected source rows.
    pub fn severity(&self) -> Severity {
        if self.pct_of_source > 30.0 {
            Severity::Critical
        } else if self.pct_of_source > 10.0 {
            Severity::High
        } else {
            Severity::Medium
        }
    }
}

/// One entity name registered under several identifiers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DuplicateGroup {
    /// The shared name value.
    pub name: String,
    /// Up to 6 of the identifiers it appears with, in first-appearance order.
    pub appears_with_ids: Vec<String>,
    /// Total distinct identifiers for this name.
    pub id_count: usize,
}

/// Two name values similar enough to be the same entity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FuzzyNamePair {
    pub value_a: String,
    pub value_b: String,
    /// Similarity ratio, rounded to 2 decimals; always in (0.85, 1.0).
    pub similarity: f64,
}

/// Which duplicate pattern was detected, with its examples.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DuplicateKind {
    /// Identical name values carrying different identifiers.
    SameNameMultipleIds {
        /// Up to 5 worst groups, most identifiers first.
        groups: Vec<DuplicateGroup>,
    },
    /// Nearly identical name spellings, probably the same entity.
    FuzzyName {
        /// Up to 5 example pairs.
        pairs: Vec<FuzzyNamePair>,
    },
}

impl DuplicateKind {
    /// Get a human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            DuplicateKind::SameNameMultipleIds { .. } => "Same name, multiple IDs",
            DuplicateKind::FuzzyName { .. } => "Fuzzy name duplicates (likely same entity)",
        }
    }
}

/// Duplicate entities detected within one dataset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DuplicateFinding {
    /// Dataset the duplicates live in.
    pub dataset: String,
    /// Total offending groups or pairs (not capped at the example limit).
    pub duplicate_count: usize,
    /// The duplicate pattern and its examples.
    #[serde(flatten)]
    pub kind: DuplicateKind,
}

impl DuplicateFinding {
    /// Severity from the number of affected entities.
    pub fn severity(&self) -> Severity {
        if self.duplicate_count > 10 {
            Severity::Critical
        } else {
            Severity::High
        }
    }
}

/// Records that entered an upstream stage but never reached the next one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GapFinding {
    /// Upstream dataset.
    pub stage_from: String,
    /// Downstream dataset.
    pub stage_to: String,
    /// Join candidate label the check ran on.
    pub key: String,
    /// Number of distinct upstream values missing downstream.
    pub missing_count: usize,
    /// Missing count as a share of the distinct upstream identifier count.
    pub pct_of_upstream: f64,
    /// Up to 5 example ids, lexicographically sorted.
    pub example_ids: Vec<String>,
    /// Up to 3 upstream rows matching the example ids.
    pub sample_rows: SampleRows,
}

impl GapFinding {
    /// Severity from the share of stalled upstream records.
    pub fn severity(&self) -> Severity {
        if self.pct_of_upstream > 20.0 {
            Severity::Critical
        } else if self.pct_of_upstream > 5.0 {
            Severity::High
        } else {
            Severity::Medium
        }
    }
}

/// Any finding from the three integration checks.
///
/// The common accessors let scoring and reporting treat findings uniformly
/// without matching on the variant.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "check", rename_all = "snake_case")]
pub enum Finding {
    Orphan(OrphanFinding),
    Duplicate(DuplicateFinding),
    Gap(GapFinding),
}

impl Finding {
    /// Severity of the underlying finding.
    pub fn severity(&self) -> Severity {
        match self {
            Finding::Orphan(f) => f.severity(),
            Finding::Duplicate(f) => f.severity(),
            Finding::Gap(f) => f.severity(),
        }
    }

    /// Number of affected values, groups, or records.
    pub fn affected_count(&self) -> usize {
        match self {
            Finding::Orphan(f) => f.orphan_count,
            Finding::Duplicate(f) => f.duplicate_count,
            Finding::Gap(f) => f.missing_count,
        }
    }

    /// Percentage against the check's own denominator. Duplicate findings
    /// have no percentage base.
    pub fn percentage(&self) -> Option<f64> {
        match self {
            Finding::Orphan(f) => Some(f.pct_of_source),
            Finding::Duplicate(_) => None,
            Finding::Gap(f) => Some(f.pct_of_upstream),
        }
    }

    /// Example values for display.
    pub fn example_values(&self) -> Vec<String> {
        match self {
            Finding::Orphan(f) => f.example_values.clone(),
            Finding::Duplicate(f) => match &f.kind {
                DuplicateKind::SameNameMultipleIds { groups } => {
                    groups.iter().map(|g| g.name.clone()).collect()
                }
                DuplicateKind::FuzzyName { pairs } => pairs
                    .iter()
                    .map(|p| format!("{} ≈ {}", p.value_a, p.value_b))
                    .collect(),
            },
            Finding::Gap(f) => f.example_ids.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn orphan(pct: f64) -> OrphanFinding {
        OrphanFinding {
            direction: "orders → customers".to_string(),
            source: "orders".to_string(),
            target: "customers".to_string(),
            key: "customer_id".to_string(),
            orphan_count: 20,
            pct_of_source: pct,
            example_values: vec!["100".to_string(), "81".to_string()],
            sample_rows: SampleRows {
                columns: vec!["customer_id".to_string()],
                rows: vec![],
            },
        }
    }

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Low < Severity::Medium);
        assert!(Severity::Medium < Severity::High);
        assert!(Severity::High < Severity::Critical);
    }

    #[test]
    fn test_orphan_severity_thresholds() {
        assert_eq!(orphan(35.0).severity(), Severity::Critical);
        assert_eq!(orphan(30.0).severity(), Severity::High);
        assert_eq!(orphan(10.0).severity(), Severity::Medium);
    }

    #[test]
    fn test_duplicate_severity_thresholds() {
        let finding = DuplicateFinding {
            dataset: "customers".to_string(),
            duplicate_count: 11,
            kind: DuplicateKind::SameNameMultipleIds { groups: vec![] },
        };
        assert_eq!(finding.severity(), Severity::Critical);

        let finding = DuplicateFinding {
            duplicate_count: 3,
            ..finding
        };
        assert_eq!(finding.severity(), Severity::High);
    }

    #[test]
    fn test_finding_accessors() {
        let finding = Finding::Orphan(orphan(20.0));
        assert_eq!(finding.affected_count(), 20);
        assert_eq!(finding.percentage(), Some(20.0));
        assert_eq!(finding.example_values(), vec!["100", "81"]);

        let finding = Finding::Duplicate(DuplicateFinding {
            dataset: "customers".to_string(),
            duplicate_count: 2,
            kind: DuplicateKind::FuzzyName {
                pairs: vec![FuzzyNamePair {
                    value_a: "John Smith".to_string(),
                    value_b: "Jon Smith".to_string(),
                    similarity: 0.95,
                }],
            },
        });
        assert_eq!(finding.percentage(), None);
        assert_eq!(finding.example_values(), vec!["John Smith ≈ Jon Smith"]);
    }

    #[test]
    fn test_finding_serializes_with_check_tag() {
        let finding = Finding::Orphan(orphan(20.0));
        let json = serde_json::to_value(&finding).unwrap();
        assert_eq!(json["check"], "orphan");
        assert_eq!(json["orphan_count"], 20);

        let finding = Finding::Duplicate(DuplicateFinding {
            dataset: "customers".to_string(),
            duplicate_count: 1,
            kind: DuplicateKind::SameNameMultipleIds {
                groups: vec![DuplicateGroup {
                    name: "Acme Corp".to_string(),
                    appears_with_ids: vec!["1".to_string(), "5".to_string()],
                    id_count: 2,
                }],
            },
        });
        let json = serde_json::to_value(&finding).unwrap();
        assert_eq!(json["check"], "duplicate");
        assert_eq!(json["type"], "same_name_multiple_ids");
        assert_eq!(json["groups"][0]["appears_with_ids"][0], "1");
    }
}
