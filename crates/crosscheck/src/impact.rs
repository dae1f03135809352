//! Financial impact estimation for findings.
//!
//! When the data carries a monetary signal, findings are priced against the
//! average transaction value; otherwise the estimate falls back to record
//! counts so reports always have something concrete to show.

use serde::{Deserialize, Serialize};

use crate::checks::{DuplicateFinding, GapFinding, OrphanFinding};
use crate::input::{normalize_column_name, Dataset, DatasetCollection};
use crate::semantic::{SemanticType, classify_column};

const MAX_ORPHAN_ITEMS: usize = 2;

/// Duplicates overstate value less directly than lost records do.
const DUPLICATE_VALUE_FACTOR: f64 = 0.4;

/// Explicit "this column holds the money" override, bypassing the
/// column classifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueColumn {
    pub dataset: String,
    pub column: String,
}

impl ValueColumn {
    /// Parse a `dataset.column` argument. The column part is taken after
    /// the first dot.
    pub fn parse(raw: &str) -> Option<ValueColumn> {
        let (dataset, column) = raw.split_once('.')?;
        if dataset.is_empty() || column.is_empty() {
            return None;
        }
        Some(ValueColumn {
            dataset: dataset.to_string(),
            column: column.to_string(),
        })
    }
}

/// One priced (or counted) line in the impact estimate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImpactItem {
    pub label: String,
    pub count: usize,
    /// Estimated value at risk; `None` when no monetary signal exists.
    pub value: Option<f64>,
    pub risk: String,
}

/// The assembled impact estimate for a run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImpactEstimate {
    pub has_monetary_signal: bool,
    /// Average transaction value the items were priced against.
    pub avg_value: Option<f64>,
    pub items: Vec<ImpactItem>,
    /// Sum of all item values; `None` without a monetary signal.
    pub total_value: Option<f64>,
}

/// Price the worst findings against the data's average transaction value.
///
/// The value column override wins when it resolves to a column with a
/// positive mean; otherwise every monetary-classified column contributes
/// its mean. Findings are assumed to be in their check's sort order, so
/// the first entries are the worst.
pub fn estimate_impact(
    collection: &DatasetCollection,
    orphans: &[OrphanFinding],
    duplicates: &[DuplicateFinding],
    gaps: &[GapFinding],
    value_override: Option<&ValueColumn>,
) -> ImpactEstimate {
    let means = monetary_means(collection, value_override);

    if means.is_empty() {
        let items: Vec<ImpactItem> = orphans
            .iter()
            .take(MAX_ORPHAN_ITEMS)
            .map(|f| ImpactItem {
                label: format!("Orphan records — {}", f.direction),
                count: f.orphan_count,
                value: None,
                risk: format!("{} records unaccounted for", f.orphan_count),
            })
            .collect();
        return ImpactEstimate {
            has_monetary_signal: false,
            avg_value: None,
            items,
            total_value: None,
        };
    }

    let avg = means.iter().sum::<f64>() / means.len() as f64;
    let mut items = Vec::new();

    for finding in orphans.iter().take(MAX_ORPHAN_ITEMS) {
        items.push(ImpactItem {
            label: format!("Unlinked records — {}", finding.direction),
            count: finding.orphan_count,
            value: Some(round2(finding.orphan_count as f64 * avg)),
            risk: "Revenue leakage / reporting gap".to_string(),
        });
    }
    if let Some(finding) = duplicates.first() {
        items.push(ImpactItem {
            label: format!("Duplicate entities — '{}'", finding.dataset),
            count: finding.duplicate_count,
            value: Some(round2(
                finding.duplicate_count as f64 * avg * DUPLICATE_VALUE_FACTOR,
            )),
            risk: "Double billing / inflated pipeline risk".to_string(),
        });
    }
    if let Some(finding) = gaps.first() {
        items.push(ImpactItem {
            label: format!("Process gap — {} → {}", finding.stage_from, finding.stage_to),
            count: finding.missing_count,
            value: Some(round2(finding.missing_count as f64 * avg)),
            risk: "Stalled workflow / SLA breach".to_string(),
        });
    }

    let total: f64 = items.iter().filter_map(|i| i.value).sum();
    ImpactEstimate {
        has_monetary_signal: true,
        avg_value: Some(round2(avg)),
        items,
        total_value: Some(round2(total)),
    }
}

/// Collect the positive column means that establish the monetary signal.
fn monetary_means(collection: &DatasetCollection, value_override: Option<&ValueColumn>) -> Vec<f64> {
    if let Some(vc) = value_override {
        // Loaded headers are normalized, so the override gets the same
        // treatment before lookup.
        let column = normalize_column_name(&vc.column);
        if let Some(mean) = collection
            .get(&vc.dataset)
            .and_then(|d| d.column_index(&column).and_then(|idx| column_mean(d, idx)))
        {
            if mean > 0.0 {
                return vec![mean];
            }
        }
    }

    let mut means = Vec::new();
    for dataset in collection.iter() {
        for (idx, column) in dataset.columns.iter().enumerate() {
            if classify_column(column) != SemanticType::Monetary {
                continue;
            }
            if let Some(mean) = column_mean(dataset, idx) {
                if mean > 0.0 {
                    means.push(mean);
                }
            }
        }
    }
    means
}

/// Mean of the column's parseable non-null values.
fn column_mean(dataset: &Dataset, idx: usize) -> Option<f64> {
    let values: Vec<f64> = dataset
        .non_null_values(idx)
        .filter_map(|v| v.trim().parse::<f64>().ok())
        .collect();
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checks::SampleRows;

    fn orphan(direction: &str, count: usize, pct: f64) -> OrphanFinding {
        OrphanFinding {
            direction: direction.to_string(),
            source: "orders".to_string(),
            target: "customers".to_string(),
            key: "customer_id".to_string(),
            orphan_count: count,
            pct_of_source: pct,
            example_values: vec![],
            sample_rows: SampleRows {
                columns: vec![],
                rows: vec![],
            },
        }
    }

    fn dataset_with_amounts(name: &str, amounts: &[&str]) -> Dataset {
        Dataset::new(
            name,
            vec!["order_id".to_string(), "amount".to_string()],
            amounts
                .iter()
                .enumerate()
                .map(|(i, a)| vec![(i + 1).to_string(), a.to_string()])
                .collect(),
        )
    }

    #[test]
    fn test_fallback_without_monetary_signal() {
        let collection = DatasetCollection::from_datasets(vec![Dataset::new(
            "orders",
            vec!["order_id".to_string()],
            vec![vec!["1".to_string()]],
        )]);
        let orphans = vec![orphan("orders → customers", 20, 20.0)];

        let estimate = estimate_impact(&collection, &orphans, &[], &[], None);
        assert!(!estimate.has_monetary_signal);
        assert_eq!(estimate.total_value, None);
        assert_eq!(estimate.items.len(), 1);
        assert_eq!(estimate.items[0].label, "Orphan records — orders → customers");
        assert_eq!(estimate.items[0].risk, "20 records unaccounted for");
        assert_eq!(estimate.items[0].value, None);
    }

    #[test]
    fn test_prices_orphans_against_average_value() {
        let collection = DatasetCollection::from_datasets(vec![dataset_with_amounts(
            "orders",
            &["10.0", "20.0", "30.0"],
        )]);
        let orphans = vec![orphan("orders → customers", 5, 50.0)];

        let estimate = estimate_impact(&collection, &orphans, &[], &[], None);
        assert!(estimate.has_monetary_signal);
        assert_eq!(estimate.avg_value, Some(20.0));
        assert_eq!(estimate.items[0].label, "Unlinked records — orders → customers");
        assert_eq!(estimate.items[0].value, Some(100.0));
        assert_eq!(estimate.total_value, Some(100.0));
    }

    #[test]
    fn test_duplicate_factor_discounts_value() {
        use crate::checks::{DuplicateKind, FuzzyNamePair};

        let collection = DatasetCollection::from_datasets(vec![dataset_with_amounts(
            "orders",
            &["100.0"],
        )]);
        let duplicates = vec![DuplicateFinding {
            dataset: "customers".to_string(),
            duplicate_count: 5,
            kind: DuplicateKind::FuzzyName {
                pairs: vec![FuzzyNamePair {
                    value_a: "a".to_string(),
                    value_b: "b".to_string(),
                    similarity: 0.9,
                }],
            },
        }];

        let estimate = estimate_impact(&collection, &[], &duplicates, &[], None);
        // 5 * 100 * 0.4
        assert_eq!(estimate.items[0].value, Some(200.0));
        assert_eq!(estimate.items[0].label, "Duplicate entities — 'customers'");
    }

    #[test]
    fn test_gap_priced_at_full_value() {
        let collection = DatasetCollection::from_datasets(vec![dataset_with_amounts(
            "orders",
            &["50.0"],
        )]);
        let gaps = vec![GapFinding {
            stage_from: "orders".to_string(),
            stage_to: "invoices".to_string(),
            key: "order_id".to_string(),
            missing_count: 3,
            pct_of_upstream: 30.0,
            example_ids: vec![],
            sample_rows: SampleRows {
                columns: vec![],
                rows: vec![],
            },
        }];

        let estimate = estimate_impact(&collection, &[], &[], &gaps, None);
        assert_eq!(estimate.items[0].label, "Process gap — orders → invoices");
        assert_eq!(estimate.items[0].value, Some(150.0));
    }

    #[test]
    fn test_value_override_beats_classifier() {
        // "units" classifies as a quantity, so only the override can make
        // it the monetary column.
        let collection = DatasetCollection::from_datasets(vec![Dataset::new(
            "orders",
            vec!["order_id".to_string(), "units".to_string()],
            vec![
                vec!["1".to_string(), "400.0".to_string()],
                vec!["2".to_string(), "600.0".to_string()],
            ],
        )]);
        let orphans = vec![orphan("orders → customers", 2, 10.0)];
        let vc = ValueColumn::parse("orders.units").unwrap();

        let estimate = estimate_impact(&collection, &orphans, &[], &[], Some(&vc));
        assert!(estimate.has_monetary_signal);
        assert_eq!(estimate.avg_value, Some(500.0));
        assert_eq!(estimate.items[0].value, Some(1000.0));
    }

    #[test]
    fn test_unresolvable_override_falls_back() {
        let collection = DatasetCollection::from_datasets(vec![dataset_with_amounts(
            "orders",
            &["10.0"],
        )]);
        let vc = ValueColumn::parse("orders.nope").unwrap();

        let estimate = estimate_impact(&collection, &[], &[], &[], Some(&vc));
        assert!(estimate.has_monetary_signal);
        assert_eq!(estimate.avg_value, Some(10.0));
    }

    #[test]
    fn test_override_column_is_normalized_before_lookup() {
        // "unit_count" is a quantity, never monetary, so only the override
        // can select it; the raw "Unit Count" spelling must still resolve.
        let collection = DatasetCollection::from_datasets(vec![Dataset::new(
            "orders",
            vec!["order_id".to_string(), "unit_count".to_string()],
            vec![vec!["1".to_string(), "12.0".to_string()]],
        )]);
        let vc = ValueColumn::parse("orders.Unit Count").unwrap();

        let estimate = estimate_impact(&collection, &[], &[], &[], Some(&vc));
        assert!(estimate.has_monetary_signal);
        assert_eq!(estimate.avg_value, Some(12.0));
    }

    #[test]
    fn test_value_column_parse() {
        assert_eq!(
            ValueColumn::parse("orders.amount"),
            Some(ValueColumn {
                dataset: "orders".to_string(),
                column: "amount".to_string(),
            })
        );
        assert_eq!(ValueColumn::parse("orders"), None);
        assert_eq!(ValueColumn::parse(".amount"), None);
    }
}
