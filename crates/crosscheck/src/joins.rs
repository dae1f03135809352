//! Join-key discovery between datasets.
//!
//! No declared schema exists, so key relationships are inferred from column
//! names and cardinality. A dataset pair may end up with zero, one, or many
//! candidates; downstream checks take the first usable one rather than
//! ranking them.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::input::{Dataset, DatasetCollection};
use crate::semantic::lexicon::JOIN_ID_PATTERN;
use crate::similarity::similarity_ratio;

/// How a join candidate was discovered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JoinKind {
    /// The same column name appears in both datasets.
    SharedName,
    /// Differently named columns whose names are highly similar.
    FuzzyName,
}

/// An inferred key relationship between two datasets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JoinCandidate {
    /// Display label: the shared column name, or `"colA ↔ colB"` for fuzzy
    /// matches.
    pub label: String,
    /// First dataset of the pair.
    pub dataset_a: String,
    /// Second dataset of the pair.
    pub dataset_b: String,
    /// Key column in `dataset_a`.
    pub column_a: String,
    /// Key column in `dataset_b`.
    pub column_b: String,
    /// How the candidate was discovered.
    pub kind: JoinKind,
}

impl JoinCandidate {
    /// Whether this candidate links the given datasets, in either order.
    pub fn links(&self, a: &str, b: &str) -> bool {
        (self.dataset_a == a && self.dataset_b == b)
            || (self.dataset_a == b && self.dataset_b == a)
    }

    /// The key column belonging to the given dataset, if any.
    pub fn column_for(&self, dataset: &str) -> Option<&str> {
        if self.dataset_a == dataset {
            Some(&self.column_a)
        } else if self.dataset_b == dataset {
            Some(&self.column_b)
        } else {
            None
        }
    }
}

/// Thresholds for join-key discovery.
#[derive(Debug, Clone)]
pub struct JoinConfig {
    /// Minimum distinct-value ratio for a shared column that does not look
    /// like an identifier (exclusive bound).
    pub min_distinct_ratio: f64,
    /// Minimum name-similarity ratio for fuzzy cross-name candidates
    /// (exclusive bound).
    pub fuzzy_name_threshold: f64,
}

impl Default for JoinConfig {
    fn default() -> Self {
        Self {
            min_distinct_ratio: 0.3,
            fuzzy_name_threshold: 0.82,
        }
    }
}

/// Discover join candidates across the collection.
///
/// A column name owned by two or more datasets becomes a candidate for every
/// unordered owner pair when it looks like an identifier or shows high
/// cardinality in at least one owner. Separately, differently-named column
/// pairs with similar names become fuzzy candidates when at least one side
/// looks like an identifier.
pub fn infer_join_candidates(
    collection: &DatasetCollection,
    config: &JoinConfig,
) -> Vec<JoinCandidate> {
    let mut candidates = Vec::new();

    // Map each column name to the datasets carrying it, in collection order
    let mut owners: IndexMap<&str, Vec<&Dataset>> = IndexMap::new();
    for dataset in collection.iter() {
        for column in &dataset.columns {
            owners.entry(column.as_str()).or_default().push(dataset);
        }
    }

    for (column, datasets) in &owners {
        if datasets.len() < 2 {
            continue;
        }

        let looks_like_id = JOIN_ID_PATTERN.is_match(column);
        let high_cardinality = datasets.iter().any(|dataset| {
            dataset
                .column_index(column)
                .map(|index| {
                    dataset.distinct_count(index) as f64
                        > config.min_distinct_ratio * dataset.row_count() as f64
                })
                .unwrap_or(false)
        });

        if looks_like_id || high_cardinality {
            for i in 0..datasets.len() {
                for j in (i + 1)..datasets.len() {
                    candidates.push(JoinCandidate {
                        label: column.to_string(),
                        dataset_a: datasets[i].name.clone(),
                        dataset_b: datasets[j].name.clone(),
                        column_a: column.to_string(),
                        column_b: column.to_string(),
                        kind: JoinKind::SharedName,
                    });
                }
            }
        }
    }

    // Fuzzy column-name matching across dataset pairs
    let datasets: Vec<&Dataset> = collection.iter().collect();
    for i in 0..datasets.len() {
        for j in (i + 1)..datasets.len() {
            let (a, b) = (datasets[i], datasets[j]);
            for column_a in &a.columns {
                for column_b in &b.columns {
                    if column_a == column_b {
                        continue; // already caught above
                    }
                    let ratio = similarity_ratio(column_a, column_b);
                    if ratio > config.fuzzy_name_threshold
                        && (JOIN_ID_PATTERN.is_match(column_a)
                            || JOIN_ID_PATTERN.is_match(column_b))
                    {
                        candidates.push(JoinCandidate {
                            label: format!("{column_a} ↔ {column_b}"),
                            dataset_a: a.name.clone(),
                            dataset_b: b.name.clone(),
                            column_a: column_a.clone(),
                            column_b: column_b.clone(),
                            kind: JoinKind::FuzzyName,
                        });
                    }
                }
            }
        }
    }

    candidates
}
