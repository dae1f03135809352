//! Duplicate entity detection within a single dataset: the same name under
//! several identifiers, and near-identical name spellings.

use indexmap::{IndexMap, IndexSet};

use crate::input::{Dataset, DatasetCollection};
use crate::semantic::lexicon::{JOIN_ID_PATTERN, NAME_COLUMN_PATTERN};
use crate::similarity::similarity_ratio;

use super::finding::{DuplicateFinding, DuplicateGroup, DuplicateKind, FuzzyNamePair};

const MAX_GROUPS: usize = 5;
const MAX_GROUP_IDS: usize = 6;
const MAX_PAIRS: usize = 5;

/// Tuning knobs for fuzzy name comparison.
///
/// The scan is windowed over lexicographically sorted names, so only
/// spellings that sort near each other are compared. That keeps the pass
/// linear-ish while still catching typo-distance variants.
#[derive(Debug, Clone)]
pub struct DedupeConfig {
    /// Cap on distinct names fed into the fuzzy scan.
    pub max_distinct_names: usize,
    /// How many sorted neighbors each name is compared against.
    pub window: usize,
    /// Skip pairs whose lengths differ by more than this many characters.
    pub max_length_delta: usize,
    /// Exclusive lower bound for flagging a pair. Exact matches (ratio 1.0)
    /// are never flagged; identical spellings are not fuzzy duplicates.
    pub min_similarity: f64,
}

impl Default for DedupeConfig {
    fn default() -> Self {
        DedupeConfig {
            max_distinct_names: 5000,
            window: 30,
            max_length_delta: 8,
            min_similarity: 0.85,
        }
    }
}

/// Run both duplicate checks over every dataset that has an identifier
/// column and a separate name-like column. Datasets missing either column
/// are skipped.
pub fn check_duplicates(
    collection: &DatasetCollection,
    config: &DedupeConfig,
) -> Vec<DuplicateFinding> {
    let mut findings = Vec::new();

    for dataset in collection.iter() {
        let id_idx = dataset
            .columns
            .iter()
            .position(|c| JOIN_ID_PATTERN.is_match(c));
        let name_idx = dataset
            .columns
            .iter()
            .position(|c| NAME_COLUMN_PATTERN.is_match(c) && !JOIN_ID_PATTERN.is_match(c));
        let (Some(id_idx), Some(name_idx)) = (id_idx, name_idx) else {
            continue;
        };

        if let Some(finding) = exact_duplicates(dataset, id_idx, name_idx) {
            findings.push(finding);
        }
        if let Some(finding) = fuzzy_duplicates(dataset, name_idx, config) {
            findings.push(finding);
        }
    }

    findings
}

/// Group rows by name and flag names that carry more than one distinct
/// non-null identifier.
fn exact_duplicates(dataset: &Dataset, id_idx: usize, name_idx: usize) -> Option<DuplicateFinding> {
    let mut ids_by_name: IndexMap<&str, IndexSet<&str>> = IndexMap::new();
    for row in &dataset.rows {
        let Some(name) = row.get(name_idx).map(String::as_str) else {
            continue;
        };
        if Dataset::is_null_value(name) {
            continue;
        }
        let ids = ids_by_name.entry(name).or_default();
        if let Some(id) = row.get(id_idx).map(String::as_str) {
            if !Dataset::is_null_value(id) {
                ids.insert(id);
            }
        }
    }

    let mut offenders: Vec<(&str, &IndexSet<&str>)> = ids_by_name
        .iter()
        .filter(|(_, ids)| ids.len() > 1)
        .map(|(name, ids)| (*name, ids))
        .collect();
    if offenders.is_empty() {
        return None;
    }

    // Worst groups first; ties resolve to lexicographic name order.
    offenders.sort_by(|a, b| b.1.len().cmp(&a.1.len()).then_with(|| a.0.cmp(b.0)));

    let groups: Vec<DuplicateGroup> = offenders
        .iter()
        .take(MAX_GROUPS)
        .map(|(name, ids)| DuplicateGroup {
            name: name.to_string(),
            appears_with_ids: ids
                .iter()
                .take(MAX_GROUP_IDS)
                .map(|id| id.to_string())
                .collect(),
            id_count: ids.len(),
        })
        .collect();

    Some(DuplicateFinding {
        dataset: dataset.name.clone(),
        duplicate_count: offenders.len(),
        kind: DuplicateKind::SameNameMultipleIds { groups },
    })
}

/// Compare distinct names against their sorted neighbors and flag pairs
/// whose lowercased similarity clears the threshold without being exact.
fn fuzzy_duplicates(
    dataset: &Dataset,
    name_idx: usize,
    config: &DedupeConfig,
) -> Option<DuplicateFinding> {
    let mut names: Vec<&str> = dataset
        .distinct_values(name_idx)
        .into_iter()
        .take(config.max_distinct_names)
        .collect();
    names.sort_unstable();

    let mut pairs = Vec::new();
    for i in 0..names.len() {
        let len_i = names[i].chars().count();
        for j in (i + 1)..names.len().min(i + config.window) {
            let len_j = names[j].chars().count();
            if len_i.abs_diff(len_j) > config.max_length_delta {
                continue;
            }
            let ratio =
                similarity_ratio(&names[i].to_lowercase(), &names[j].to_lowercase());
            if ratio > config.min_similarity && ratio < 1.0 {
                pairs.push(FuzzyNamePair {
                    value_a: names[i].to_string(),
                    value_b: names[j].to_string(),
                    similarity: round2(ratio),
                });
            }
        }
    }

    if pairs.is_empty() {
        return None;
    }

    let total = pairs.len();
    pairs.truncate(MAX_PAIRS);
    Some(DuplicateFinding {
        dataset: dataset.name.clone(),
        duplicate_count: total,
        kind: DuplicateKind::FuzzyName { pairs },
    })
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_dataset(name: &str, rows: &[(&str, &str)]) -> Dataset {
        Dataset::new(
            name,
            vec!["customer_id".to_string(), "customer_name".to_string()],
            rows.iter()
                .map(|(id, name)| vec![id.to_string(), name.to_string()])
                .collect(),
        )
    }

    fn collection_of(dataset: Dataset) -> DatasetCollection {
        let mut collection = DatasetCollection::new();
        collection.insert(dataset);
        collection
    }

    #[test]
    fn test_same_name_multiple_ids() {
        let collection = collection_of(make_dataset(
            "customers",
            &[
                ("1", "Acme Corp"),
                ("2", "Globex"),
                ("5", "Acme Corp"),
                ("3", "Initech"),
            ],
        ));

        let findings = check_duplicates(&collection, &DedupeConfig::default());
        let exact = findings
            .iter()
            .find(|f| matches!(f.kind, DuplicateKind::SameNameMultipleIds { .. }))
            .unwrap();
        assert_eq!(exact.duplicate_count, 1);
        let DuplicateKind::SameNameMultipleIds { groups } = &exact.kind else {
            panic!("expected exact duplicates");
        };
        assert_eq!(groups[0].name, "Acme Corp");
        assert_eq!(groups[0].appears_with_ids, vec!["1", "5"]);
        assert_eq!(groups[0].id_count, 2);
    }

    #[test]
    fn test_same_name_same_id_not_flagged() {
        let collection = collection_of(make_dataset(
            "customers",
            &[("1", "Acme Corp"), ("1", "Acme Corp"), ("2", "Globex")],
        ));

        let findings = check_duplicates(&collection, &DedupeConfig::default());
        assert!(findings.is_empty());
    }

    #[test]
    fn test_groups_sorted_by_id_count_then_name() {
        let collection = collection_of(make_dataset(
            "customers",
            &[
                ("1", "Zeta"),
                ("2", "Zeta"),
                ("3", "Alpha"),
                ("4", "Alpha"),
                ("5", "Mid"),
                ("6", "Mid"),
                ("7", "Mid"),
            ],
        ));

        let findings = check_duplicates(&collection, &DedupeConfig::default());
        let DuplicateKind::SameNameMultipleIds { groups } = &findings[0].kind else {
            panic!("expected exact duplicates");
        };
        let names: Vec<&str> = groups.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, vec!["Mid", "Alpha", "Zeta"]);
    }

    #[test]
    fn test_fuzzy_name_variants() {
        let collection = collection_of(make_dataset(
            "customers",
            &[
                ("1", "John Smith"),
                ("2", "Jon Smith"),
                ("3", "Mary Jones"),
            ],
        ));

        let findings = check_duplicates(&collection, &DedupeConfig::default());
        let fuzzy = findings
            .iter()
            .find(|f| matches!(f.kind, DuplicateKind::FuzzyName { .. }))
            .unwrap();
        assert_eq!(fuzzy.duplicate_count, 1);
        let DuplicateKind::FuzzyName { pairs } = &fuzzy.kind else {
            panic!("expected fuzzy duplicates");
        };
        assert_eq!(pairs[0].value_a, "John Smith");
        assert_eq!(pairs[0].value_b, "Jon Smith");
        assert!(pairs[0].similarity > 0.85 && pairs[0].similarity < 1.0);
    }

    #[test]
    fn test_case_variants_are_exact_not_fuzzy() {
        // Lowercased ratio is exactly 1.0, which the fuzzy check excludes.
        let collection = collection_of(make_dataset(
            "customers",
            &[("1", "ACME Corp"), ("2", "acme corp")],
        ));

        let findings = check_duplicates(&collection, &DedupeConfig::default());
        assert!(
            !findings
                .iter()
                .any(|f| matches!(f.kind, DuplicateKind::FuzzyName { .. }))
        );
    }

    #[test]
    fn test_length_delta_skips_pair() {
        // This pair clears the ratio threshold, so only the length gate can
        // suppress it.
        let rows = [("1", "Acme Holdings"), ("2", "Acme Holdings Co")];

        let tight = DedupeConfig {
            max_length_delta: 2,
            ..DedupeConfig::default()
        };
        let findings = check_duplicates(&collection_of(make_dataset("customers", &rows)), &tight);
        assert!(
            !findings
                .iter()
                .any(|f| matches!(f.kind, DuplicateKind::FuzzyName { .. }))
        );

        let findings = check_duplicates(
            &collection_of(make_dataset("customers", &rows)),
            &DedupeConfig::default(),
        );
        assert!(
            findings
                .iter()
                .any(|f| matches!(f.kind, DuplicateKind::FuzzyName { .. }))
        );
    }

    #[test]
    fn test_skips_dataset_without_name_column() {
        let dataset = Dataset::new(
            "events",
            vec!["event_id".to_string(), "ts".to_string()],
            vec![vec!["1".to_string(), "2024-01-01".to_string()]],
        );
        let findings = check_duplicates(&collection_of(dataset), &DedupeConfig::default());
        assert!(findings.is_empty());
    }

    #[test]
    fn test_name_column_must_not_look_like_id() {
        // customer_id matches both patterns and must not be picked as the
        // name column; with no other name-like column the dataset is skipped.
        let dataset = Dataset::new(
            "customers",
            vec!["customer_id".to_string(), "city".to_string()],
            vec![vec!["1".to_string(), "Omaha".to_string()]],
        );
        let findings = check_duplicates(&collection_of(dataset), &DedupeConfig::default());
        assert!(findings.is_empty());
    }
}
