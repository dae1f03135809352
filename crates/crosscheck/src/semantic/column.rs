//! Column semantic typing.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::lexicon::COLUMN_TYPE_PATTERNS;
use crate::input::Dataset;

/// Semantic type of a column, inferred from its name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SemanticType {
    /// Primary or foreign key material.
    Identifier,
    /// Money amounts (prices, fees, revenue).
    Monetary,
    /// Dates, times, audit timestamps.
    Temporal,
    /// Workflow state, category, or flag.
    Status,
    /// Person-related data (names, contact details).
    Personal,
    /// Locations and administrative regions.
    Geographic,
    /// Counts and stock levels.
    Quantity,
    /// No lexicon matched.
    #[default]
    Other,
}

impl SemanticType {
    /// Get a human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            SemanticType::Identifier => "identifier",
            SemanticType::Monetary => "monetary",
            SemanticType::Temporal => "temporal",
            SemanticType::Status => "status",
            SemanticType::Personal => "personal",
            SemanticType::Geographic => "geographic",
            SemanticType::Quantity => "quantity",
            SemanticType::Other => "other",
        }
    }
}

/// Classify a single column name against the ordered lexicons.
///
/// The lexicon order is the priority order: a name matching several lexicons
/// resolves to the earliest one.
pub fn classify_column(name: &str) -> SemanticType {
    for (semantic_type, pattern) in COLUMN_TYPE_PATTERNS.iter() {
        if pattern.is_match(name) {
            return *semantic_type;
        }
    }
    SemanticType::Other
}

/// Classify every column of a dataset, preserving column order.
pub fn classify_columns(dataset: &Dataset) -> IndexMap<String, SemanticType> {
    dataset
        .columns
        .iter()
        .map(|column| (column.clone(), classify_column(column)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_identifier() {
        assert_eq!(classify_column("id"), SemanticType::Identifier);
        assert_eq!(classify_column("customer_id"), SemanticType::Identifier);
        assert_eq!(classify_column("order_key"), SemanticType::Identifier);
        assert_eq!(classify_column("reference"), SemanticType::Identifier);
    }

    #[test]
    fn test_classify_monetary_and_temporal() {
        assert_eq!(classify_column("unit_price"), SemanticType::Monetary);
        assert_eq!(classify_column("total_revenue"), SemanticType::Monetary);
        assert_eq!(classify_column("order_date"), SemanticType::Temporal);
        assert_eq!(classify_column("created_at"), SemanticType::Temporal);
    }

    #[test]
    fn test_priority_order_resolves_overlaps() {
        // "payment_id" is both identifier-like and monetary-like; identifier
        // is listed first and wins.
        assert_eq!(classify_column("payment_id"), SemanticType::Identifier);
        // "state" is both status-like and geographic-like; status wins.
        assert_eq!(classify_column("state"), SemanticType::Status);
    }

    #[test]
    fn test_classify_remaining_types() {
        assert_eq!(classify_column("email"), SemanticType::Personal);
        assert_eq!(classify_column("country"), SemanticType::Geographic);
        assert_eq!(classify_column("qty"), SemanticType::Quantity);
        assert_eq!(classify_column("notes"), SemanticType::Other);
    }

    #[test]
    fn test_classify_columns_preserves_order() {
        let dataset = Dataset::new(
            "orders",
            vec![
                "order_id".to_string(),
                "amount".to_string(),
                "notes".to_string(),
            ],
            vec![vec!["1".to_string(), "10".to_string(), "x".to_string()]],
        );

        let types = classify_columns(&dataset);
        let keys: Vec<&String> = types.keys().collect();
        assert_eq!(keys, vec!["order_id", "amount", "notes"]);
        assert_eq!(types["order_id"], SemanticType::Identifier);
        assert_eq!(types["amount"], SemanticType::Monetary);
        assert_eq!(types["notes"], SemanticType::Other);
    }
}
