//! Per-dataset entity kind detection.

use serde::{Deserialize, Serialize};

use crate::input::Dataset;

/// The real-world entity a dataset most likely represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Customer,
    Order,
    Invoice,
    Payment,
    Product,
    Employee,
    Lead,
    Campaign,
    Event,
    Shipment,
    /// No entity signal matched.
    #[default]
    Dataset,
}

impl EntityKind {
    /// Get a human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            EntityKind::Customer => "customer",
            EntityKind::Order => "order",
            EntityKind::Invoice => "invoice",
            EntityKind::Payment => "payment",
            EntityKind::Product => "product",
            EntityKind::Employee => "employee",
            EntityKind::Lead => "lead",
            EntityKind::Campaign => "campaign",
            EntityKind::Event => "event",
            EntityKind::Shipment => "shipment",
            EntityKind::Dataset => "dataset",
        }
    }
}

/// Entity signal terms, in priority order. Ties resolve to the earlier entry.
const ENTITY_SIGNALS: &[(EntityKind, &[&str])] = &[
    (
        EntityKind::Customer,
        &["customer", "client", "user", "contact", "account", "person", "buyer"],
    ),
    (
        EntityKind::Order,
        &["order", "purchase", "sale", "cart", "booking", "reservation"],
    ),
    (EntityKind::Invoice, &["invoice", "bill", "receipt", "statement"]),
    (
        EntityKind::Payment,
        &["payment", "charge", "refund", "transaction", "transfer"],
    ),
    (
        EntityKind::Product,
        &["product", "item", "sku", "catalog", "listing", "merchandise"],
    ),
    (
        EntityKind::Employee,
        &["employee", "staff", "worker", "personnel", "hr", "payroll"],
    ),
    (EntityKind::Lead, &["lead", "prospect", "opportunity", "pipeline"]),
    (
        EntityKind::Campaign,
        &["campaign", "marketing", "promo", "ad", "impression"],
    ),
    (
        EntityKind::Event,
        &["event", "log", "activity", "action", "audit", "track"],
    ),
    (
        EntityKind::Shipment,
        &["shipment", "delivery", "shipping", "dispatch", "fulfillment"],
    ),
];

/// Weight of a dataset-name match relative to a single column-name occurrence.
const NAME_MATCH_WEIGHT: usize = 3;

/// Detect what real-world entity a dataset represents.
///
/// Each signal term scores 3 when it appears in the dataset name, plus one
/// per occurrence across the column names. All-zero scores fall back to the
/// generic [`EntityKind::Dataset`].
pub fn detect_entity(dataset: &Dataset) -> EntityKind {
    let name_lower = dataset.name.to_lowercase();
    let cols_lower = dataset.columns.join(" ").to_lowercase();

    let mut best = EntityKind::Dataset;
    let mut best_score = 0usize;

    for (kind, signals) in ENTITY_SIGNALS {
        let mut score = 0usize;
        for signal in *signals {
            if name_lower.contains(signal) {
                score += NAME_MATCH_WEIGHT;
            }
            score += cols_lower.matches(signal).count();
        }
        if score > best_score {
            best_score = score;
            best = *kind;
        }
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dataset_with(name: &str, columns: &[&str]) -> Dataset {
        Dataset::new(
            name,
            columns.iter().map(|c| c.to_string()).collect(),
            vec![columns.iter().map(|_| "x".to_string()).collect()],
        )
    }

    #[test]
    fn test_detect_by_dataset_name() {
        let dataset = dataset_with("customers", &["id", "full_name"]);
        assert_eq!(detect_entity(&dataset), EntityKind::Customer);
    }

    #[test]
    fn test_detect_by_column_signals() {
        let dataset = dataset_with("export_2024", &["invoice_number", "bill_to", "statement_date"]);
        assert_eq!(detect_entity(&dataset), EntityKind::Invoice);
    }

    #[test]
    fn test_name_match_outweighs_single_column() {
        // One "shipment" column vs the dataset being named after orders.
        let dataset = dataset_with("orders", &["id", "shipment_ref"]);
        assert_eq!(detect_entity(&dataset), EntityKind::Order);
    }

    #[test]
    fn test_no_signal_falls_back_to_generic() {
        let dataset = dataset_with("misc", &["alpha", "beta"]);
        assert_eq!(detect_entity(&dataset), EntityKind::Dataset);
    }
}
