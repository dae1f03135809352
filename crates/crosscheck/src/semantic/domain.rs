//! Run-wide business domain inference.

use serde::{Deserialize, Serialize};

use crate::input::DatasetCollection;

/// Business domain of the whole collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BusinessDomain {
    Ecommerce,
    Crm,
    Finance,
    Hr,
    Marketing,
    Operations,
    /// No domain signal matched anywhere.
    #[default]
    GeneralBusiness,
}

impl BusinessDomain {
    /// Get a human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            BusinessDomain::Ecommerce => "E-commerce",
            BusinessDomain::Crm => "CRM",
            BusinessDomain::Finance => "Finance",
            BusinessDomain::Hr => "HR",
            BusinessDomain::Marketing => "Marketing",
            BusinessDomain::Operations => "Operations",
            BusinessDomain::GeneralBusiness => "General Business",
        }
    }

    /// Typical process flow for the domain, for narrative display.
    pub fn process_flow(&self) -> &'static str {
        match self {
            BusinessDomain::Ecommerce => "order → fulfillment → invoice → payment",
            BusinessDomain::Crm => "lead → opportunity → deal → closed-won",
            BusinessDomain::Finance => "transaction → reconciliation → ledger → report",
            BusinessDomain::Hr => "hire → onboard → payroll → review",
            BusinessDomain::Marketing => "impression → click → lead → conversion",
            BusinessDomain::Operations => "request → dispatch → delivery → confirmation",
            BusinessDomain::GeneralBusiness => "upstream → processing → downstream",
        }
    }
}

/// Domain signal terms, in priority order. Ties resolve to the earlier entry.
const DOMAIN_SIGNALS: &[(BusinessDomain, &[&str])] = &[
    (
        BusinessDomain::Ecommerce,
        &["order", "product", "cart", "shipment", "customer", "invoice", "sku"],
    ),
    (
        BusinessDomain::Crm,
        &["lead", "opportunity", "deal", "contact", "account", "pipeline", "prospect"],
    ),
    (
        BusinessDomain::Finance,
        &["invoice", "payment", "ledger", "account", "transaction", "budget", "revenue"],
    ),
    (
        BusinessDomain::Hr,
        &["employee", "department", "payroll", "salary", "hire", "staff", "leave"],
    ),
    (
        BusinessDomain::Marketing,
        &["campaign", "lead", "conversion", "impression", "click", "ad", "promo"],
    ),
    (
        BusinessDomain::Operations,
        &["shipment", "delivery", "inventory", "warehouse", "dispatch", "supplier"],
    ),
];

/// Confidence reported when nothing matched and the generic domain is used.
const FALLBACK_CONFIDENCE: f64 = 0.3;

/// An inferred domain with its confidence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainInference {
    /// The winning domain.
    pub domain: BusinessDomain,
    /// Share of matched signals belonging to the winner, 0.0-1.0.
    pub confidence: f64,
}

/// Infer the business domain across every dataset name and column name.
///
/// Each domain scores one point per signal term present anywhere in the
/// combined text; confidence is the winner's share of all matched signals.
pub fn infer_domain(collection: &DatasetCollection) -> DomainInference {
    let all_text = collection
        .iter()
        .map(|d| format!("{} {}", d.name, d.columns.join(" ")))
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();

    let mut total = 0usize;
    let mut best_domain = BusinessDomain::GeneralBusiness;
    let mut best_score = 0usize;

    // Strict comparison keeps ties on the earlier-listed domain
    for (domain, signals) in DOMAIN_SIGNALS {
        let score = signals.iter().filter(|s| all_text.contains(*s)).count();
        total += score;
        if score > best_score {
            best_score = score;
            best_domain = *domain;
        }
    }

    if best_score == 0 {
        return DomainInference {
            domain: BusinessDomain::GeneralBusiness,
            confidence: FALLBACK_CONFIDENCE,
        };
    }

    let confidence = best_score as f64 / total as f64;
    DomainInference {
        domain: best_domain,
        confidence: (confidence * 100.0).round() / 100.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Dataset;

    fn collection_of(specs: &[(&str, &[&str])]) -> DatasetCollection {
        DatasetCollection::from_datasets(specs.iter().map(|(name, columns)| {
            Dataset::new(
                *name,
                columns.iter().map(|c| c.to_string()).collect(),
                vec![columns.iter().map(|_| "x".to_string()).collect()],
            )
        }))
    }

    #[test]
    fn test_ecommerce_detection() {
        let collection = collection_of(&[
            ("orders", &["order_id", "customer_id", "amount"]),
            ("products", &["sku", "price"]),
        ]);
        let inference = infer_domain(&collection);
        assert_eq!(inference.domain, BusinessDomain::Ecommerce);
        assert!(inference.confidence > 0.0 && inference.confidence <= 1.0);
    }

    #[test]
    fn test_hr_detection() {
        let collection = collection_of(&[("employees", &["employee_id", "salary", "department"])]);
        let inference = infer_domain(&collection);
        assert_eq!(inference.domain, BusinessDomain::Hr);
    }

    #[test]
    fn test_fallback_when_no_signal() {
        let collection = collection_of(&[("alpha", &["x", "y"]), ("beta", &["z"])]);
        let inference = infer_domain(&collection);
        assert_eq!(inference.domain, BusinessDomain::GeneralBusiness);
        assert_eq!(inference.confidence, 0.3);
    }

    #[test]
    fn test_ties_resolve_to_earlier_domain() {
        // "invoice" and "payment" score Finance 2; "invoice" + "customer"
        // score E-commerce 2; E-commerce is listed first.
        let collection = collection_of(&[("invoices", &["payment_ref", "customer_no"])]);
        let inference = infer_domain(&collection);
        assert_eq!(inference.domain, BusinessDomain::Ecommerce);
    }
}
