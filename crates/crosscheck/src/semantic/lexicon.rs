//! Static pattern tables shared across the engine.
//!
//! All lexicons are process-wide constants, compiled once and never mutated.

use once_cell::sync::Lazy;
use regex::Regex;

use super::column::SemanticType;

/// Identifier-like column names, used for join-key discovery and for picking
/// the identifier column during deduplication. Suffix-anchored.
pub static JOIN_ID_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(id|_id|key|code|num|number|ref)$").unwrap());

/// Name-like column names, used for picking the entity-name column during
/// deduplication. Substring match.
pub static NAME_COLUMN_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(name|customer|client|company|vendor|supplier|product)").unwrap()
});

/// Ordered column-type lexicons; the first matching entry wins.
pub static COLUMN_TYPE_PATTERNS: Lazy<Vec<(SemanticType, Regex)>> = Lazy::new(|| {
    vec![
        (
            SemanticType::Identifier,
            Regex::new(r"(?i)(^id$|_id$|_key$|_code$|_ref$|_no$|_num$|_number$|reference)")
                .unwrap(),
        ),
        (
            SemanticType::Monetary,
            Regex::new(
                r"(?i)(amount|price|cost|revenue|salary|fee|total|value|budget|income|spend|charge|payment)",
            )
            .unwrap(),
        ),
        (
            SemanticType::Temporal,
            Regex::new(r"(?i)(date|time|created|updated|modified|timestamp|_at$|_on$)").unwrap(),
        ),
        (
            SemanticType::Status,
            Regex::new(r"(?i)(status|state|stage|flag|type|category|kind|mode|phase)").unwrap(),
        ),
        (
            SemanticType::Personal,
            Regex::new(r"(?i)(name|email|phone|mobile|address|contact|first_name|last_name|full_name)")
                .unwrap(),
        ),
        (
            SemanticType::Geographic,
            Regex::new(r"(?i)(city|country|region|state|zip|postal|province|lat|lon|location|territory)")
                .unwrap(),
        ),
        (
            SemanticType::Quantity,
            Regex::new(r"(?i)(qty|quantity|count|stock|inventory|units|volume)").unwrap(),
        ),
    ]
});

/// Workflow stage vocabulary, in upstream-to-downstream priority order.
/// Dataset names are ranked by the first keyword they contain.
pub const STAGE_KEYWORDS: &[&str] = &[
    "order", "lead", "request", "invoice", "claim", "payment", "shipment", "delivery", "report",
    "event",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_id_pattern_is_suffix_anchored() {
        assert!(JOIN_ID_PATTERN.is_match("customer_id"));
        assert!(JOIN_ID_PATTERN.is_match("id"));
        assert!(JOIN_ID_PATTERN.is_match("product_code"));
        assert!(JOIN_ID_PATTERN.is_match("invoice_number"));
        assert!(JOIN_ID_PATTERN.is_match("order_ref"));
        assert!(!JOIN_ID_PATTERN.is_match("id_description"));
        assert!(!JOIN_ID_PATTERN.is_match("amount"));
    }

    #[test]
    fn test_name_pattern_matches_substrings() {
        assert!(NAME_COLUMN_PATTERN.is_match("customer_name"));
        assert!(NAME_COLUMN_PATTERN.is_match("company"));
        assert!(NAME_COLUMN_PATTERN.is_match("vendor_label"));
        assert!(!NAME_COLUMN_PATTERN.is_match("amount"));
    }

    #[test]
    fn test_stage_keywords_priority_order() {
        assert_eq!(STAGE_KEYWORDS[0], "order");
        assert_eq!(STAGE_KEYWORDS[STAGE_KEYWORDS.len() - 1], "event");
        assert_eq!(STAGE_KEYWORDS.len(), 10);
    }
}
