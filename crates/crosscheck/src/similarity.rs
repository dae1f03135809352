//! Normalized string similarity used by fuzzy join-key matching and
//! fuzzy entity deduplication.

use rapidfuzz::distance::indel;

/// Similarity ratio between two strings, 0.0-1.0.
///
/// Indel-based: twice the matched character count over the combined length,
/// so single-character typos in short names stay above 0.85 while unrelated
/// names fall well below it. Case-sensitive; callers lowercase first where
/// case must not matter.
pub fn similarity_ratio(a: &str, b: &str) -> f64 {
    indel::normalized_similarity(a.chars(), b.chars())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_strings() {
        assert_eq!(similarity_ratio("acme corp", "acme corp"), 1.0);
    }

    #[test]
    fn test_close_names_score_high() {
        let ratio = similarity_ratio("john smith", "jon smith");
        assert!(ratio > 0.85 && ratio < 1.0, "ratio was {ratio}");
    }

    #[test]
    fn test_unrelated_names_score_low() {
        assert!(similarity_ratio("acme corp", "zenith ltd") < 0.5);
    }

    #[test]
    fn test_case_sensitivity() {
        assert!(similarity_ratio("ACME", "acme") < 1.0);
        assert_eq!(similarity_ratio("ACME".to_lowercase().as_str(), "acme"), 1.0);
    }

    #[test]
    fn test_column_name_variants() {
        assert!(similarity_ratio("order_id", "orders_id") > 0.82);
        assert!(similarity_ratio("customer_id", "shipment_no") < 0.82);
    }
}
