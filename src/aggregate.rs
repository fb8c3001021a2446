// 📊 Weighted Aggregator - national spending share per COICOP Level 1 category
//
// weighted total(c) = Σ amount × household weight over records in c
// share(c)          = 100 × weighted total(c) / Σ weighted totals

use crate::coicop;
use crate::error::{Result, SurveyError};
use crate::join::EnrichedExpense;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryShare {
    pub category_code: String,
    pub label: String,
    pub weighted_total: f64,
    /// Percentage of the grand total (0..=100), unrounded
    pub share_pct: f64,
}

impl CategoryShare {
    /// Share rounded for display
    pub fn rounded_share(&self, decimals: u32) -> f64 {
        let factor = 10f64.powi(decimals as i32);
        (self.share_pct * factor).round() / factor
    }
}

/// Group by category, sum weighted expenditure, derive percentages
///
/// Ordered by descending share, ties by category code ascending.
pub fn aggregate(records: &[EnrichedExpense]) -> Result<Vec<CategoryShare>> {
    let mut totals: HashMap<&str, f64> = HashMap::new();

    for record in records {
        *totals.entry(record.category_code.as_str()).or_insert(0.0) += record.weighted_amount();
    }

    let grand_total: f64 = totals.values().sum();
    if grand_total <= 0.0 {
        return Err(SurveyError::empty(
            "grand total weighted expenditure is zero; category shares are undefined",
        ));
    }

    let mut shares: Vec<CategoryShare> = totals
        .into_iter()
        .map(|(code, weighted_total)| CategoryShare {
            category_code: code.to_string(),
            label: coicop::label_or_unclassified(code),
            weighted_total,
            share_pct: 100.0 * weighted_total / grand_total,
        })
        .collect();

    shares.sort_by(|a, b| {
        b.share_pct
            .total_cmp(&a.share_pct)
            .then_with(|| compare_codes(&a.category_code, &b.category_code))
    });

    Ok(shares)
}

/// Numeric order when both codes are numbers ("2" < "10"), text order otherwise
fn compare_codes(a: &str, b: &str) -> Ordering {
    match (a.parse::<u64>(), b.parse::<u64>()) {
        (Ok(x), Ok(y)) => x.cmp(&y),
        _ => a.cmp(b),
    }
}

pub fn grand_total(shares: &[CategoryShare]) -> f64 {
    shares.iter().map(|s| s.weighted_total).sum()
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_record(code: &str, amount: f64, weight: f64) -> EnrichedExpense {
        EnrichedExpense {
            category_code: code.to_string(),
            amount,
            weight,
        }
    }

    #[test]
    fn test_two_categories_ordered_descending() {
        // Weighted totals 30 and 70
        let records = vec![
            create_test_record("1", 10.0, 3.0),
            create_test_record("7", 35.0, 2.0),
        ];

        let shares = aggregate(&records).unwrap();

        assert_eq!(shares.len(), 2);
        assert_eq!(shares[0].category_code, "7");
        assert_eq!(shares[0].label, "TRANSPORT");
        assert!((shares[0].share_pct - 70.0).abs() < 1e-9);
        assert!((shares[1].share_pct - 30.0).abs() < 1e-9);
        assert_eq!(shares[1].weighted_total, 30.0);
    }

    #[test]
    fn test_shares_sum_to_100() {
        let records = vec![
            create_test_record("1", 13.7, 101.3),
            create_test_record("2", 0.0, 55.0),
            create_test_record("4", 1234.5, 12.25),
            create_test_record("4", 77.1, 3.3),
            create_test_record("9", 0.33, 999.0),
            create_test_record("12", 45.0, 1.0),
        ];

        let shares = aggregate(&records).unwrap();
        let total: f64 = shares.iter().map(|s| s.share_pct).sum();

        assert!((total - 100.0).abs() < 1e-6);
        assert_eq!(shares.len(), 5);
    }

    #[test]
    fn test_ties_broken_by_code_ascending() {
        let records = vec![
            create_test_record("10", 5.0, 1.0),
            create_test_record("2", 5.0, 1.0),
            create_test_record("3", 5.0, 1.0),
        ];

        let shares = aggregate(&records).unwrap();
        let codes: Vec<&str> = shares.iter().map(|s| s.category_code.as_str()).collect();

        assert_eq!(codes, vec!["2", "3", "10"]);
    }

    #[test]
    fn test_zero_total_is_empty_dataset() {
        let records = vec![create_test_record("1", 0.0, 4.0)];
        assert!(matches!(
            aggregate(&records),
            Err(SurveyError::EmptyDataset { .. })
        ));
        assert!(matches!(aggregate(&[]), Err(SurveyError::EmptyDataset { .. })));
    }

    #[test]
    fn test_unknown_code_kept() {
        let records = vec![
            create_test_record("1", 1.0, 1.0),
            create_test_record("99", 3.0, 1.0),
        ];

        let shares = aggregate(&records).unwrap();

        assert_eq!(shares[0].label, "UNCLASSIFIED (99)");
        assert!((shares[0].share_pct - 75.0).abs() < 1e-9);
    }

    #[test]
    fn test_rounded_share() {
        let share = CategoryShare {
            category_code: "1".to_string(),
            label: "FOOD AND NON-ALCOHOLIC BEVERAGES".to_string(),
            weighted_total: 1.0,
            share_pct: 33.33333,
        };

        assert_eq!(share.rounded_share(2), 33.33);
        assert_eq!(share.rounded_share(0), 33.0);
    }
}
