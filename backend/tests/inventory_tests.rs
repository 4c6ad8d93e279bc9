//! Inventory alert rule tests
//!
//! Covers the derived alert rules applied to stock records:
//! - Severity bucketing at the 10- and 25-unit boundaries
//! - Calendar-day expiry arithmetic
//! - The strictly-before-today expiry rule

use chrono::{Duration, NaiveDate};
use proptest::prelude::*;

use shared::{days_until_expiry, is_expired, StockSeverity, SUMMARY_LOW_STOCK_THRESHOLD};

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn test_severity_buckets() {
        assert_eq!(StockSeverity::classify(0), StockSeverity::Critical);
        assert_eq!(StockSeverity::classify(9), StockSeverity::Critical);
        assert_eq!(StockSeverity::classify(10), StockSeverity::Low);
        assert_eq!(StockSeverity::classify(24), StockSeverity::Low);
        assert_eq!(StockSeverity::classify(25), StockSeverity::Moderate);
        assert_eq!(StockSeverity::classify(5000), StockSeverity::Moderate);
    }

    #[test]
    fn test_summary_threshold_is_fixed() {
        // The summary counts records under 50 regardless of what the
        // low-stock endpoint was asked for.
        assert_eq!(SUMMARY_LOW_STOCK_THRESHOLD, 50);
    }

    #[test]
    fn test_expiry_day_count() {
        let today = NaiveDate::from_ymd_opt(2024, 12, 1).unwrap();

        let end_of_month = NaiveDate::from_ymd_opt(2024, 12, 31).unwrap();
        assert_eq!(days_until_expiry(end_of_month, today), 30);

        // Month boundary
        let next_year = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        assert_eq!(days_until_expiry(next_year, today), 31);
    }

    #[test]
    fn test_expired_batches_count_negative_days() {
        let today = NaiveDate::from_ymd_opt(2025, 1, 10).unwrap();
        let expired = NaiveDate::from_ymd_opt(2024, 12, 20).unwrap();

        assert_eq!(days_until_expiry(expired, today), -21);
        assert!(is_expired(expired, today));
    }

    #[test]
    fn test_expiry_boundary_is_exclusive_of_today() {
        let today = NaiveDate::from_ymd_opt(2024, 12, 25).unwrap();

        // A batch expiring today is not yet expired.
        assert!(!is_expired(today, today));
        assert!(is_expired(today - Duration::days(1), today));
        assert!(!is_expired(today + Duration::days(1), today));
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Severity is critical exactly below 10 units
    #[test]
    fn prop_critical_iff_under_ten(quantity in 0i64..100_000) {
        let severity = StockSeverity::classify(quantity);
        prop_assert_eq!(severity == StockSeverity::Critical, quantity < 10);
    }

    /// Severity is low exactly on the [10, 25) interval
    #[test]
    fn prop_low_iff_ten_to_twentyfive(quantity in 0i64..100_000) {
        let severity = StockSeverity::classify(quantity);
        prop_assert_eq!(
            severity == StockSeverity::Low,
            (10..25).contains(&quantity)
        );
    }

    /// Severity is moderate exactly from 25 units up
    #[test]
    fn prop_moderate_iff_twentyfive_up(quantity in 0i64..100_000) {
        let severity = StockSeverity::classify(quantity);
        prop_assert_eq!(severity == StockSeverity::Moderate, quantity >= 25);
    }

    /// Day counts and the expired flag agree: expired means negative days
    #[test]
    fn prop_expired_iff_negative_day_count(offset in -3650i64..3650) {
        let today = NaiveDate::from_ymd_opt(2024, 12, 1).unwrap();
        let expiry = today + Duration::days(offset);

        prop_assert_eq!(days_until_expiry(expiry, today), offset);
        prop_assert_eq!(is_expired(expiry, today), offset < 0);
    }
}
