//! Stock records and the derived alert rules

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Quantity below which a record counts toward the summary low-stock total.
pub const SUMMARY_LOW_STOCK_THRESHOLD: i64 = 50;

/// Horizon in days used by the summary when counting soon-to-expire records.
pub const EXPIRY_WARNING_DAYS: i64 = 30;

/// One inventory row for a (location, drug) pair.
///
/// At most one record exists per pair; a write to an existing pair replaces
/// quantity and last_updated in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockRecord {
    pub location: String,
    pub drug_name: String,
    pub quantity: i64,
    pub batch_id: Option<String>,
    pub expiry_date: Option<NaiveDate>,
    pub manufacturer: Option<String>,
    pub last_updated: DateTime<Utc>,
}

/// Coarse low-stock classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StockSeverity {
    Critical,
    Low,
    Moderate,
}

impl StockSeverity {
    /// Classify a quantity. Boundaries are strict: 10 units is `Low` and
    /// 25 units is `Moderate`.
    pub fn classify(quantity: i64) -> Self {
        if quantity < 10 {
            StockSeverity::Critical
        } else if quantity < 25 {
            StockSeverity::Low
        } else {
            StockSeverity::Moderate
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StockSeverity::Critical => "critical",
            StockSeverity::Low => "low",
            StockSeverity::Moderate => "moderate",
        }
    }
}

/// Calendar-day difference between an expiry date and today. Negative
/// values mean the batch has already expired.
pub fn days_until_expiry(expiry_date: NaiveDate, today: NaiveDate) -> i64 {
    (expiry_date - today).num_days()
}

/// A batch is expired once its expiry date is strictly before today.
pub fn is_expired(expiry_date: NaiveDate, today: NaiveDate) -> bool {
    expiry_date < today
}

/// Input for an inventory upsert.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateInventoryRequest {
    #[validate(length(min = 1, message = "location must not be empty"))]
    pub location: String,
    #[validate(length(min = 1, message = "drug name must not be empty"))]
    pub drug_name: String,
    #[validate(range(min = 0, message = "quantity must be non-negative"))]
    pub quantity: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn severity_boundaries_are_strict() {
        assert_eq!(StockSeverity::classify(0), StockSeverity::Critical);
        assert_eq!(StockSeverity::classify(9), StockSeverity::Critical);
        assert_eq!(StockSeverity::classify(10), StockSeverity::Low);
        assert_eq!(StockSeverity::classify(24), StockSeverity::Low);
        assert_eq!(StockSeverity::classify(25), StockSeverity::Moderate);
        assert_eq!(StockSeverity::classify(1_000_000), StockSeverity::Moderate);
    }

    #[test]
    fn severity_labels() {
        assert_eq!(StockSeverity::Critical.as_str(), "critical");
        assert_eq!(StockSeverity::Low.as_str(), "low");
        assert_eq!(StockSeverity::Moderate.as_str(), "moderate");
    }

    #[test]
    fn days_until_expiry_counts_calendar_days() {
        let today = NaiveDate::from_ymd_opt(2024, 12, 1).unwrap();
        let in_ten = NaiveDate::from_ymd_opt(2024, 12, 11).unwrap();
        let past = NaiveDate::from_ymd_opt(2024, 11, 28).unwrap();

        assert_eq!(days_until_expiry(in_ten, today), 10);
        assert_eq!(days_until_expiry(today, today), 0);
        assert_eq!(days_until_expiry(past, today), -3);
    }

    #[test]
    fn expiry_is_strictly_before_today() {
        let today = NaiveDate::from_ymd_opt(2024, 12, 1).unwrap();
        let yesterday = NaiveDate::from_ymd_opt(2024, 11, 30).unwrap();
        let tomorrow = NaiveDate::from_ymd_opt(2024, 12, 2).unwrap();

        assert!(is_expired(yesterday, today));
        assert!(!is_expired(today, today));
        assert!(!is_expired(tomorrow, today));
    }

    #[test]
    fn update_request_rejects_bad_input() {
        let negative = UpdateInventoryRequest {
            location: "Central Hospital".to_string(),
            drug_name: "Aspirin 325mg".to_string(),
            quantity: -1,
        };
        assert!(negative.validate().is_err());

        let empty = UpdateInventoryRequest {
            location: String::new(),
            drug_name: "Aspirin 325mg".to_string(),
            quantity: 5,
        };
        assert!(empty.validate().is_err());
    }

    proptest! {
        #[test]
        fn every_quantity_lands_in_exactly_one_bucket(quantity in 0i64..1_000_000) {
            let severity = StockSeverity::classify(quantity);
            let expected = if quantity < 10 {
                StockSeverity::Critical
            } else if quantity < 25 {
                StockSeverity::Low
            } else {
                StockSeverity::Moderate
            };
            prop_assert_eq!(severity, expected);
        }
    }

    #[test]
    fn stock_record_serializes_camel_case() {
        let record = StockRecord {
            location: "Central Hospital".to_string(),
            drug_name: "Paracetamol 500mg".to_string(),
            quantity: 1250,
            batch_id: Some("PC-2024-001".to_string()),
            expiry_date: NaiveDate::from_ymd_opt(2025, 12, 31),
            manufacturer: Some("PharmaCorp Ltd".to_string()),
            last_updated: DateTime::from_timestamp(1_700_000_000, 0).unwrap(),
        };

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["drugName"], "Paracetamol 500mg");
        assert_eq!(json["batchId"], "PC-2024-001");
        assert_eq!(json["expiryDate"], "2025-12-31");
        assert!(json.get("lastUpdated").is_some());
    }
}
