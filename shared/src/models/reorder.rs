//! Reorder records and the deterministic replenishment policy

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;
use validator::Validate;

/// Days between triggering a reorder and its expected delivery.
pub const DELIVERY_LEAD_DAYS: i64 = 5;

/// Floor for any recommended order quantity.
pub const MIN_ORDER_QUANTITY: i64 = 500;

/// One persisted replenishment action for a location/drug. Append-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReorderRecord {
    pub id: i64,
    pub drug_name: String,
    pub quantity: i64,
    pub location: String,
    pub status: ReorderStatus,
    pub order_date: DateTime<Utc>,
    pub expected_delivery: NaiveDate,
    pub supplier: Option<String>,
}

/// Reorder lifecycle status. Records are created as `Pending`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReorderStatus {
    #[default]
    Pending,
    Ordered,
    Delivered,
    Cancelled,
}

impl ReorderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReorderStatus::Pending => "pending",
            ReorderStatus::Ordered => "ordered",
            ReorderStatus::Delivered => "delivered",
            ReorderStatus::Cancelled => "cancelled",
        }
    }
}

#[derive(Debug, Error)]
#[error("unknown reorder status: {0}")]
pub struct ParseReorderStatusError(String);

impl FromStr for ReorderStatus {
    type Err = ParseReorderStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(ReorderStatus::Pending),
            "ordered" => Ok(ReorderStatus::Ordered),
            "delivered" => Ok(ReorderStatus::Delivered),
            "cancelled" => Ok(ReorderStatus::Cancelled),
            other => Err(ParseReorderStatusError(other.to_string())),
        }
    }
}

/// Result of one triggered reorder, returned to the caller in match order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReorderCreated {
    pub location: String,
    pub current_stock: i64,
    pub order_quantity: i64,
    pub supplier: Option<String>,
    pub expected_delivery: NaiveDate,
    pub order_id: String,
}

/// Recommended order amount for a low-stock record: twice the caller's
/// threshold, never below the 500-unit floor.
pub fn recommended_order_quantity(threshold: i64) -> i64 {
    MIN_ORDER_QUANTITY.max(threshold * 2)
}

/// Order ids combine the creation date with the record's sequential
/// identity, e.g. `MED-20250115-42`. Unique per record; not parseable.
pub fn format_order_id(order_date: DateTime<Utc>, record_id: i64) -> String {
    format!("MED-{}-{}", order_date.format("%Y%m%d"), record_id)
}

/// Input for triggering reorders.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ReorderRequest {
    #[validate(length(min = 1, message = "drug name must not be empty"))]
    pub drug_name: String,
    pub threshold: i64,
    pub location: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recommended_quantity_has_a_floor() {
        assert_eq!(recommended_order_quantity(50), 500);
        assert_eq!(recommended_order_quantity(250), 500);
        assert_eq!(recommended_order_quantity(251), 502);
        assert_eq!(recommended_order_quantity(1000), 2000);
    }

    #[test]
    fn recommended_quantity_for_nonpositive_thresholds() {
        // Thresholds at or below zero never trigger a reorder, but the
        // policy itself still yields the floor.
        assert_eq!(recommended_order_quantity(0), 500);
        assert_eq!(recommended_order_quantity(-10), 500);
    }

    #[test]
    fn order_id_combines_date_and_identity() {
        let order_date = DateTime::from_timestamp(1_736_899_200, 0).unwrap(); // 2025-01-15
        assert_eq!(format_order_id(order_date, 42), "MED-20250115-42");
    }

    #[test]
    fn order_ids_are_unique_per_record() {
        let order_date = DateTime::from_timestamp(1_736_899_200, 0).unwrap();
        let ids: Vec<String> = (1..=100)
            .map(|id| format_order_id(order_date, id))
            .collect();
        let mut deduped = ids.clone();
        deduped.sort();
        deduped.dedup();
        assert_eq!(deduped.len(), ids.len());
    }

    #[test]
    fn status_round_trips_through_strings() {
        for status in [
            ReorderStatus::Pending,
            ReorderStatus::Ordered,
            ReorderStatus::Delivered,
            ReorderStatus::Cancelled,
        ] {
            assert_eq!(status.as_str().parse::<ReorderStatus>().unwrap(), status);
        }
        assert!("unknown".parse::<ReorderStatus>().is_err());
    }

    #[test]
    fn default_status_is_pending() {
        assert_eq!(ReorderStatus::default(), ReorderStatus::Pending);
    }
}
