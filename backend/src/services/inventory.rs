//! Inventory service: stock updates, grouped views, and alert reports

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;

use shared::{days_until_expiry, is_expired, StockRecord, StockSeverity, UpdateInventoryRequest};

use crate::error::AppResult;
use crate::store::InventoryStore;

/// Inventory service for stock tracking and derived alert views
#[derive(Clone)]
pub struct InventoryService {
    store: Arc<dyn InventoryStore>,
}

/// Inventory for a single location
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationInventory {
    pub location: String,
    pub drugs: Vec<StockRecord>,
    pub total_items: usize,
    pub last_sync: DateTime<Utc>,
}

/// Full inventory grouped by location
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryByLocation {
    pub locations: BTreeMap<String, Vec<StockRecord>>,
    pub total_locations: usize,
    pub last_sync: DateTime<Utc>,
}

/// A stock record decorated with its days-until-expiry
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpiringDrug {
    #[serde(flatten)]
    pub record: StockRecord,
    pub days_until_expiry: i64,
}

/// Expiry report for a check date
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpiryReport {
    pub expired_drugs: Vec<ExpiringDrug>,
    pub count: usize,
    pub check_date: NaiveDate,
    pub generated_at: DateTime<Utc>,
}

/// A stock record decorated with its severity classification
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LowStockDrug {
    #[serde(flatten)]
    pub record: StockRecord,
    pub status: StockSeverity,
}

/// Low-stock report for a caller-supplied threshold
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LowStockReport {
    pub low_stock_drugs: Vec<LowStockDrug>,
    pub count: usize,
    pub threshold: i64,
    pub generated_at: DateTime<Utc>,
}

/// Result of verifying a batch id against the inventory
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchVerification {
    pub verified: bool,
    pub batch_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub drug_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manufacturer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_expired: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl InventoryService {
    pub fn new(store: Arc<dyn InventoryStore>) -> Self {
        Self { store }
    }

    /// Insert or replace the stock record for a (location, drug) pair.
    pub async fn update(
        &self,
        input: &UpdateInventoryRequest,
        now: DateTime<Utc>,
    ) -> AppResult<StockRecord> {
        self.store
            .upsert_stock(&input.location, &input.drug_name, input.quantity, now)
            .await
    }

    /// All stock records for one location.
    pub async fn location_inventory(
        &self,
        location: &str,
        now: DateTime<Utc>,
    ) -> AppResult<LocationInventory> {
        let drugs = self.store.records_for_location(location).await?;
        Ok(LocationInventory {
            location: location.to_string(),
            total_items: drugs.len(),
            drugs,
            last_sync: now,
        })
    }

    /// Every stock record, grouped by location.
    pub async fn all_inventory(&self, now: DateTime<Utc>) -> AppResult<InventoryByLocation> {
        let records = self.store.all_records().await?;

        let mut locations: BTreeMap<String, Vec<StockRecord>> = BTreeMap::new();
        for record in records {
            locations
                .entry(record.location.clone())
                .or_default()
                .push(record);
        }

        Ok(InventoryByLocation {
            total_locations: locations.len(),
            locations,
            last_sync: now,
        })
    }

    /// Records expiring within `days` of now, decorated with the
    /// calendar-day distance to their expiry date. Negative values mean
    /// the batch has already expired.
    pub async fn expiring_report(
        &self,
        days: i64,
        location: Option<&str>,
        now: DateTime<Utc>,
    ) -> AppResult<ExpiryReport> {
        let today = now.date_naive();
        let check_date = today + Duration::days(days);
        let records = self.store.expiring(check_date, location).await?;

        let expired_drugs: Vec<ExpiringDrug> = records
            .into_iter()
            .filter_map(|record| {
                let expiry = record.expiry_date?;
                Some(ExpiringDrug {
                    days_until_expiry: days_until_expiry(expiry, today),
                    record,
                })
            })
            .collect();

        Ok(ExpiryReport {
            count: expired_drugs.len(),
            expired_drugs,
            check_date,
            generated_at: now,
        })
    }

    /// Records below the caller's threshold, decorated with severity.
    pub async fn low_stock_report(
        &self,
        threshold: i64,
        location: Option<&str>,
        now: DateTime<Utc>,
    ) -> AppResult<LowStockReport> {
        let records = self.store.low_stock(threshold, location).await?;

        let low_stock_drugs: Vec<LowStockDrug> = records
            .into_iter()
            .map(|record| LowStockDrug {
                status: StockSeverity::classify(record.quantity),
                record,
            })
            .collect();

        Ok(LowStockReport {
            count: low_stock_drugs.len(),
            low_stock_drugs,
            threshold,
            generated_at: now,
        })
    }

    /// Verify a batch id against the inventory. An unknown batch is a
    /// structured negative result, not an error.
    pub async fn verify_batch(
        &self,
        batch_id: &str,
        now: DateTime<Utc>,
    ) -> AppResult<BatchVerification> {
        let Some(record) = self.store.find_by_batch(batch_id).await? else {
            return Ok(BatchVerification {
                verified: false,
                batch_id: batch_id.to_string(),
                drug_name: None,
                manufacturer: None,
                location: None,
                quantity: None,
                expiry_date: None,
                is_expired: None,
                status: None,
                message: format!("Batch {} not found in database", batch_id),
                timestamp: now,
            });
        };

        let today = now.date_naive();
        let expired = record
            .expiry_date
            .map(|expiry| is_expired(expiry, today))
            .unwrap_or(false);

        let message = if expired {
            format!("WARNING: Batch {} has expired", batch_id)
        } else {
            format!("Batch {} verified successfully", batch_id)
        };

        Ok(BatchVerification {
            verified: true,
            batch_id: batch_id.to_string(),
            drug_name: Some(record.drug_name),
            manufacturer: record.manufacturer,
            location: Some(record.location),
            quantity: Some(record.quantity),
            expiry_date: record.expiry_date,
            is_expired: Some(expired),
            status: Some(if expired { "expired" } else { "verified" }.to_string()),
            message,
            timestamp: now,
        })
    }
}
