//! Summary service: read-only rollup of the full inventory

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use std::sync::Arc;

use shared::{EXPIRY_WARNING_DAYS, SUMMARY_LOW_STOCK_THRESHOLD};

use crate::error::AppResult;
use crate::store::InventoryStore;

/// Number of entries in the top-drugs ranking.
const TOP_DRUGS_LIMIT: usize = 5;

/// Summary service aggregating store contents into platform statistics
#[derive(Clone)]
pub struct SummaryService {
    store: Arc<dyn InventoryStore>,
}

/// Rollup of the full inventory
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InventorySummary {
    pub total_drugs: usize,
    pub total_quantity: i64,
    pub low_stock_count: usize,
    pub expiring_count: usize,
    pub locations: Vec<LocationStats>,
    pub top_drugs: Vec<TopDrug>,
    pub generated_at: DateTime<Utc>,
}

/// Per-location breakdown
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationStats {
    pub name: String,
    pub drug_types: usize,
    pub total_quantity: i64,
}

/// One entry in the top-drugs ranking
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopDrug {
    pub name: String,
    pub quantity: i64,
}

impl SummaryService {
    pub fn new(store: Arc<dyn InventoryStore>) -> Self {
        Self { store }
    }

    /// Single read-only pass over the full store. The low-stock count uses
    /// the fixed 50-unit threshold and the expiring count a fixed 30-day
    /// horizon, independent of any caller-supplied values.
    pub async fn summarize(&self, now: DateTime<Utc>) -> AppResult<InventorySummary> {
        let records = self.store.all_records().await?;
        let expiry_cutoff = now.date_naive() + Duration::days(EXPIRY_WARNING_DAYS);

        let total_drugs = records.len();
        let total_quantity: i64 = records.iter().map(|r| r.quantity).sum();
        let low_stock_count = records
            .iter()
            .filter(|r| r.quantity < SUMMARY_LOW_STOCK_THRESHOLD)
            .count();
        let expiring_count = records
            .iter()
            .filter(|r| r.expiry_date.map_or(false, |d| d <= expiry_cutoff))
            .count();

        // Records arrive ordered by (location, drug name), so grouping by
        // adjacent runs keeps the breakdown in location order.
        let mut locations: Vec<LocationStats> = Vec::new();
        for record in &records {
            match locations.last_mut() {
                Some(stats) if stats.name == record.location => {
                    stats.drug_types += 1;
                    stats.total_quantity += record.quantity;
                }
                _ => locations.push(LocationStats {
                    name: record.location.clone(),
                    drug_types: 1,
                    total_quantity: record.quantity,
                }),
            }
        }

        // Sum quantities per drug across locations, keeping first-encounter
        // order; a stable sort then makes ties deterministic.
        let mut drug_totals: Vec<TopDrug> = Vec::new();
        for record in &records {
            match drug_totals.iter_mut().find(|d| d.name == record.drug_name) {
                Some(entry) => entry.quantity += record.quantity,
                None => drug_totals.push(TopDrug {
                    name: record.drug_name.clone(),
                    quantity: record.quantity,
                }),
            }
        }
        drug_totals.sort_by(|a, b| b.quantity.cmp(&a.quantity));
        drug_totals.truncate(TOP_DRUGS_LIMIT);

        Ok(InventorySummary {
            total_drugs,
            total_quantity,
            low_stock_count,
            expiring_count,
            locations,
            top_drugs: drug_totals,
            generated_at: now,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemStore;

    // 2024-12-01T00:00:00Z
    fn now() -> DateTime<Utc> {
        DateTime::from_timestamp(1_733_011_200, 0).unwrap()
    }

    #[tokio::test]
    async fn summarizes_the_seed_dataset() {
        let service = SummaryService::new(Arc::new(MemStore::with_sample_data()));
        let summary = service.summarize(now()).await.unwrap();

        assert_eq!(summary.total_drugs, 9);
        assert_eq!(summary.total_quantity, 5643);
        // Aspirin 25, Ciprofloxacin 15, Aspirin 8.
        assert_eq!(summary.low_stock_count, 3);
        // Four batches expire on or before 2024-12-31.
        assert_eq!(summary.expiring_count, 4);

        assert_eq!(summary.locations.len(), 5);
        let rural = summary
            .locations
            .iter()
            .find(|l| l.name == "Rural Clinic A")
            .unwrap();
        assert_eq!(rural.drug_types, 3);
        assert_eq!(rural.total_quantity, 520);

        // Paracetamol is stocked at three locations: 1250 + 480 + 2100.
        assert_eq!(summary.top_drugs[0].name, "Paracetamol 500mg");
        assert_eq!(summary.top_drugs[0].quantity, 3830);
    }

    #[tokio::test]
    async fn top_drugs_is_capped_at_five() {
        let store = Arc::new(MemStore::new());
        let service = SummaryService::new(store.clone());

        for (i, name) in ["A", "B", "C", "D", "E", "F", "G"].iter().enumerate() {
            store
                .upsert_stock("Depot", name, (i as i64 + 1) * 10, now())
                .await
                .unwrap();
        }

        let summary = service.summarize(now()).await.unwrap();
        assert_eq!(summary.top_drugs.len(), 5);
        assert_eq!(summary.top_drugs[0].name, "G");
    }

    #[tokio::test]
    async fn quantity_ties_keep_first_encountered_order() {
        let store = Arc::new(MemStore::new());
        let service = SummaryService::new(store.clone());

        store.upsert_stock("Depot", "Alpha", 100, now()).await.unwrap();
        store.upsert_stock("Depot", "Beta", 100, now()).await.unwrap();

        let summary = service.summarize(now()).await.unwrap();
        assert_eq!(summary.top_drugs[0].name, "Alpha");
        assert_eq!(summary.top_drugs[1].name, "Beta");
    }

    #[tokio::test]
    async fn empty_store_yields_zeroed_summary() {
        let service = SummaryService::new(Arc::new(MemStore::new()));
        let summary = service.summarize(now()).await.unwrap();

        assert_eq!(summary.total_drugs, 0);
        assert_eq!(summary.total_quantity, 0);
        assert!(summary.locations.is_empty());
        assert!(summary.top_drugs.is_empty());
    }
}
