//! In-memory inventory store
//!
//! Backs tests and database-less runs. Provides the same interface and
//! ordering guarantees as the Postgres store.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use std::sync::RwLock;

use shared::{ReorderRecord, StockRecord};

use super::{InventoryStore, NewReorder};
use crate::error::AppResult;

/// Demo dataset matching the seed migration: (location, drug, quantity,
/// batch, expiry, manufacturer).
pub const SAMPLE_INVENTORY: &[(&str, &str, i64, &str, &str, &str)] = &[
    ("Central Hospital", "Paracetamol 500mg", 1250, "PC-2024-001", "2025-12-31", "PharmaCorp Ltd"),
    ("Central Hospital", "Amoxicillin 250mg", 800, "ML-2024-045", "2025-08-15", "MediLab Inc"),
    ("Rural Clinic A", "Paracetamol 500mg", 480, "PC-2024-002", "2025-11-20", "PharmaCorp Ltd"),
    ("Rural Clinic A", "Aspirin 325mg", 25, "GP-2024-089", "2024-12-31", "Global Pharma"),
    ("Rural Clinic A", "Ciprofloxacin 500mg", 15, "AB-2024-067", "2024-12-25", "AntiBio Labs"),
    ("Regional Hospital", "Metformin 500mg", 890, "DC-2024-156", "2025-11-28", "DiabetesCare Ltd"),
    ("City Pharmacy", "Ibuprofen 400mg", 75, "HT-2024-128", "2024-12-20", "HealthTech Solutions"),
    ("City Pharmacy", "Aspirin 325mg", 8, "GP-2024-090", "2024-12-31", "Global Pharma"),
    ("Medical Warehouse", "Paracetamol 500mg", 2100, "PC-2023-123", "2025-06-15", "PharmaCorp Ltd"),
];

/// Inventory store backed by an in-memory map
#[derive(Default)]
pub struct MemStore {
    inner: RwLock<Inner>,
}

#[derive(Default)]
struct Inner {
    stock: Vec<StockRecord>,
    reorders: Vec<ReorderRecord>,
    next_reorder_id: i64,
}

impl MemStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store seeded with the demo inventory dataset
    pub fn with_sample_data() -> Self {
        let store = Self::new();
        let now = Utc::now();
        {
            let mut inner = store.inner.write().expect("store lock poisoned");
            for (location, drug_name, quantity, batch_id, expiry, manufacturer) in SAMPLE_INVENTORY
            {
                inner.stock.push(StockRecord {
                    location: (*location).to_string(),
                    drug_name: (*drug_name).to_string(),
                    quantity: *quantity,
                    batch_id: Some((*batch_id).to_string()),
                    expiry_date: NaiveDate::parse_from_str(expiry, "%Y-%m-%d").ok(),
                    manufacturer: Some((*manufacturer).to_string()),
                    last_updated: now,
                });
            }
        }
        store
    }
}

#[async_trait]
impl InventoryStore for MemStore {
    async fn upsert_stock(
        &self,
        location: &str,
        drug_name: &str,
        quantity: i64,
        now: DateTime<Utc>,
    ) -> AppResult<StockRecord> {
        let mut inner = self.inner.write().expect("store lock poisoned");

        if let Some(record) = inner
            .stock
            .iter_mut()
            .find(|r| r.location == location && r.drug_name == drug_name)
        {
            record.quantity = quantity;
            record.last_updated = now;
            return Ok(record.clone());
        }

        let record = StockRecord {
            location: location.to_string(),
            drug_name: drug_name.to_string(),
            quantity,
            batch_id: None,
            expiry_date: None,
            manufacturer: None,
            last_updated: now,
        };
        inner.stock.push(record.clone());
        Ok(record)
    }

    async fn records_for_location(&self, location: &str) -> AppResult<Vec<StockRecord>> {
        let inner = self.inner.read().expect("store lock poisoned");
        let mut records: Vec<StockRecord> = inner
            .stock
            .iter()
            .filter(|r| r.location == location)
            .cloned()
            .collect();
        records.sort_by(|a, b| a.drug_name.cmp(&b.drug_name));
        Ok(records)
    }

    async fn all_records(&self) -> AppResult<Vec<StockRecord>> {
        let inner = self.inner.read().expect("store lock poisoned");
        let mut records = inner.stock.clone();
        records.sort_by(|a, b| {
            a.location
                .cmp(&b.location)
                .then_with(|| a.drug_name.cmp(&b.drug_name))
        });
        Ok(records)
    }

    async fn expiring(
        &self,
        as_of: NaiveDate,
        location: Option<&str>,
    ) -> AppResult<Vec<StockRecord>> {
        let inner = self.inner.read().expect("store lock poisoned");
        let mut records: Vec<StockRecord> = inner
            .stock
            .iter()
            .filter(|r| location.map_or(true, |loc| r.location == loc))
            .filter(|r| r.expiry_date.map_or(false, |d| d <= as_of))
            .cloned()
            .collect();
        records.sort_by_key(|r| r.expiry_date);
        Ok(records)
    }

    async fn low_stock(
        &self,
        threshold: i64,
        location: Option<&str>,
    ) -> AppResult<Vec<StockRecord>> {
        let inner = self.inner.read().expect("store lock poisoned");
        let mut records: Vec<StockRecord> = inner
            .stock
            .iter()
            .filter(|r| location.map_or(true, |loc| r.location == loc))
            .filter(|r| r.quantity < threshold)
            .cloned()
            .collect();
        records.sort_by_key(|r| r.quantity);
        Ok(records)
    }

    async fn search_by_drug_name(
        &self,
        substring: &str,
        location: Option<&str>,
    ) -> AppResult<Vec<StockRecord>> {
        let inner = self.inner.read().expect("store lock poisoned");
        let mut records: Vec<StockRecord> = inner
            .stock
            .iter()
            .filter(|r| location.map_or(true, |loc| r.location == loc))
            .filter(|r| r.drug_name.contains(substring))
            .cloned()
            .collect();
        records.sort_by(|a, b| {
            a.location
                .cmp(&b.location)
                .then_with(|| a.drug_name.cmp(&b.drug_name))
        });
        Ok(records)
    }

    async fn find_by_batch(&self, batch_id: &str) -> AppResult<Option<StockRecord>> {
        let inner = self.inner.read().expect("store lock poisoned");
        Ok(inner
            .stock
            .iter()
            .find(|r| r.batch_id.as_deref() == Some(batch_id))
            .cloned())
    }

    async fn insert_reorder(&self, reorder: NewReorder) -> AppResult<ReorderRecord> {
        let mut inner = self.inner.write().expect("store lock poisoned");
        inner.next_reorder_id += 1;

        let record = ReorderRecord {
            id: inner.next_reorder_id,
            drug_name: reorder.drug_name,
            quantity: reorder.quantity,
            location: reorder.location,
            status: reorder.status,
            order_date: reorder.order_date,
            expected_delivery: reorder.expected_delivery,
            supplier: reorder.supplier,
        };
        inner.reorders.push(record.clone());
        Ok(record)
    }

    async fn list_reorders(&self) -> AppResult<Vec<ReorderRecord>> {
        let inner = self.inner.read().expect("store lock poisoned");
        let mut records = inner.reorders.clone();
        records.reverse();
        Ok(records)
    }

    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }
}
