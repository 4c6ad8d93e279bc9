//! Inventory storage
//!
//! The store is the single source of truth for stock records and the
//! append-only reorder log. Two backings implement the same interface:
//! Postgres for production and an in-memory map for tests and
//! database-less runs.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};

use shared::{ReorderRecord, ReorderStatus, StockRecord};

use crate::error::AppResult;

mod memory;
mod postgres;

pub use memory::MemStore;
pub use postgres::PgStore;

/// A reorder row to append.
#[derive(Debug, Clone)]
pub struct NewReorder {
    pub drug_name: String,
    pub quantity: i64,
    pub location: String,
    pub status: ReorderStatus,
    pub order_date: DateTime<Utc>,
    pub expected_delivery: NaiveDate,
    pub supplier: Option<String>,
}

/// Keyed storage for stock records plus the append-only reorder log.
///
/// At most one stock record exists per (location, drug_name) pair; a write
/// to an existing pair replaces quantity and last_updated in place
/// (last-writer-wins). Stock records are never deleted.
#[async_trait]
pub trait InventoryStore: Send + Sync {
    /// Insert or replace the record for a (location, drug_name) pair.
    /// Never fails on duplicates; `last_updated` is set to `now`.
    async fn upsert_stock(
        &self,
        location: &str,
        drug_name: &str,
        quantity: i64,
        now: DateTime<Utc>,
    ) -> AppResult<StockRecord>;

    /// All records for one location, in drug-name order.
    async fn records_for_location(&self, location: &str) -> AppResult<Vec<StockRecord>>;

    /// Every record, ordered by location then drug name.
    async fn all_records(&self) -> AppResult<Vec<StockRecord>>;

    /// Records with an expiry date on or before `as_of`, soonest first.
    /// Records without an expiry date are excluded.
    async fn expiring(
        &self,
        as_of: NaiveDate,
        location: Option<&str>,
    ) -> AppResult<Vec<StockRecord>>;

    /// Records with quantity strictly below `threshold`, lowest first.
    async fn low_stock(
        &self,
        threshold: i64,
        location: Option<&str>,
    ) -> AppResult<Vec<StockRecord>>;

    /// Case-sensitive substring match on drug name.
    async fn search_by_drug_name(
        &self,
        substring: &str,
        location: Option<&str>,
    ) -> AppResult<Vec<StockRecord>>;

    /// Look up a record by batch id.
    async fn find_by_batch(&self, batch_id: &str) -> AppResult<Option<StockRecord>>;

    /// Append a reorder record, returning it with its assigned id.
    async fn insert_reorder(&self, reorder: NewReorder) -> AppResult<ReorderRecord>;

    /// All reorder records, newest first.
    async fn list_reorders(&self) -> AppResult<Vec<ReorderRecord>>;

    /// Storage reachability probe for health checks.
    async fn ping(&self) -> AppResult<()>;
}
