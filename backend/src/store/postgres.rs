//! PostgreSQL-backed inventory store

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{FromRow, PgPool};
use std::str::FromStr;

use shared::{ReorderRecord, ReorderStatus, StockRecord};

use super::{InventoryStore, NewReorder};
use crate::error::{AppError, AppResult};

/// Inventory store backed by PostgreSQL
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

/// Row for stock queries
#[derive(Debug, FromRow)]
struct StockRow {
    location: String,
    drug_name: String,
    quantity: i64,
    batch_id: Option<String>,
    expiry_date: Option<NaiveDate>,
    manufacturer: Option<String>,
    last_updated: DateTime<Utc>,
}

impl From<StockRow> for StockRecord {
    fn from(row: StockRow) -> Self {
        StockRecord {
            location: row.location,
            drug_name: row.drug_name,
            quantity: row.quantity,
            batch_id: row.batch_id,
            expiry_date: row.expiry_date,
            manufacturer: row.manufacturer,
            last_updated: row.last_updated,
        }
    }
}

/// Row for reorder queries
#[derive(Debug, FromRow)]
struct ReorderRow {
    id: i64,
    drug_name: String,
    quantity: i64,
    location: String,
    status: String,
    order_date: DateTime<Utc>,
    expected_delivery: NaiveDate,
    supplier: Option<String>,
}

impl TryFrom<ReorderRow> for ReorderRecord {
    type Error = AppError;

    fn try_from(row: ReorderRow) -> Result<Self, Self::Error> {
        let status = ReorderStatus::from_str(&row.status)
            .map_err(|e| AppError::Internal(e.to_string()))?;

        Ok(ReorderRecord {
            id: row.id,
            drug_name: row.drug_name,
            quantity: row.quantity,
            location: row.location,
            status,
            order_date: row.order_date,
            expected_delivery: row.expected_delivery,
            supplier: row.supplier,
        })
    }
}

impl PgStore {
    /// Create a new PgStore instance
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl InventoryStore for PgStore {
    async fn upsert_stock(
        &self,
        location: &str,
        drug_name: &str,
        quantity: i64,
        now: DateTime<Utc>,
    ) -> AppResult<StockRecord> {
        let row = sqlx::query_as::<_, StockRow>(
            r#"
            INSERT INTO inventory (location, drug_name, quantity, last_updated)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (location, drug_name)
            DO UPDATE SET quantity = EXCLUDED.quantity, last_updated = EXCLUDED.last_updated
            RETURNING location, drug_name, quantity, batch_id, expiry_date, manufacturer, last_updated
            "#,
        )
        .bind(location)
        .bind(drug_name)
        .bind(quantity)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn records_for_location(&self, location: &str) -> AppResult<Vec<StockRecord>> {
        let rows = sqlx::query_as::<_, StockRow>(
            r#"
            SELECT location, drug_name, quantity, batch_id, expiry_date, manufacturer, last_updated
            FROM inventory
            WHERE location = $1
            ORDER BY drug_name
            "#,
        )
        .bind(location)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn all_records(&self) -> AppResult<Vec<StockRecord>> {
        let rows = sqlx::query_as::<_, StockRow>(
            r#"
            SELECT location, drug_name, quantity, batch_id, expiry_date, manufacturer, last_updated
            FROM inventory
            ORDER BY location, drug_name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn expiring(
        &self,
        as_of: NaiveDate,
        location: Option<&str>,
    ) -> AppResult<Vec<StockRecord>> {
        let rows = sqlx::query_as::<_, StockRow>(
            r#"
            SELECT location, drug_name, quantity, batch_id, expiry_date, manufacturer, last_updated
            FROM inventory
            WHERE expiry_date IS NOT NULL
              AND expiry_date <= $1
              AND ($2::text IS NULL OR location = $2)
            ORDER BY expiry_date ASC
            "#,
        )
        .bind(as_of)
        .bind(location)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn low_stock(
        &self,
        threshold: i64,
        location: Option<&str>,
    ) -> AppResult<Vec<StockRecord>> {
        let rows = sqlx::query_as::<_, StockRow>(
            r#"
            SELECT location, drug_name, quantity, batch_id, expiry_date, manufacturer, last_updated
            FROM inventory
            WHERE quantity < $1
              AND ($2::text IS NULL OR location = $2)
            ORDER BY quantity ASC
            "#,
        )
        .bind(threshold)
        .bind(location)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn search_by_drug_name(
        &self,
        substring: &str,
        location: Option<&str>,
    ) -> AppResult<Vec<StockRecord>> {
        let rows = sqlx::query_as::<_, StockRow>(
            r#"
            SELECT location, drug_name, quantity, batch_id, expiry_date, manufacturer, last_updated
            FROM inventory
            WHERE drug_name LIKE '%' || $1 || '%'
              AND ($2::text IS NULL OR location = $2)
            ORDER BY location, drug_name
            "#,
        )
        .bind(substring)
        .bind(location)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn find_by_batch(&self, batch_id: &str) -> AppResult<Option<StockRecord>> {
        let row = sqlx::query_as::<_, StockRow>(
            r#"
            SELECT location, drug_name, quantity, batch_id, expiry_date, manufacturer, last_updated
            FROM inventory
            WHERE batch_id = $1
            LIMIT 1
            "#,
        )
        .bind(batch_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    async fn insert_reorder(&self, reorder: NewReorder) -> AppResult<ReorderRecord> {
        let row = sqlx::query_as::<_, ReorderRow>(
            r#"
            INSERT INTO reorders (drug_name, quantity, location, status, order_date, expected_delivery, supplier)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, drug_name, quantity, location, status, order_date, expected_delivery, supplier
            "#,
        )
        .bind(&reorder.drug_name)
        .bind(reorder.quantity)
        .bind(&reorder.location)
        .bind(reorder.status.as_str())
        .bind(reorder.order_date)
        .bind(reorder.expected_delivery)
        .bind(&reorder.supplier)
        .fetch_one(&self.pool)
        .await?;

        row.try_into()
    }

    async fn list_reorders(&self) -> AppResult<Vec<ReorderRecord>> {
        let rows = sqlx::query_as::<_, ReorderRow>(
            r#"
            SELECT id, drug_name, quantity, location, status, order_date, expected_delivery, supplier
            FROM reorders
            ORDER BY order_date DESC, id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
