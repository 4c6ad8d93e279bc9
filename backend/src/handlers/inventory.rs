//! HTTP handlers for inventory endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use shared::{StockRecord, UpdateInventoryRequest, SUMMARY_LOW_STOCK_THRESHOLD};

use crate::error::AppResult;
use crate::services::inventory::{ExpiryReport, InventoryByLocation, LocationInventory, LowStockReport};
use crate::services::summary::InventorySummary;
use crate::services::{InventoryService, SummaryService};
use crate::AppState;

/// Query parameters for the expiring-inventory endpoint
#[derive(Debug, Deserialize)]
pub struct ExpiryQuery {
    #[serde(default)]
    pub days: i64,
    pub location: Option<String>,
}

/// Query parameters for the low-stock endpoint
#[derive(Debug, Deserialize)]
pub struct LowStockQuery {
    #[serde(default = "default_threshold")]
    pub threshold: i64,
    pub location: Option<String>,
}

fn default_threshold() -> i64 {
    SUMMARY_LOW_STOCK_THRESHOLD
}

/// Response for an inventory update
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateInventoryResponse {
    pub success: bool,
    pub message: String,
    pub record: StockRecord,
    pub timestamp: DateTime<Utc>,
}

/// Insert or replace a stock record
pub async fn update_inventory(
    State(state): State<AppState>,
    Json(input): Json<UpdateInventoryRequest>,
) -> AppResult<Json<UpdateInventoryResponse>> {
    input.validate()?;

    let now = Utc::now();
    let service = InventoryService::new(state.store.clone());
    let record = service.update(&input, now).await?;

    Ok(Json(UpdateInventoryResponse {
        success: true,
        message: "Inventory updated successfully".to_string(),
        record,
        timestamp: now,
    }))
}

/// Full inventory grouped by location
pub async fn get_all_inventory(
    State(state): State<AppState>,
) -> AppResult<Json<InventoryByLocation>> {
    let service = InventoryService::new(state.store.clone());
    let inventory = service.all_inventory(Utc::now()).await?;
    Ok(Json(inventory))
}

/// Records expiring within the requested number of days
pub async fn get_expiring_inventory(
    State(state): State<AppState>,
    Query(query): Query<ExpiryQuery>,
) -> AppResult<Json<ExpiryReport>> {
    let service = InventoryService::new(state.store.clone());
    let report = service
        .expiring_report(query.days, query.location.as_deref(), Utc::now())
        .await?;
    Ok(Json(report))
}

/// Records below the stock threshold, with severity classification
pub async fn get_low_stock(
    State(state): State<AppState>,
    Query(query): Query<LowStockQuery>,
) -> AppResult<Json<LowStockReport>> {
    let service = InventoryService::new(state.store.clone());
    let report = service
        .low_stock_report(query.threshold, query.location.as_deref(), Utc::now())
        .await?;
    Ok(Json(report))
}

/// Platform-wide inventory summary
pub async fn get_inventory_summary(
    State(state): State<AppState>,
) -> AppResult<Json<InventorySummary>> {
    let service = SummaryService::new(state.store.clone());
    let summary = service.summarize(Utc::now()).await?;
    Ok(Json(summary))
}

/// Inventory for a single location
pub async fn get_location_inventory(
    State(state): State<AppState>,
    Path(location): Path<String>,
) -> AppResult<Json<LocationInventory>> {
    let service = InventoryService::new(state.store.clone());
    let inventory = service.location_inventory(&location, Utc::now()).await?;
    Ok(Json(inventory))
}
