//! HTTP handlers for reorder endpoints

use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;
use validator::Validate;

use shared::{ReorderCreated, ReorderRecord, ReorderRequest};

use crate::error::AppResult;
use crate::services::ReorderService;
use crate::AppState;

/// Response for a reorder trigger
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TriggerReorderResponse {
    pub success: bool,
    pub reorders_created: Vec<ReorderCreated>,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

/// Trigger reorders for matching low-stock records
pub async fn trigger_reorders(
    State(state): State<AppState>,
    Json(input): Json<ReorderRequest>,
) -> AppResult<Json<TriggerReorderResponse>> {
    input.validate()?;

    let now = Utc::now();
    let service = ReorderService::new(state.store.clone());
    let created = service.trigger(&input, now).await?;

    Ok(Json(TriggerReorderResponse {
        success: true,
        message: format!("Created {} reorder(s) for {}", created.len(), input.drug_name),
        reorders_created: created,
        timestamp: now,
    }))
}

/// All recorded reorders, newest first
pub async fn list_reorders(State(state): State<AppState>) -> AppResult<Json<Vec<ReorderRecord>>> {
    let service = ReorderService::new(state.store.clone());
    let reorders = service.list().await?;
    Ok(Json(reorders))
}
