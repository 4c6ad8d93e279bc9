//! HTTP handlers for the advisory endpoints

use axum::{
    extract::{Query, State},
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use validator::Validate;

use shared::ChatMessage;

use crate::error::AppResult;
use crate::services::advisor::{AdvisoryService, ChatReply, DemandForecast};
use crate::services::inventory::BatchVerification;
use crate::services::InventoryService;
use crate::AppState;

/// Query parameters for demand prediction
#[derive(Debug, Deserialize)]
pub struct PredictQuery {
    pub location: Option<String>,
    pub drug: Option<String>,
    #[serde(default = "default_horizon")]
    pub days: i64,
}

fn default_horizon() -> i64 {
    30
}

/// Request body for batch verification
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct BatchVerifyRequest {
    #[validate(length(min = 1, message = "batch id must not be empty"))]
    pub batch_id: String,
}

/// Predict drug demand over the requested horizon
pub async fn predict_demand(
    State(state): State<AppState>,
    Query(query): Query<PredictQuery>,
) -> Json<DemandForecast> {
    let service = AdvisoryService::new(state.ai.clone());
    let forecast = service
        .predict_demand(
            query.location.as_deref(),
            query.drug.as_deref(),
            query.days,
            Utc::now(),
        )
        .await;
    Json(forecast)
}

/// Answer a free-text supply chain question
pub async fn ai_chat(
    State(state): State<AppState>,
    Json(input): Json<ChatMessage>,
) -> AppResult<Json<ChatReply>> {
    input.validate()?;

    let service = AdvisoryService::new(state.ai.clone());
    let reply = service.chat(&input.message, &input.language, Utc::now()).await;
    Ok(Json(reply))
}

/// Verify a batch id against the inventory
pub async fn verify_batch(
    State(state): State<AppState>,
    Json(input): Json<BatchVerifyRequest>,
) -> AppResult<Json<BatchVerification>> {
    input.validate()?;

    let service = InventoryService::new(state.store.clone());
    let result = service.verify_batch(&input.batch_id, Utc::now()).await?;
    Ok(Json(result))
}
