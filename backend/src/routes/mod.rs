//! Route definitions for the MedChain inventory platform

use axum::{
    routing::{get, post},
    Router,
};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Inventory tracking and alert views
        .nest("/inventory", inventory_routes())
        // Reorder log
        .nest("/reorders", reorder_routes())
        // Advisory endpoints (generative AI with fallbacks)
        .nest("/ai", ai_routes())
}

/// Inventory routes
fn inventory_routes() -> Router<AppState> {
    Router::new()
        .route("/update", post(handlers::update_inventory))
        .route("/all", get(handlers::get_all_inventory))
        .route("/expiring", get(handlers::get_expiring_inventory))
        .route("/low-stock", get(handlers::get_low_stock))
        .route("/summary", get(handlers::get_inventory_summary))
        .route("/:location", get(handlers::get_location_inventory))
}

/// Reorder routes
fn reorder_routes() -> Router<AppState> {
    Router::new().route("/", get(handlers::list_reorders).post(handlers::trigger_reorders))
}

/// Advisory routes
fn ai_routes() -> Router<AppState> {
    Router::new()
        .route("/predict-demand", get(handlers::predict_demand))
        .route("/chat", post(handlers::ai_chat))
        .route("/batch-verify", post(handlers::verify_batch))
}
