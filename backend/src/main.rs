//! MedChain Inventory Platform - Backend Server
//!
//! REST backend for tracking pharmaceutical inventory across multiple
//! locations, flagging low-stock and expiring batches, recording reorder
//! actions, and answering free-text questions through an external
//! generative AI service with a deterministic fallback.

use axum::{http::HeaderValue, routing::get, Router};
use sqlx::postgres::PgPoolOptions;
use std::{net::SocketAddr, sync::Arc, time::Duration};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod error;
mod external;
mod handlers;
mod routes;
mod services;
mod store;

pub use config::Config;

use external::GenerativeTextClient;
use store::{InventoryStore, MemStore, PgStore};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn InventoryStore>,
    pub config: Arc<Config>,
    pub ai: Option<GenerativeTextClient>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "medchain_server=debug,tower_http=debug,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::load()?;

    tracing::info!("Starting MedChain Inventory Server");
    tracing::info!("Environment: {}", config.environment);

    // Select the storage backing; an empty database URL runs the server
    // against the in-memory store seeded with the demo dataset.
    let store: Arc<dyn InventoryStore> = if config.database.url.is_empty() {
        tracing::warn!("No database URL configured; using the in-memory store");
        Arc::new(MemStore::with_sample_data())
    } else {
        tracing::info!("Connecting to database...");
        let db_pool = PgPoolOptions::new()
            .max_connections(config.database.max_connections)
            .min_connections(config.database.min_connections)
            .acquire_timeout(Duration::from_secs(30))
            .connect(&config.database.url)
            .await?;

        tracing::info!("Database connection established");

        // Run migrations in development
        if config.environment == "development" {
            tracing::info!("Running database migrations...");
            sqlx::migrate!("./migrations").run(&db_pool).await?;
            tracing::info!("Migrations completed");
        }

        Arc::new(PgStore::new(db_pool))
    };

    // The generative client is built once from configuration; advisory
    // endpoints degrade to static fallbacks when it is absent.
    let ai = GenerativeTextClient::from_config(&config.ai);
    if ai.is_none() {
        tracing::warn!("No generative AI key configured; advisory endpoints will use fallbacks");
    }

    // Create application state
    let state = AppState {
        store,
        config: Arc::new(config.clone()),
        ai,
    };

    // Build application
    let app = create_app(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes and middleware
fn create_app(state: AppState) -> Router {
    let cors = cors_layer(&state.config.cors.allowed_origins);

    Router::new()
        .route("/", get(root))
        .route("/health", get(handlers::health_check))
        .nest("/api/v1", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// CORS configuration from the comma-separated origin list; "*" allows any
fn cors_layer(allowed_origins: &str) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if allowed_origins.trim() == "*" {
        layer.allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> = allowed_origins
            .split(',')
            .filter_map(|origin| origin.trim().parse().ok())
            .collect();
        layer.allow_origin(AllowOrigin::list(origins))
    }
}

/// Root endpoint
async fn root() -> &'static str {
    "MedChain Inventory Platform API v1.0"
}
