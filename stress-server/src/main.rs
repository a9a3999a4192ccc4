//! Stress Level Predictor - HTTP Service
//!
//! Loads the scaler and model written by `stress-train` once at startup and
//! serves predictions from them read-only.
//!
//! # Routes
//!
//! ```text
//! GET  /         liveness
//! POST /predict  {"features": [20 numbers]} -> {"stress_level": 0|1|2}
//! GET  /model    metadata of the loaded model
//! ```

mod config;
mod error;
mod handlers;
mod state;


use anyhow::Context;
use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{
    cors::{CorsLayer, Any},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub use error::{AppError, AppResult};
pub use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::from_env();

    // Initialize logging
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "stress_server=debug,tower_http=debug".into());
    let registry = tracing_subscriber::registry().with(filter);
    if config.is_production() {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    tracing::info!("Stress predictor starting ({})...", config.environment);
    tracing::debug!("Config: {:?}", config);

    let addr = config.bind_addr()?;
    let state = AppState::load(config);
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    tracing::info!("Server listening on http://{}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}

/// Create the router with all routes
fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::health::check))
        .route("/predict", post(handlers::predict::predict))
        .route("/model", get(handlers::model::info))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        )
        .with_state(state)
}
