use axum::{
    Json, Router,
    routing::get,
};
use serde::Serialize;
use tracing::info;

use crate::state::AppState;

pub const SERVICE_NAME: &str = "Stock Prediction API";

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    status: &'static str,
    service: &'static str,
    version: &'static str,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(health))
}

async fn health() -> Json<HealthResponse> {
    info!("GET / - Health check");
    Json(HealthResponse {
        status: "healthy",
        service: SERVICE_NAME,
        version: env!("CARGO_PKG_VERSION"),
    })
}
