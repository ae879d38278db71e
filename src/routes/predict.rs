use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use serde_json::Value;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::models::{PredictRequest, PredictionResult};
use crate::services;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/predict", post(predict))
}

/// POST /predict
///
/// Body: `{"ticker": "AAPL"}`. Responds 404 with `prediction: null` when fewer than three
/// observations are stored for the ticker.
#[axum::debug_handler]
pub async fn predict(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<PredictionResult>, AppError> {
    let body = payload.ok().map(|Json(v)| v);
    let request = PredictRequest::from_payload(body.as_ref())
        .map_err(|e| {
            warn!("POST /predict - Rejected request: {}", e);
            e
        })?;

    info!("POST /predict - Predicting next price for {}", request.ticker);
    let result = services::prediction_service::predict(&state.pool, &request.ticker).await?;
    Ok(Json(result))
}
