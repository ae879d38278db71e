use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::models::{normalize_ticker, AddPriceRequest, HistoricalQuery, PricePoint};
use crate::services;
use crate::services::price_service::DEFAULT_HISTORY_DAYS;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/historical/:ticker", get(get_historical))
        .route("/add_price", post(add_price))
        .route("/tickers", get(get_tickers))
}

#[derive(Debug, Serialize)]
pub struct HistoricalResponse {
    pub ticker: String,
    pub historical_data: Vec<PricePoint>,
    pub count: usize,
}

#[derive(Debug, Serialize)]
pub struct TickersResponse {
    pub tickers: Vec<String>,
    pub count: usize,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

pub async fn get_historical(
    Path(ticker): Path<String>,
    query: Result<Query<HistoricalQuery>, QueryRejection>,
    State(state): State<AppState>,
) -> Result<Json<HistoricalResponse>, AppError> {
    let ticker = normalize_ticker(&ticker);
    let query = query
        .map(|Query(q)| q)
        .unwrap_or_else(|e| {
            warn!("GET /historical/{} - Ignoring malformed query string: {}", ticker, e);
            HistoricalQuery::default()
        });
    let days = query.days_or(DEFAULT_HISTORY_DAYS);
    info!("GET /historical/{} - Getting observations (days={})", ticker, days);

    let historical_data = services::price_service::get_history(&state.pool, &ticker, days).await?;
    Ok(Json(HistoricalResponse {
        count: historical_data.len(),
        ticker,
        historical_data,
    }))
}

pub async fn add_price(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<MessageResponse>, AppError> {
    let body = payload.ok().map(|Json(v)| v);
    let request = AddPriceRequest::from_payload(body.as_ref())
        .map_err(|e| {
            warn!("POST /add_price - Rejected request: {}", e);
            e
        })?;

    info!("POST /add_price - Storing price for {} on {}", request.ticker, request.date);
    services::price_service::add_price(&state.pool, request).await?;
    Ok(Json(MessageResponse {
        message: "Stock price added successfully".to_string(),
    }))
}

pub async fn get_tickers(
    State(state): State<AppState>,
) -> Result<Json<TickersResponse>, AppError> {
    info!("GET /tickers - Listing available tickers");
    let tickers = services::price_service::list_tickers(&state.pool).await?;
    Ok(Json(TickersResponse {
        count: tickers.len(),
        tickers,
    }))
}
