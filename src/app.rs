use axum::Router;
use tower_http::cors::CorsLayer;

use crate::routes::{health, predict, prices};
use crate::state::AppState;

pub fn create_app(state: AppState) -> Router {
    Router::<AppState>::new()
        .merge(health::router())
        .merge(predict::router())
        .merge(prices::router())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
