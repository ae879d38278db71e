use sqlx::SqlitePool;
use tracing::{error, info};

use crate::db::observation_queries;
use crate::errors::AppError;
use crate::models::{AddPriceRequest, PricePoint};

pub const DEFAULT_HISTORY_DAYS: i64 = 10;

pub async fn get_history(pool: &SqlitePool, ticker: &str, days: i64)
                         -> Result<Vec<PricePoint>, AppError> {
    observation_queries::fetch_recent_with_dates(pool, ticker, days).await
        .map_err(|e| {
            error!("Failed to fetch price history for ticker {}: {}", ticker, e);
            AppError::db("Error fetching historical data", e)
        })
}

pub async fn add_price(pool: &SqlitePool, request: AddPriceRequest)
                       -> Result<(), AppError> {
    let obs = request.into_observation();
    observation_queries::upsert_replace(pool, &obs.ticker, &obs.date, obs.price).await
        .map_err(|e| {
            error!("Failed to store price for ticker {} on {}: {}", obs.ticker, obs.date, e);
            AppError::db("Error adding stock price", e)
        })?;
    info!("Stored {} @ {} for {}", obs.price, obs.date, obs.ticker);
    Ok(())
}

pub async fn list_tickers(pool: &SqlitePool) -> Result<Vec<String>, AppError> {
    observation_queries::fetch_tickers(pool).await
        .map_err(|e| {
            error!("Failed to fetch tickers: {}", e);
            AppError::db("Error fetching tickers", e)
        })
}

/// Creates the table and, when asked, loads the sample observations.
pub async fn initialize_store(pool: &SqlitePool, seed: bool) -> Result<(), AppError> {
    observation_queries::init_schema(pool).await?;
    if seed {
        observation_queries::seed_sample_data(pool).await?;
    }
    Ok(())
}
