use sqlx::SqlitePool;
use tracing::{error, info, warn};

use crate::db::observation_queries;
use crate::errors::AppError;
use crate::models::{normalize_ticker, PredictionResult, PREDICTION_CONFIDENCE, PREDICTION_METHOD};

/// Number of most recent observations a forecast is built from.
pub const WINDOW: u32 = 3;

/// Weight applied to the latest first difference.
pub const TREND_FACTOR: f64 = 0.1;

/// Forecast the next price for `ticker` from the current store contents.
///
/// Fewer than [`WINDOW`] stored observations is reported as
/// [`AppError::InsufficientData`], which is an expected outcome for unknown tickers.
pub async fn predict(pool: &SqlitePool, ticker: &str) -> Result<PredictionResult, AppError> {
    let ticker = normalize_ticker(ticker);

    let prices = observation_queries::fetch_recent_prices(pool, &ticker, WINDOW)
        .await
        .map_err(|e| {
            error!("Failed to fetch recent prices for ticker {}: {}", ticker, e);
            AppError::db(format!("Error predicting price for {}", ticker), e)
        })?;

    match forecast(&ticker, &prices) {
        Ok(result) => {
            info!(
                "Predicted {} for {} (moving average {})",
                result.prediction, ticker, result.moving_average
            );
            Ok(result)
        }
        Err(e) => {
            warn!("Cannot predict {}: {} observation(s) stored", ticker, prices.len());
            Err(e)
        }
    }
}

/// Moving average of the window plus a fraction of the latest trend.
///
/// `prices` must be most recent first. Only the first [`WINDOW`] values are used.
pub fn forecast(ticker: &str, prices: &[f64]) -> Result<PredictionResult, AppError> {
    let window = WINDOW as usize;
    if prices.len() < window {
        return Err(AppError::InsufficientData {
            ticker: ticker.to_string(),
        });
    }
    let recent = &prices[..window];

    let moving_average = recent.iter().sum::<f64>() / window as f64;
    let trend = recent[0] - recent[1];
    let predicted = moving_average + trend * TREND_FACTOR;

    Ok(PredictionResult {
        ticker: ticker.to_string(),
        prediction: round_half_even(predicted, 2),
        historical_prices: recent.to_vec(),
        moving_average: round_half_even(moving_average, 2),
        method: PREDICTION_METHOD.to_string(),
        confidence: PREDICTION_CONFIDENCE.to_string(),
    })
}

/// Rounds to `decimals` places, breaking exact ties toward the even neighbour.
///
/// Rounding is done on the exact binary value through the formatter, so a value stored
/// just below a midpoint (100.13499999999999) rounds down. Scaling by `10^decimals` in f64
/// first would turn it into a false tie.
pub fn round_half_even(value: f64, decimals: usize) -> f64 {
    format!("{:.*}", decimals, value).parse().unwrap_or(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::connect_in_memory;

    async fn seeded_pool() -> SqlitePool {
        let pool = connect_in_memory().await.unwrap();
        observation_queries::init_schema(&pool).await.unwrap();
        observation_queries::seed_sample_data(&pool).await.unwrap();
        pool
    }

    #[test]
    fn test_round_half_even_ties() {
        assert_eq!(round_half_even(0.125, 2), 0.12);
        assert_eq!(round_half_even(0.375, 2), 0.38);
        assert_eq!(round_half_even(2.5, 0), 2.0);
        assert_eq!(round_half_even(3.5, 0), 4.0);
        assert_eq!(round_half_even(-0.125, 2), -0.12);
    }

    #[test]
    fn test_round_half_even_non_ties() {
        assert_eq!(round_half_even(247.16666666666666, 2), 247.17);
        assert_eq!(round_half_even(2778.7666666666664, 2), 2778.77);
        assert_eq!(round_half_even(150.75, 2), 150.75);
    }

    #[test]
    fn test_round_half_even_values_near_midpoint() {
        // Neither literal is exactly representable: 0.015 is stored just below the
        // midpoint and 0.005 just above it.
        assert_eq!(round_half_even(0.015, 2), 0.01);
        assert_eq!(round_half_even(0.005, 2), 0.01);
        assert_eq!(round_half_even(100.13499999999999, 2), 100.13);
    }

    #[test]
    fn test_forecast_prediction_just_below_midpoint() {
        // average 100.19, trend -0.55 -> 100.13499999999999 in f64
        let result = forecast("X", &[100.01, 100.56, 100.0]).unwrap();
        assert_eq!(result.moving_average, 100.19);
        assert_eq!(result.prediction, 100.13);
    }

    #[test]
    fn test_forecast_aapl_sample() {
        let result = forecast("AAPL", &[151.20, 148.75, 152.30]).unwrap();
        assert_eq!(result.moving_average, 150.75);
        assert_eq!(result.prediction, 151.0);
        assert_eq!(result.historical_prices, vec![151.2, 148.75, 152.3]);
        assert_eq!(result.method, "Moving Average (3-day) with Trend Adjustment");
        assert_eq!(result.confidence, "Medium (Rule-based prediction)");
    }

    #[test]
    fn test_forecast_downward_trend() {
        // trend = 9 - 10 = -1, average = 10
        let result = forecast("X", &[9.0, 10.0, 11.0]).unwrap();
        assert_eq!(result.moving_average, 10.0);
        assert_eq!(result.prediction, 9.9);
    }

    #[test]
    fn test_forecast_flat_series() {
        let result = forecast("X", &[42.0, 42.0, 42.0]).unwrap();
        assert_eq!(result.prediction, 42.0);
        assert_eq!(result.moving_average, 42.0);
    }

    #[test]
    fn test_forecast_uses_only_window() {
        let result = forecast("X", &[3.0, 3.0, 3.0, 1000.0]).unwrap();
        assert_eq!(result.historical_prices, vec![3.0, 3.0, 3.0]);
        assert_eq!(result.prediction, 3.0);
    }

    #[test]
    fn test_forecast_insufficient() {
        for prices in [&[][..], &[1.0][..], &[1.0, 2.0][..]] {
            match forecast("MSFT", prices) {
                Err(AppError::InsufficientData { ticker }) => assert_eq!(ticker, "MSFT"),
                other => panic!("expected insufficient data, got {:?}", other),
            }
        }
    }

    #[tokio::test]
    async fn test_predict_seeded_tickers() {
        let pool = seeded_pool().await;

        let aapl = predict(&pool, "AAPL").await.unwrap();
        assert_eq!(aapl.ticker, "AAPL");
        assert_eq!(aapl.moving_average, 150.75);
        assert_eq!(aapl.prediction, 151.0);

        let tsla = predict(&pool, "TSLA").await.unwrap();
        assert_eq!(tsla.historical_prices, vec![250.45, 242.15, 248.90]);
        assert_eq!(tsla.moving_average, 247.17);
        assert_eq!(tsla.prediction, 248.0);

        let googl = predict(&pool, "GOOGL").await.unwrap();
        assert_eq!(googl.moving_average, 2778.77);
        assert_eq!(googl.prediction, 2781.22);
    }

    #[tokio::test]
    async fn test_predict_is_case_insensitive() {
        let pool = seeded_pool().await;
        let lower = predict(&pool, "aapl").await.unwrap();
        let upper = predict(&pool, "AAPL").await.unwrap();
        assert_eq!(lower, upper);
        assert_eq!(lower.ticker, "AAPL");
    }

    #[tokio::test]
    async fn test_predict_reflects_latest_write() {
        let pool = seeded_pool().await;
        observation_queries::upsert_replace(&pool, "AAPL", "2024-10-05", 160.0)
            .await
            .unwrap();

        let result = predict(&pool, "AAPL").await.unwrap();
        assert_eq!(result.historical_prices, vec![160.0, 151.2, 148.75]);
    }

    #[tokio::test]
    async fn test_predict_unknown_and_short_tickers() {
        let pool = seeded_pool().await;
        assert!(matches!(
            predict(&pool, "invalid").await,
            Err(AppError::InsufficientData { ticker }) if ticker == "INVALID"
        ));

        observation_queries::upsert_replace(&pool, "NEW", "2024-10-01", 10.0).await.unwrap();
        observation_queries::upsert_replace(&pool, "NEW", "2024-10-02", 11.0).await.unwrap();
        assert!(matches!(
            predict(&pool, "NEW").await,
            Err(AppError::InsufficientData { .. })
        ));
    }

    #[tokio::test]
    async fn test_predict_store_failure() {
        let pool = seeded_pool().await;
        pool.close().await;
        match predict(&pool, "aapl").await {
            Err(err @ AppError::Db { .. }) => {
                assert!(err.to_string().starts_with("Error predicting price for AAPL: "));
            }
            other => panic!("expected store error, got {:?}", other),
        }
    }
}
