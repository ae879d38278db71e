use serde::{Deserialize, Serialize};

pub const PREDICTION_METHOD: &str = "Moving Average (3-day) with Trend Adjustment";
pub const PREDICTION_CONFIDENCE: &str = "Medium (Rule-based prediction)";

/// Next-value forecast for a ticker. Derived on every call, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub ticker: String,
    /// Forecast price, rounded to 2 decimals.
    pub prediction: f64,
    /// The prices the forecast was built from, most recent first.
    pub historical_prices: Vec<f64>,
    /// Mean of `historical_prices`, rounded to 2 decimals.
    pub moving_average: f64,
    pub method: String,
    pub confidence: String,
}
