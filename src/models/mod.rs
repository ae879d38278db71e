mod observation;
mod prediction;
mod requests;

pub use observation::{normalize_ticker, Observation, PricePoint};
pub use prediction::{PredictionResult, PREDICTION_CONFIDENCE, PREDICTION_METHOD};
pub use requests::{AddPriceRequest, HistoricalQuery, PredictRequest, DATE_FORMAT};
