use std::num::IntErrorKind;

use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::Value;

use crate::errors::AppError;
use crate::models::observation::{normalize_ticker, Observation};
use crate::validation::{SchemaViolation, ADD_PRICE_SCHEMA, PREDICT_SCHEMA};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Body of `POST /predict`, after validation.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictRequest {
    pub ticker: String,
}

impl PredictRequest {
    pub fn from_payload(payload: Option<&Value>) -> Result<Self, AppError> {
        let object = PREDICT_SCHEMA.check(payload).map_err(|v| match v {
            SchemaViolation::Missing => AppError::Validation("Missing ticker symbol".to_string()),
            SchemaViolation::WrongKind { .. } => invalid_ticker(),
        })?;

        let ticker = canonical_ticker(&object["ticker"])?;
        Ok(Self { ticker })
    }
}

/// Body of `POST /add_price`, after validation.
#[derive(Debug, Clone, PartialEq)]
pub struct AddPriceRequest {
    pub ticker: String,
    pub date: String,
    pub price: f64,
}

impl AddPriceRequest {
    pub fn from_payload(payload: Option<&Value>) -> Result<Self, AppError> {
        let object = ADD_PRICE_SCHEMA.check(payload).map_err(|v| match v {
            SchemaViolation::Missing => AppError::Validation(format!(
                "Missing required fields: {}",
                ADD_PRICE_SCHEMA.field_names()
            )),
            SchemaViolation::WrongKind { field, expected } => AppError::Validation(format!(
                "Invalid value for '{}': expected a {}",
                field,
                expected.name()
            )),
        })?;

        let ticker = canonical_ticker(&object["ticker"])?;

        let raw_date = object["date"].as_str().unwrap_or_default().trim();
        let date = NaiveDate::parse_from_str(raw_date, DATE_FORMAT)
            .map_err(|_| AppError::Validation(format!("Invalid date '{}': expected YYYY-MM-DD", raw_date)))?
            .format(DATE_FORMAT)
            .to_string();

        let price = object["price"]
            .as_f64()
            .ok_or_else(|| AppError::Validation("Invalid value for 'price': expected a number".to_string()))?;

        Ok(Self { ticker, date, price })
    }

    pub fn into_observation(self) -> Observation {
        Observation::new(&self.ticker, self.date, self.price)
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct HistoricalQuery {
    /// Kept as a string so a malformed value falls back to the default instead of rejecting.
    pub days: Option<String>,
}

impl HistoricalQuery {
    /// Row limit for a historical query. A negative result means "no limit": negative
    /// input is passed through and integers too large for `i64` become -1. Anything that
    /// is not an integer yields `default`.
    pub fn days_or(&self, default: i64) -> i64 {
        let Some(raw) = self.days.as_deref() else {
            return default;
        };
        match raw.trim().parse::<i64>() {
            Ok(days) => days,
            Err(e) if matches!(e.kind(), IntErrorKind::PosOverflow | IntErrorKind::NegOverflow) => -1,
            Err(_) => default,
        }
    }
}

fn canonical_ticker(value: &Value) -> Result<String, AppError> {
    let ticker = normalize_ticker(value.as_str().unwrap_or_default());
    if ticker.is_empty() {
        return Err(invalid_ticker());
    }
    Ok(ticker)
}

fn invalid_ticker() -> AppError {
    AppError::Validation("Invalid ticker symbol".to_string())
}
