use serde::Serialize;
use sqlx::FromRow;

// One stored (ticker, date, price) record. (ticker, date) is unique in the store.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub ticker: String,
    pub date: String, // YYYY-MM-DD, sorts lexicographically == chronologically
    pub price: f64,
}

impl Observation {
    pub fn new(ticker: &str, date: impl Into<String>, price: f64) -> Self {
        Self {
            ticker: normalize_ticker(ticker),
            date: date.into(),
            price,
        }
    }
}

/// A dated price as returned by historical queries.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct PricePoint {
    pub date: String,
    pub price: f64,
}

/// Canonical form of a ticker: surrounding whitespace removed, upper-cased.
pub fn normalize_ticker(raw: &str) -> String {
    raw.trim().to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_ticker() {
        assert_eq!(normalize_ticker("aapl"), "AAPL");
        assert_eq!(normalize_ticker("  Tsla "), "TSLA");
        assert_eq!(normalize_ticker("BRK.b"), "BRK.B");
        assert_eq!(normalize_ticker("   "), "");
    }

    #[test]
    fn test_observation_new_canonicalizes_ticker() {
        let obs = Observation::new("googl", "2024-10-01", 2750.50);
        assert_eq!(obs.ticker, "GOOGL");
        assert_eq!(obs.date, "2024-10-01");
    }
}
