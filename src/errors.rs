use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{context}: {source}")]
    Db {
        context: String,
        #[source]
        source: sqlx::Error,
    },
    #[error("{0}")]
    Validation(String),
    #[error("Insufficient data for {ticker}. Need at least 3 days of historical data.")]
    InsufficientData { ticker: String },
}

impl AppError {
    /// Store failure with the message prefix shown to the client.
    pub fn db(context: impl Into<String>, source: sqlx::Error) -> Self {
        AppError::Db {
            context: context.into(),
            source,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::InsufficientData { .. } => StatusCode::NOT_FOUND,
            AppError::Db { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match &self {
            AppError::Validation(msg) => json!({ "error": msg }),
            AppError::InsufficientData { ticker } => json!({
                "error": self.to_string(),
                "ticker": ticker,
                "prediction": null,
            }),
            AppError::Db { .. } => json!({ "error": self.to_string() }),
        };
        (status, Json(body)).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(value: sqlx::Error) -> Self {
        AppError::db("Internal server error", value)
    }
}
