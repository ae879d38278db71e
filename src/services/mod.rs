pub mod prediction_service;
pub mod price_service;
