//! Error types for the metal_forecast crate

use chrono::NaiveDate;
use polars::prelude::PolarsError;
use thiserror::Error;

/// Custom error types for the metal_forecast crate
#[derive(Debug, Error)]
pub enum ForecastError {
    /// Input table is malformed: missing or unparseable columns
    #[error("Data format error: {0}")]
    DataFormat(String),

    /// Range start lies after its end
    #[error("Invalid range: start {start} is after end {end}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },

    /// Moving average window below one
    #[error("Invalid window size {0}: must be at least 1")]
    InvalidWindow(usize),

    /// Too few observations for the forecast model
    #[error("Insufficient data: need at least {required} observations, have {actual}")]
    InsufficientData { required: usize, actual: usize },

    /// Model estimation failed or the series is degenerate
    #[error("Model fit error: {0}")]
    ModelFit(String),

    /// Error from invalid parameters
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Error from IO operations
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Error from CSV writing
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    /// Error from JSON serialization
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// Error from Polars operations
    #[error("Polars error: {0}")]
    PolarsError(String),

    /// Error from the numeric kernels
    #[error("Math error: {0}")]
    MathError(#[from] price_math::MathError),
}

impl ForecastError {
    /// True for failures raised while fitting or projecting a model.
    ///
    /// The dashboard reports these as a notice instead of aborting.
    pub fn is_forecast_failure(&self) -> bool {
        matches!(
            self,
            ForecastError::InsufficientData { .. } | ForecastError::ModelFit(_)
        )
    }
}

/// Result type with our custom error
pub type Result<T> = std::result::Result<T, ForecastError>;

impl From<PolarsError> for ForecastError {
    fn from(err: PolarsError) -> Self {
        ForecastError::PolarsError(err.to_string())
    }
}
