//! # Price Math
//!
//! Numeric building blocks for price series analysis.
//! This crate provides the rolling means, descriptive statistics and
//! autoregressive estimators used by the forecasting core.

use thiserror::Error;

pub mod autoregression;
pub mod moving_averages;
pub mod statistics;

/// Errors that can occur in price series calculations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    #[error("Insufficient data for calculation: {0}")]
    InsufficientData(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Calculation error: {0}")]
    CalculationError(String),
}

/// Result type for price math operations
pub type Result<T> = std::result::Result<T, MathError>;
