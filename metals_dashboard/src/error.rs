//! Error types for the metals_dashboard crate

use metal_forecast::ForecastError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DashboardError {
    /// Configuration file could not be read
    #[error("Failed to read config file: {0}")]
    ConfigRead(#[from] std::io::Error),

    /// Configuration file is not valid TOML for [`crate::DashboardConfig`]
    #[error("Failed to parse config file: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Configuration values out of their accepted bounds
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Selection names an unknown instrument or field, or an out-of-bounds setting
    #[error("Invalid selection: {0}")]
    InvalidSelection(String),

    #[error(transparent)]
    Forecast(#[from] ForecastError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type with our custom error
pub type Result<T> = std::result::Result<T, DashboardError>;
