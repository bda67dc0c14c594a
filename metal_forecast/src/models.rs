//! Forecasting models for price series

use crate::error::Result;
use std::fmt::Debug;

/// Trained forecast model
pub trait TrainedForecastModel: Debug {
    /// Point forecasts for the next `horizon` steps on the original scale
    fn forecast(&self, horizon: usize) -> Result<Vec<f64>>;

    /// Standard error of each of the next `horizon` point forecasts
    fn forecast_std_errors(&self, horizon: usize) -> Result<Vec<f64>>;

    /// Fitted model parameters
    fn coefficients(&self) -> &[f64];

    /// Name of the model
    fn name(&self) -> &str;
}

/// Forecast model that can be trained on a value sequence
pub trait ForecastModel: Debug + Clone {
    /// The type of trained model produced
    type Trained: TrainedForecastModel;

    /// Train the model on values ordered oldest first
    fn train(&self, values: &[f64]) -> Result<Self::Trained>;

    /// Fewest observations `train` accepts
    fn min_observations(&self) -> usize;

    /// Get the name of the model
    fn name(&self) -> &str;
}

pub mod arima;
