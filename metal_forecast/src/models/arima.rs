//! ARIMA(p, d, 0) models for price forecasting

use crate::error::{ForecastError, Result};
use crate::models::{ForecastModel, TrainedForecastModel};
use price_math::autoregression::{
    ar_forecast, conditional_least_squares, difference, integrate, integrated_coefficients,
    is_stationary, psi_weights, yule_walker, ArFit,
};
use price_math::statistics::is_constant;
use price_math::MathError;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Autoregressive order of the dashboard model
pub const DEFAULT_AR_ORDER: usize = 5;
/// Differencing order of the dashboard model
pub const DEFAULT_DIFFERENCING: usize = 1;

/// How the AR coefficients of the differenced series are estimated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArEstimator {
    /// Yule-Walker equations via Levinson-Durbin
    #[default]
    YuleWalker,
    /// Conditional least squares on lagged values
    ConditionalLeastSquares,
}

/// ARIMA model (AutoRegressive Integrated, no moving-average terms)
#[derive(Debug, Clone, PartialEq)]
pub struct ArimaModel {
    /// Name of the model
    name: String,
    /// AR order (p)
    p: usize,
    /// Differencing order (d)
    d: usize,
    estimator: ArEstimator,
}

/// Trained ARIMA model
#[derive(Debug, Clone)]
pub struct TrainedArimaModel {
    name: String,
    d: usize,
    fit: ArFit,
    /// Values on the original scale
    history: Vec<f64>,
    /// `history` differenced `d` times
    differenced: Vec<f64>,
}

impl ArimaModel {
    /// Create a new ARIMA(p, d, 0) model
    pub fn new(p: usize, d: usize) -> Result<Self> {
        if p == 0 {
            return Err(ForecastError::InvalidParameter(
                "AR order must be at least 1".to_string(),
            ));
        }
        if d > 2 {
            return Err(ForecastError::InvalidParameter(
                "Differencing order must be <= 2".to_string(),
            ));
        }

        Ok(Self {
            name: format!("ARIMA({},{},0)", p, d),
            p,
            d,
            estimator: ArEstimator::default(),
        })
    }

    /// Use a different coefficient estimator
    pub fn with_estimator(mut self, estimator: ArEstimator) -> Self {
        self.estimator = estimator;
        self
    }

    pub fn ar_order(&self) -> usize {
        self.p
    }

    pub fn differencing(&self) -> usize {
        self.d
    }

    pub fn estimator(&self) -> ArEstimator {
        self.estimator
    }

    fn fit_error(err: MathError) -> ForecastError {
        ForecastError::ModelFit(err.to_string())
    }
}

impl Default for ArimaModel {
    fn default() -> Self {
        Self {
            name: format!("ARIMA({},{},0)", DEFAULT_AR_ORDER, DEFAULT_DIFFERENCING),
            p: DEFAULT_AR_ORDER,
            d: DEFAULT_DIFFERENCING,
            estimator: ArEstimator::default(),
        }
    }
}

impl ForecastModel for ArimaModel {
    type Trained = TrainedArimaModel;

    fn train(&self, values: &[f64]) -> Result<TrainedArimaModel> {
        let required = self.min_observations();
        if values.len() < required {
            return Err(ForecastError::InsufficientData {
                required,
                actual: values.len(),
            });
        }
        if values.iter().any(|v| !v.is_finite()) {
            return Err(ForecastError::ModelFit(
                "Series contains non-finite values".to_string(),
            ));
        }

        let differenced = difference(values, self.d);
        if is_constant(&differenced) {
            return Err(ForecastError::ModelFit(format!(
                "Series is constant after differencing {} time(s)",
                self.d
            )));
        }

        let fit = match self.estimator {
            ArEstimator::YuleWalker => yule_walker(&differenced, self.p),
            ArEstimator::ConditionalLeastSquares => conditional_least_squares(&differenced, self.p),
        }
        .map_err(Self::fit_error)?;

        if fit.coefficients.iter().any(|c| !c.is_finite()) {
            return Err(ForecastError::ModelFit(
                "Estimated coefficients are not finite".to_string(),
            ));
        }
        if !is_stationary(&fit.coefficients) {
            return Err(ForecastError::ModelFit(
                "Estimated AR polynomial is not stationary".to_string(),
            ));
        }
        if !(fit.sigma2.is_finite() && fit.sigma2 > 0.0) {
            return Err(ForecastError::ModelFit(
                "Residual variance is degenerate".to_string(),
            ));
        }

        info!(
            model = %self.name,
            observations = values.len(),
            coefficients = ?fit.coefficients,
            sigma2 = fit.sigma2,
            "fitted model"
        );

        Ok(TrainedArimaModel {
            name: self.name.clone(),
            d: self.d,
            fit,
            history: values.to_vec(),
            differenced,
        })
    }

    fn min_observations(&self) -> usize {
        match self.estimator {
            // One more point than the AR and differencing orders together
            ArEstimator::YuleWalker => self.p + self.d + 1,
            // p lags plus at least p regression rows
            ArEstimator::ConditionalLeastSquares => 2 * self.p + self.d,
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl TrainedArimaModel {
    /// Innovation variance
    pub fn sigma2(&self) -> f64 {
        self.fit.sigma2
    }
}

impl TrainedForecastModel for TrainedArimaModel {
    fn forecast(&self, horizon: usize) -> Result<Vec<f64>> {
        let steps = ar_forecast(&self.differenced, &self.fit.coefficients, horizon);
        integrate(&self.history, &steps, self.d).map_err(ArimaModel::fit_error)
    }

    fn forecast_std_errors(&self, horizon: usize) -> Result<Vec<f64>> {
        let levels = integrated_coefficients(&self.fit.coefficients, self.d);
        let psi = psi_weights(&levels, horizon);

        let mut cumulative = 0.0;
        Ok(psi
            .iter()
            .map(|w| {
                cumulative += w * w;
                (self.fit.sigma2 * cumulative).sqrt()
            })
            .collect())
    }

    fn coefficients(&self) -> &[f64] {
        &self.fit.coefficients
    }

    fn name(&self) -> &str {
        &self.name
    }
}
