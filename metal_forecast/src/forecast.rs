//! Dated forecasts for a single filtered series

use crate::data::PriceSeries;
use crate::error::{ForecastError, Result};
use crate::models::arima::ArimaModel;
use crate::models::{ForecastModel, TrainedForecastModel};
use crate::utils::future_dates;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, Normal};
use tracing::debug;

/// One projected day
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub date: NaiveDate,
    pub value: f64,
    pub lower: Option<f64>,
    pub upper: Option<f64>,
}

/// Forecast result containing dated point predictions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastResult {
    pub instrument: String,
    pub field: String,
    /// Model label such as `ARIMA(5,1,0)`
    pub model: String,
    /// Fitted parameters of the model that produced the points
    pub coefficients: Vec<f64>,
    /// Confidence level of the interval bounds, if computed
    pub confidence_level: Option<f64>,
    pub points: Vec<ForecastPoint>,
}

impl ForecastResult {
    /// Get the forecasted values
    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.value).collect()
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.points.iter().map(|p| p.date).collect()
    }

    /// Get the number of periods forecasted
    pub fn horizon(&self) -> usize {
        self.points.len()
    }

    /// Serialize the result as JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Fits a fresh model per call and projects it onto calendar days
#[derive(Debug, Clone)]
pub struct ForecastEngine<M: ForecastModel = ArimaModel> {
    model: M,
    confidence_level: Option<f64>,
}

impl Default for ForecastEngine<ArimaModel> {
    fn default() -> Self {
        Self::new(ArimaModel::default())
    }
}

impl<M: ForecastModel> ForecastEngine<M> {
    pub fn new(model: M) -> Self {
        Self {
            model,
            confidence_level: None,
        }
    }

    /// Attach two-sided normal intervals at `level` to every point
    pub fn with_confidence_level(mut self, level: f64) -> Result<Self> {
        if !(level > 0.0 && level < 1.0) {
            return Err(ForecastError::InvalidParameter(format!(
                "Confidence level must be between 0 and 1, got {}",
                level
            )));
        }
        self.confidence_level = Some(level);
        Ok(self)
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    /// Forecast `horizon_days` consecutive calendar days after the last
    /// observation of `series`.
    ///
    /// The date index only orders the values; weekends and holidays
    /// absent from the input still get a projected point.
    pub fn forecast(&self, series: &PriceSeries, horizon_days: usize) -> Result<ForecastResult> {
        if horizon_days == 0 {
            return Err(ForecastError::InvalidParameter(
                "Forecast horizon must be at least one day".to_string(),
            ));
        }

        let trained = self.model.train(&series.values())?;
        let last = series.last_date().ok_or(ForecastError::InsufficientData {
            required: self.model.min_observations(),
            actual: 0,
        })?;

        let dates = future_dates(last, horizon_days)?;
        let values = trained.forecast(horizon_days)?;
        let bounds = match self.confidence_level {
            Some(level) => Some(self.interval_bounds(&trained, &values, level)?),
            None => None,
        };

        let points = dates
            .into_iter()
            .zip(values)
            .enumerate()
            .map(|(i, (date, value))| ForecastPoint {
                date,
                value,
                lower: bounds.as_ref().map(|b| b[i].0),
                upper: bounds.as_ref().map(|b| b[i].1),
            })
            .collect();

        debug!(
            instrument = series.instrument(),
            field = series.field(),
            horizon_days,
            "projected forecast"
        );

        Ok(ForecastResult {
            instrument: series.instrument().to_string(),
            field: series.field().to_string(),
            model: trained.name().to_string(),
            coefficients: trained.coefficients().to_vec(),
            confidence_level: self.confidence_level,
            points,
        })
    }

    fn interval_bounds(
        &self,
        trained: &M::Trained,
        values: &[f64],
        level: f64,
    ) -> Result<Vec<(f64, f64)>> {
        let normal = Normal::new(0.0, 1.0)
            .map_err(|e| ForecastError::InvalidParameter(format!("Normal distribution: {}", e)))?;
        let z = normal.inverse_cdf(0.5 + level / 2.0);
        let errors = trained.forecast_std_errors(values.len())?;

        Ok(values
            .iter()
            .zip(errors)
            .map(|(v, se)| (v - z * se, v + z * se))
            .collect())
    }
}

/// Forecast with the default ARIMA(5,1,0) model and no intervals
pub fn forecast(series: &PriceSeries, horizon_days: usize) -> Result<ForecastResult> {
    ForecastEngine::<ArimaModel>::default().forecast(series, horizon_days)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Observation;
    use chrono::Days;

    fn series(values: &[f64]) -> PriceSeries {
        let start = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
        let obs = values
            .iter()
            .enumerate()
            .map(|(i, v)| Observation::new(start + Days::new(i as u64), *v))
            .collect();
        PriceSeries::new("Gold", "Price", obs).unwrap()
    }

    const SAMPLE: [f64; 10] = [
        100.0, 101.0, 99.0, 102.0, 103.0, 101.0, 104.0, 105.0, 103.0, 106.0,
    ];

    #[test]
    fn test_zero_horizon_rejected() {
        let err = forecast(&series(&SAMPLE), 0).unwrap_err();
        assert!(matches!(err, ForecastError::InvalidParameter(_)));
    }

    #[test]
    fn test_empty_series_is_insufficient() {
        let err = forecast(&series(&[]), 3).unwrap_err();
        assert!(matches!(err, ForecastError::InsufficientData { actual: 0, .. }));
    }

    #[test]
    fn test_intervals_bracket_points() {
        let engine = ForecastEngine::<ArimaModel>::default()
            .with_confidence_level(0.95)
            .unwrap();
        let result = engine.forecast(&series(&SAMPLE), 4).unwrap();

        assert_eq!(result.confidence_level, Some(0.95));
        for point in &result.points {
            let (lower, upper) = (point.lower.unwrap(), point.upper.unwrap());
            assert!(lower < point.value && point.value < upper);
        }
    }

    #[test]
    fn test_invalid_confidence_level() {
        let engine = ForecastEngine::<ArimaModel>::default();
        assert!(engine.clone().with_confidence_level(1.0).is_err());
        assert!(engine.with_confidence_level(0.0).is_err());
    }

    #[test]
    fn test_result_json() {
        let result = forecast(&series(&SAMPLE), 2).unwrap();
        let json = result.to_json().unwrap();
        assert!(json.contains("\"model\":\"ARIMA(5,1,0)\""));
        assert!(json.contains("2023-01-11"));
        assert_eq!(result.coefficients.len(), 5);
    }
}
