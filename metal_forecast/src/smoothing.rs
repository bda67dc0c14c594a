//! Trailing moving averages over filtered series

use crate::data::PriceSeries;
use crate::error::{ForecastError, Result};
use chrono::NaiveDate;
use price_math::moving_averages::rolling_mean;
use serde::{Deserialize, Serialize};

/// One smoothed value; `None` until the window has filled
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SmoothedPoint {
    pub date: NaiveDate,
    pub value: Option<f64>,
}

/// Moving average of a series on the same date index
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SmoothedSeries {
    pub instrument: String,
    pub field: String,
    pub window: usize,
    pub points: Vec<SmoothedPoint>,
}

impl SmoothedSeries {
    pub fn values(&self) -> Vec<Option<f64>> {
        self.points.iter().map(|p| p.value).collect()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Trailing simple moving average of `series` over `window` observations.
///
/// The first `window - 1` points have no value; a partial average is never
/// reported.
pub fn moving_average(series: &PriceSeries, window: usize) -> Result<SmoothedSeries> {
    if window < 1 {
        return Err(ForecastError::InvalidWindow(window));
    }

    let means = rolling_mean(&series.values(), window)?;
    let points = series
        .observations()
        .iter()
        .zip(means)
        .map(|(obs, value)| SmoothedPoint {
            date: obs.date,
            value,
        })
        .collect();

    Ok(SmoothedSeries {
        instrument: series.instrument().to_string(),
        field: series.field().to_string(),
        window,
        points,
    })
}
