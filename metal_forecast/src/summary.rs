//! Distribution summaries behind the histogram and box plot panels

use crate::data::PriceSeries;
use crate::error::{ForecastError, Result};
use price_math::statistics::{self, FiveNumberSummary};
use serde::{Deserialize, Serialize};

/// Default number of histogram bins
pub const DEFAULT_BINS: usize = 30;

/// Equal-width histogram; `edges.len() == counts.len() + 1`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Histogram {
    pub edges: Vec<f64>,
    pub counts: Vec<usize>,
}

/// Basic descriptive statistics of a series
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Description {
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation, `None` below two observations
    pub std_dev: Option<f64>,
    pub min: f64,
    pub max: f64,
}

impl Histogram {
    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }
}

/// Bin the values of `series` into `bins` equal-width buckets over
/// `[min, max]`. The last bucket includes `max`.
pub fn histogram(series: &PriceSeries, bins: usize) -> Result<Histogram> {
    if bins == 0 {
        return Err(ForecastError::InvalidParameter(
            "Histogram needs at least one bin".to_string(),
        ));
    }

    let values = series.values();
    let (min, max) = match min_max(&values) {
        Some(bounds) => bounds,
        None => {
            return Ok(Histogram {
                edges: Vec::new(),
                counts: Vec::new(),
            })
        }
    };

    if min == max {
        return Ok(Histogram {
            edges: vec![min - 0.5, max + 0.5],
            counts: vec![values.len()],
        });
    }

    let width = (max - min) / bins as f64;
    let mut edges: Vec<f64> = (0..bins).map(|i| min + width * i as f64).collect();
    edges.push(max);

    let mut counts = vec![0usize; bins];
    for value in values {
        let slot = (((value - min) / width).floor() as usize).min(bins - 1);
        counts[slot] += 1;
    }

    Ok(Histogram { edges, counts })
}

/// Box plot summary, `None` for an empty series
pub fn box_summary(series: &PriceSeries) -> Option<FiveNumberSummary> {
    statistics::five_number_summary(&series.values()).ok()
}

/// Count, mean, spread and range, `None` for an empty series
pub fn describe(series: &PriceSeries) -> Option<Description> {
    let values = series.values();
    let (min, max) = min_max(&values)?;

    Some(Description {
        count: values.len(),
        mean: statistics::mean(&values)?,
        std_dev: statistics::std_dev(&values),
        min,
        max,
    })
}

fn min_max(values: &[f64]) -> Option<(f64, f64)> {
    let first = *values.first()?;
    Some(
        values
            .iter()
            .fold((first, first), |(lo, hi), v| (lo.min(*v), hi.max(*v))),
    )
}
