//! Closed date ranges and range filtering

use crate::data::PriceSeries;
use crate::error::{ForecastError, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Inclusive `[start, end]` date interval with `start <= end`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

/// A series restricted to a date range
pub type FilteredSeries = PriceSeries;

impl DateRange {
    /// Create a range, rejecting `start > end`
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(ForecastError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

impl PriceSeries {
    /// Observations dated within `range`, as a new series
    pub fn filter(&self, range: &DateRange) -> FilteredSeries {
        let observations = self.observations();
        // Dates are sorted, so the window is a contiguous slice
        let lo = observations.partition_point(|o| o.date < range.start());
        let hi = observations.partition_point(|o| o.date <= range.end());
        let kept = if lo < hi {
            observations[lo..hi].to_vec()
        } else {
            Vec::new()
        };
        self.derived(kept)
    }
}

/// Keep the observations of `series` with `start <= date <= end`
pub fn filter(series: &PriceSeries, start: NaiveDate, end: NaiveDate) -> Result<FilteredSeries> {
    let range = DateRange::new(start, end)?;
    Ok(series.filter(&range))
}
