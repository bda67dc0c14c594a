//! Cross-instrument date alignment and Pearson correlation
//!
//! Series are inner-joined on date before correlating: a date missing from
//! any one series is dropped from all of them. A narrow date range can
//! therefore leave few (or no) shared dates. That degrades the matrix
//! into missing coefficients; it never raises.

use crate::data::PriceSeries;
use crate::error::{ForecastError, Result};
use chrono::NaiveDate;
use price_math::statistics::{is_constant, pearson};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Default number of shared dates below which a matrix is flagged sparse
pub const DEFAULT_MIN_OVERLAP: usize = 30;

/// Values of several series on the dates they all share
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlignedFrame {
    pub instruments: Vec<String>,
    pub dates: Vec<NaiveDate>,
    /// `columns[i][row]` is instrument `i` on `dates[row]`
    pub columns: Vec<Vec<f64>>,
}

/// Symmetric instrument-by-instrument correlation matrix
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationMatrix {
    pub instruments: Vec<String>,
    /// Row-major coefficients, `None` where undefined
    pub coefficients: Vec<Vec<Option<f64>>>,
    /// Number of dates that survived the join
    pub overlap: usize,
    /// Set when `overlap` fell below the engine's threshold
    pub sparse: bool,
}

/// Correlates aligned series, warning when the overlap is thin
#[derive(Debug, Clone, Copy)]
pub struct CorrelationEngine {
    min_overlap: usize,
}

impl AlignedFrame {
    pub fn column(&self, instrument: &str) -> Option<&[f64]> {
        self.instruments
            .iter()
            .position(|i| i == instrument)
            .map(|i| self.columns[i].as_slice())
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}

impl CorrelationMatrix {
    /// Coefficient between two instruments, `None` if undefined or unknown
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.instruments.iter().position(|x| x == a)?;
        let j = self.instruments.iter().position(|x| x == b)?;
        self.coefficients[i][j]
    }

    /// True when no coefficient could be computed
    pub fn is_all_missing(&self) -> bool {
        self.coefficients.iter().flatten().all(Option::is_none)
    }
}

impl Default for CorrelationEngine {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_OVERLAP)
    }
}

impl CorrelationEngine {
    pub fn new(min_overlap: usize) -> Self {
        Self { min_overlap }
    }

    pub fn min_overlap(&self) -> usize {
        self.min_overlap
    }

    /// Pearson correlation matrix of series of the same field
    pub fn correlate(&self, series: &[&PriceSeries]) -> Result<CorrelationMatrix> {
        let frame = align(series)?;
        let n = frame.instruments.len();
        let mut coefficients = vec![vec![None; n]; n];

        for i in 0..n {
            if frame.len() >= 2 && !is_constant(&frame.columns[i]) {
                coefficients[i][i] = Some(1.0);
            }
            for j in i + 1..n {
                let r = pearson(&frame.columns[i], &frame.columns[j])?;
                coefficients[i][j] = r;
                coefficients[j][i] = r;
            }
        }

        let sparse = frame.len() < self.min_overlap;
        if sparse {
            warn!(
                overlap = frame.len(),
                min_overlap = self.min_overlap,
                "few shared dates; correlation matrix may be unreliable"
            );
        }
        debug!(instruments = n, overlap = frame.len(), "correlated series");

        Ok(CorrelationMatrix {
            instruments: frame.instruments,
            coefficients,
            overlap: frame.dates.len(),
            sparse,
        })
    }
}

/// Inner-join series on date.
///
/// Fails only on malformed input: a repeated instrument or series of
/// different fields.
pub fn align(series: &[&PriceSeries]) -> Result<AlignedFrame> {
    let mut instruments: Vec<String> = Vec::with_capacity(series.len());
    for s in series {
        if instruments.iter().any(|i| i == s.instrument()) {
            return Err(ForecastError::InvalidParameter(format!(
                "Instrument '{}' appears more than once",
                s.instrument()
            )));
        }
        instruments.push(s.instrument().to_string());
    }
    if let Some(first) = series.first() {
        if let Some(other) = series.iter().find(|s| s.field() != first.field()) {
            return Err(ForecastError::InvalidParameter(format!(
                "Cannot correlate field '{}' with field '{}'",
                first.field(),
                other.field()
            )));
        }
    }

    let dates: Vec<NaiveDate> = match series.split_first() {
        Some((first, rest)) => first
            .dates()
            .into_iter()
            .filter(|d| rest.iter().all(|s| s.value_on(*d).is_some()))
            .collect(),
        None => Vec::new(),
    };

    let columns = series
        .iter()
        .map(|s| dates.iter().filter_map(|d| s.value_on(*d)).collect())
        .collect();

    Ok(AlignedFrame {
        instruments,
        dates,
        columns,
    })
}

/// Correlate with the default sparse-overlap threshold
pub fn correlate(series: &[&PriceSeries]) -> Result<CorrelationMatrix> {
    CorrelationEngine::default().correlate(series)
}
