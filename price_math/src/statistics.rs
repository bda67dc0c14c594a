//! Descriptive statistics over plain `f64` slices
//!
//! Functions that can be undefined for a given input (an empty slice, a
//! constant series) return `Option` instead of an error.

use crate::{MathError, Result};
use serde::{Deserialize, Serialize};

/// Arithmetic mean, `None` for an empty slice
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }

    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Variance with `ddof` delta degrees of freedom (0 = population, 1 = sample)
pub fn variance(values: &[f64], ddof: usize) -> Option<f64> {
    if values.len() <= ddof {
        return None;
    }

    let mean = mean(values)?;
    let ss: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();

    Some(ss / (values.len() - ddof) as f64)
}

/// Sample standard deviation
pub fn std_dev(values: &[f64]) -> Option<f64> {
    variance(values, 1).map(f64::sqrt)
}

/// True when every value equals the first one (or the slice is empty)
pub fn is_constant(values: &[f64]) -> bool {
    match values.first() {
        Some(first) => values.iter().all(|v| v == first),
        None => true,
    }
}

/// Pearson correlation coefficient of two aligned samples.
///
/// Returns `Ok(None)` when the coefficient is undefined: fewer than two
/// pairs or zero variance on either side. The result is clamped to
/// `[-1, 1]` to absorb rounding.
pub fn pearson(x: &[f64], y: &[f64]) -> Result<Option<f64>> {
    if x.len() != y.len() {
        return Err(MathError::InvalidInput(format!(
            "Samples must have the same length ({} vs {})",
            x.len(),
            y.len()
        )));
    }

    if x.len() < 2 || is_constant(x) || is_constant(y) {
        return Ok(None);
    }

    let n = x.len() as f64;
    let mean_x = x.iter().sum::<f64>() / n;
    let mean_y = y.iter().sum::<f64>() / n;

    let mut sxy = 0.0;
    let mut sxx = 0.0;
    let mut syy = 0.0;
    for (a, b) in x.iter().zip(y) {
        let dx = a - mean_x;
        let dy = b - mean_y;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }

    let denom = (sxx * syy).sqrt();
    if denom == 0.0 || !denom.is_finite() {
        return Ok(None);
    }

    Ok(Some((sxy / denom).clamp(-1.0, 1.0)))
}

/// Quantile of an ascending-sorted slice using linear interpolation
/// between closest ranks.
pub fn quantile_sorted(sorted: &[f64], q: f64) -> Result<f64> {
    if sorted.is_empty() {
        return Err(MathError::InsufficientData(
            "Cannot take a quantile of an empty sample".to_string(),
        ));
    }
    if !(0.0..=1.0).contains(&q) {
        return Err(MathError::InvalidInput(format!(
            "Quantile must be within [0, 1], got {}",
            q
        )));
    }

    let position = q * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let fraction = position - lower as f64;

    Ok(sorted[lower] + (sorted[upper] - sorted[lower]) * fraction)
}

/// Five-number summary with Tukey whiskers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FiveNumberSummary {
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
    /// Smallest value within 1.5 IQR below `q1`
    pub lower_whisker: f64,
    /// Largest value within 1.5 IQR above `q3`
    pub upper_whisker: f64,
    /// Values beyond the whiskers, ascending
    pub outliers: Vec<f64>,
}

/// Compute the five-number summary of an unsorted sample
pub fn five_number_summary(values: &[f64]) -> Result<FiveNumberSummary> {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let q1 = quantile_sorted(&sorted, 0.25)?;
    let median = quantile_sorted(&sorted, 0.5)?;
    let q3 = quantile_sorted(&sorted, 0.75)?;
    let iqr = q3 - q1;
    let low_fence = q1 - 1.5 * iqr;
    let high_fence = q3 + 1.5 * iqr;

    let inside = sorted
        .iter()
        .copied()
        .filter(|v| *v >= low_fence && *v <= high_fence);
    let lower_whisker = inside.clone().next().unwrap_or(q1);
    let upper_whisker = inside.last().unwrap_or(q3);

    let outliers = sorted
        .iter()
        .copied()
        .filter(|v| *v < low_fence || *v > high_fence)
        .collect();

    Ok(FiveNumberSummary {
        min: sorted[0],
        q1,
        median,
        q3,
        max: sorted[sorted.len() - 1],
        lower_whisker,
        upper_whisker,
        outliers,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_mean_and_variance() {
        let data = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert_eq!(mean(&data), Some(5.0));
        assert_eq!(variance(&data, 0), Some(4.0));
        assert_relative_eq!(std_dev(&data).unwrap(), (32.0f64 / 7.0).sqrt());

        assert_eq!(mean(&[]), None);
        assert_eq!(variance(&[1.0], 1), None);
    }

    #[test]
    fn test_pearson_perfect_relationships() {
        let x = [1.0, 2.0, 3.0, 4.0, 5.0];
        let up = [2.0, 4.0, 6.0, 8.0, 10.0];
        let down = [10.0, 8.0, 6.0, 4.0, 2.0];

        assert_relative_eq!(pearson(&x, &up).unwrap().unwrap(), 1.0);
        assert_relative_eq!(pearson(&x, &down).unwrap().unwrap(), -1.0);
    }

    #[test]
    fn test_pearson_undefined_cases() {
        assert_eq!(pearson(&[1.0], &[2.0]).unwrap(), None);
        assert_eq!(pearson(&[0.1, 0.1, 0.1], &[1.0, 2.0, 3.0]).unwrap(), None);
        assert!(pearson(&[1.0, 2.0], &[1.0]).is_err());
    }

    #[test]
    fn test_quantiles_interpolate() {
        let sorted = [1.0, 2.0, 3.0, 4.0];
        assert_relative_eq!(quantile_sorted(&sorted, 0.25).unwrap(), 1.75);
        assert_relative_eq!(quantile_sorted(&sorted, 0.5).unwrap(), 2.5);
        assert_relative_eq!(quantile_sorted(&sorted, 1.0).unwrap(), 4.0);
        assert!(quantile_sorted(&sorted, 1.5).is_err());
        assert!(quantile_sorted(&[], 0.5).is_err());
    }

    #[test]
    fn test_five_number_summary_with_outlier() {
        let values = [7.0, 1.0, 3.0, 2.0, 5.0, 4.0, 6.0, 100.0];
        let summary = five_number_summary(&values).unwrap();

        assert_eq!(summary.min, 1.0);
        assert_eq!(summary.max, 100.0);
        assert_relative_eq!(summary.q1, 2.75);
        assert_relative_eq!(summary.median, 4.5);
        assert_relative_eq!(summary.q3, 6.25);
        assert_eq!(summary.lower_whisker, 1.0);
        assert_eq!(summary.upper_whisker, 7.0);
        assert_eq!(summary.outliers, vec![100.0]);
    }
}
