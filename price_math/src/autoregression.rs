//! Autoregressive building blocks for ARIMA(p, d, 0) models
//!
//! Contains:
//! - Differencing and its inverse (re-integration of forecasts)
//! - AR(p) estimation by Yule-Walker (Levinson-Durbin recursion)
//! - AR(p) estimation by conditional least squares
//! - Stationarity check, recursive forecasting and psi weights
//!
//! Every estimator fits a model without a constant term, matching an
//! ARIMA with differencing and no drift.

use crate::{MathError, Result};
use serde::{Deserialize, Serialize};

/// Estimated AR(p) parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArFit {
    /// Coefficients phi_1..phi_p, phi_1 applying to the most recent value
    pub coefficients: Vec<f64>,
    /// Innovation (one-step prediction error) variance
    pub sigma2: f64,
}

/// Difference a series `order` times
pub fn difference(values: &[f64], order: usize) -> Vec<f64> {
    let mut result = values.to_vec();
    for _ in 0..order {
        result = result.windows(2).map(|w| w[1] - w[0]).collect();
    }
    result
}

/// Undo `order` rounds of differencing for values forecast past the end
/// of `history`.
///
/// Each level is rebuilt by a cumulative sum anchored on the last
/// observed value of that level.
pub fn integrate(history: &[f64], forecasts: &[f64], order: usize) -> Result<Vec<f64>> {
    if order == 0 {
        return Ok(forecasts.to_vec());
    }
    if history.len() < order {
        return Err(MathError::InsufficientData(format!(
            "Need at least {} historical values to undo differencing, have {}",
            order,
            history.len()
        )));
    }

    let mut result = forecasts.to_vec();
    for level in (0..order).rev() {
        let anchor = difference(history, level)
            .last()
            .copied()
            .ok_or_else(|| {
                MathError::InsufficientData("History too short to integrate".to_string())
            })?;

        let mut running = anchor;
        for value in result.iter_mut() {
            running += *value;
            *value = running;
        }
    }

    Ok(result)
}

/// Autocovariances about zero for lags `0..=max_lag`, biased (divided by n)
pub fn autocovariances(values: &[f64], max_lag: usize) -> Vec<f64> {
    let n = values.len();
    (0..=max_lag)
        .map(|lag| {
            if lag >= n {
                return 0.0;
            }
            let sum: f64 = (lag..n).map(|t| values[t] * values[t - lag]).sum();
            sum / n as f64
        })
        .collect()
}

/// Estimate AR(`order`) coefficients with the Yule-Walker equations,
/// solved by Levinson-Durbin recursion.
pub fn yule_walker(values: &[f64], order: usize) -> Result<ArFit> {
    if order == 0 {
        return Err(MathError::InvalidInput(
            "AR order must be greater than zero".to_string(),
        ));
    }
    if values.len() <= order {
        return Err(MathError::InsufficientData(format!(
            "Yule-Walker AR({}) needs more than {} values, have {}",
            order,
            order,
            values.len()
        )));
    }

    let acov = autocovariances(values, order);
    if acov[0] <= 0.0 || !acov[0].is_finite() {
        return Err(MathError::CalculationError(
            "Series has zero variance".to_string(),
        ));
    }

    let mut phi: Vec<f64> = Vec::with_capacity(order);
    let mut error = acov[0];

    for k in 1..=order {
        let mut acc = acov[k];
        for (j, coefficient) in phi.iter().enumerate() {
            acc -= coefficient * acov[k - 1 - j];
        }
        let reflection = acc / error;

        let previous = phi.clone();
        for j in 0..previous.len() {
            phi[j] = previous[j] - reflection * previous[previous.len() - 1 - j];
        }
        phi.push(reflection);

        error *= 1.0 - reflection * reflection;
        if error <= 0.0 || !error.is_finite() {
            return Err(MathError::CalculationError(format!(
                "Levinson-Durbin recursion broke down at lag {}",
                k
            )));
        }
    }

    Ok(ArFit {
        coefficients: phi,
        sigma2: error,
    })
}

/// Estimate AR(`order`) coefficients by conditional least squares:
/// regress each value on its `order` predecessors.
pub fn conditional_least_squares(values: &[f64], order: usize) -> Result<ArFit> {
    if order == 0 {
        return Err(MathError::InvalidInput(
            "AR order must be greater than zero".to_string(),
        ));
    }
    let rows = values.len().saturating_sub(order);
    if rows < order {
        return Err(MathError::InsufficientData(format!(
            "Least squares AR({}) needs at least {} values, have {}",
            order,
            2 * order,
            values.len()
        )));
    }

    // Normal equations X'X b = X'y with X[t] = [y(t-1), ..., y(t-order)]
    let mut xtx = vec![vec![0.0; order]; order];
    let mut xty = vec![0.0; order];
    for t in order..values.len() {
        for i in 0..order {
            let xi = values[t - 1 - i];
            xty[i] += xi * values[t];
            for j in 0..order {
                xtx[i][j] += xi * values[t - 1 - j];
            }
        }
    }

    let coefficients = solve_linear_system(xtx, xty)?;

    let ssr: f64 = (order..values.len())
        .map(|t| {
            let fitted: f64 = coefficients
                .iter()
                .enumerate()
                .map(|(i, c)| c * values[t - 1 - i])
                .sum();
            (values[t] - fitted).powi(2)
        })
        .sum();

    Ok(ArFit {
        coefficients,
        sigma2: ssr / rows as f64,
    })
}

/// Solve `a x = b` by Gaussian elimination with partial pivoting
pub fn solve_linear_system(mut a: Vec<Vec<f64>>, mut b: Vec<f64>) -> Result<Vec<f64>> {
    let n = b.len();
    if a.len() != n || a.iter().any(|row| row.len() != n) {
        return Err(MathError::InvalidInput(
            "Coefficient matrix must be square and match the right-hand side".to_string(),
        ));
    }

    let scale = a
        .iter()
        .flat_map(|row| row.iter())
        .fold(0.0f64, |acc, v| acc.max(v.abs()));
    let tolerance = scale * 1e-12;

    for col in 0..n {
        let pivot = (col..n)
            .max_by(|&i, &j| a[i][col].abs().total_cmp(&a[j][col].abs()))
            .unwrap_or(col);
        if a[pivot][col].abs() <= tolerance {
            return Err(MathError::CalculationError(
                "Singular matrix in least squares estimation".to_string(),
            ));
        }
        a.swap(col, pivot);
        b.swap(col, pivot);

        for row in col + 1..n {
            let factor = a[row][col] / a[col][col];
            for k in col..n {
                a[row][k] -= factor * a[col][k];
            }
            b[row] -= factor * b[col];
        }
    }

    let mut x = vec![0.0; n];
    for row in (0..n).rev() {
        let tail: f64 = (row + 1..n).map(|k| a[row][k] * x[k]).sum();
        x[row] = (b[row] - tail) / a[row][row];
    }

    Ok(x)
}

/// Check that an AR polynomial is stationary (all roots outside the unit
/// circle) by stepping the coefficients down to partial autocorrelations.
pub fn is_stationary(coefficients: &[f64]) -> bool {
    let mut phi = coefficients.to_vec();
    while let Some(&reflection) = phi.last() {
        if !reflection.is_finite() || reflection.abs() >= 1.0 {
            return false;
        }
        let k = phi.len();
        let denom = 1.0 - reflection * reflection;
        let lower: Vec<f64> = (0..k - 1)
            .map(|j| (phi[j] + reflection * phi[k - 2 - j]) / denom)
            .collect();
        phi = lower;
    }
    true
}

/// Recursive multi-step forecast of an AR process without constant
pub fn ar_forecast(history: &[f64], coefficients: &[f64], horizon: usize) -> Vec<f64> {
    let p = coefficients.len();
    let mut window: Vec<f64> = history[history.len().saturating_sub(p)..].to_vec();
    let mut forecasts = Vec::with_capacity(horizon);

    for _ in 0..horizon {
        let forecast: f64 = coefficients
            .iter()
            .zip(window.iter().rev())
            .map(|(c, v)| c * v)
            .sum();
        window.push(forecast);
        forecasts.push(forecast);
    }

    forecasts
}

/// AR coefficients on the undifferenced scale: expands
/// `(1 - phi_1 B - ... - phi_p B^p)(1 - B)^order`.
pub fn integrated_coefficients(coefficients: &[f64], order: usize) -> Vec<f64> {
    let mut poly: Vec<f64> = std::iter::once(1.0)
        .chain(coefficients.iter().map(|c| -c))
        .collect();

    for _ in 0..order {
        let mut next = vec![0.0; poly.len() + 1];
        for (i, a) in poly.iter().enumerate() {
            next[i] += a;
            next[i + 1] -= a;
        }
        poly = next;
    }

    poly.iter().skip(1).map(|a| -a).collect()
}

/// First `count` psi weights of the MA(infinity) representation of an AR
/// polynomial, psi_0 = 1.
pub fn psi_weights(coefficients: &[f64], count: usize) -> Vec<f64> {
    let mut psi: Vec<f64> = Vec::with_capacity(count);
    for j in 0..count {
        if j == 0 {
            psi.push(1.0);
            continue;
        }
        let value: f64 = coefficients
            .iter()
            .enumerate()
            .take(j)
            .map(|(i, c)| c * psi[j - 1 - i])
            .sum();
        psi.push(value);
    }
    psi
}
