use approx::assert_abs_diff_eq;
use chrono::{Days, NaiveDate};
use metal_forecast::models::arima::TrainedArimaModel;
use metal_forecast::{
    forecast, ArEstimator, ArimaModel, ForecastEngine, ForecastError, ForecastModel, Observation,
    PriceSeries, TrainedForecastModel,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn series(values: &[f64]) -> PriceSeries {
    let start = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
    let observations = values
        .iter()
        .enumerate()
        .map(|(i, v)| Observation::new(start + Days::new(i as u64), *v))
        .collect();
    PriceSeries::new("Gold", "Close", observations).unwrap()
}

/// Upward drift of one unit per day with bounded noise
fn trending(len: usize, seed: u64) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut level = 1800.0;
    (0..len)
        .map(|_| {
            level += 1.0 + rng.gen_range(-0.3..0.3);
            level
        })
        .collect()
}

/// Random walk whose steps follow an AR(1) with coefficient `phi`
fn integrated_ar1(len: usize, phi: f64, seed: u64) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut step = 0.0;
    let mut level = 100.0;
    (0..len)
        .map(|_| {
            step = phi * step + rng.gen_range(-1.0..1.0);
            level += step;
            level
        })
        .collect()
}

#[test]
fn test_forecast_dates_are_contiguous() {
    let data = series(&trending(60, 7));
    let last = data.last_date().unwrap();
    let result = forecast(&data, 75).unwrap();

    assert_eq!(result.horizon(), 75);
    assert_eq!(result.model, "ARIMA(5,1,0)");
    for (i, date) in result.dates().into_iter().enumerate() {
        assert_eq!(date, last + Days::new(i as u64 + 1));
    }
    assert!(result.values().iter().all(|v| v.is_finite()));
}

#[test]
fn test_forecast_needs_seven_observations() {
    for len in 0..7 {
        let values: Vec<f64> = (0..len).map(|i| 100.0 + (i % 3) as f64).collect();
        let err = forecast(&series(&values), 5).unwrap_err();
        assert!(
            matches!(err, ForecastError::InsufficientData { required: 7, actual } if actual == len),
            "length {} gave {:?}",
            len,
            err
        );
    }
}

#[test]
fn test_least_squares_needs_more_data() {
    let model = ArimaModel::default().with_estimator(ArEstimator::ConditionalLeastSquares);
    let err = model
        .train(&[100.0, 101.0, 99.0, 102.0, 103.0, 101.0, 104.0, 105.0])
        .unwrap_err();
    assert!(matches!(
        err,
        ForecastError::InsufficientData {
            required: 11,
            actual: 8
        }
    ));
}

#[test]
fn test_degenerate_series_fail_to_fit() {
    let flat = series(&[42.0; 30]);
    let err = forecast(&flat, 3).unwrap_err();
    assert!(matches!(err, ForecastError::ModelFit(_)));
    assert!(err.is_forecast_failure());
}

#[test]
fn test_trend_continues_upward() {
    let values = trending(200, 11);
    let last = *values.last().unwrap();
    let result = forecast(&series(&values), 30).unwrap();

    let projected = result.values();
    assert!(projected[29] > last);
}

#[test]
fn test_recovers_ar_coefficient() {
    let values = integrated_ar1(3000, 0.6, 42);
    let model = ArimaModel::new(1, 1).unwrap();
    let trained: TrainedArimaModel = model.train(&values).unwrap();

    assert_abs_diff_eq!(trained.coefficients()[0], 0.6, epsilon = 0.08);
    assert_eq!(trained.name(), "ARIMA(1,1,0)");
}

#[test]
fn test_estimators_agree_on_long_series() {
    let values = integrated_ar1(3000, 0.5, 3);
    let yw = ArimaModel::new(1, 1).unwrap().train(&values).unwrap();
    let cls = ArimaModel::new(1, 1)
        .unwrap()
        .with_estimator(ArEstimator::ConditionalLeastSquares)
        .train(&values)
        .unwrap();

    assert_abs_diff_eq!(yw.coefficients()[0], cls.coefficients()[0], epsilon = 0.02);
}

#[test]
fn test_engine_intervals_widen() {
    let engine = ForecastEngine::new(ArimaModel::default())
        .with_confidence_level(0.95)
        .unwrap();
    let result = engine.forecast(&series(&trending(120, 5)), 10).unwrap();

    let widths: Vec<f64> = result
        .points
        .iter()
        .map(|p| p.upper.unwrap() - p.lower.unwrap())
        .collect();
    assert!(widths.windows(2).all(|w| w[1] >= w[0] - 1e-9));
}

#[test]
fn test_forecast_is_deterministic() {
    let data = series(&trending(80, 9));
    assert_eq!(forecast(&data, 15).unwrap(), forecast(&data, 15).unwrap());
}
