use chrono::NaiveDate;
use metal_forecast::error::ForecastError;
use metal_forecast::DateRange;
use price_math::MathError;
use std::io;

#[test]
fn test_error_conversion() {
    // IO errors convert through `?`
    let io_error = io::Error::new(io::ErrorKind::NotFound, "file not found");
    let forecast_error = ForecastError::from(io_error);
    assert!(matches!(forecast_error, ForecastError::IoError(_)));

    // Math kernel errors keep their message
    let math_error = MathError::InsufficientData("need 2 points".to_string());
    let forecast_error = ForecastError::from(math_error);
    match forecast_error {
        ForecastError::MathError(inner) => {
            assert_eq!(inner, MathError::InsufficientData("need 2 points".to_string()))
        }
        other => panic!("Expected MathError variant, got {:?}", other),
    }
}

#[test]
fn test_error_display() {
    let error = ForecastError::InvalidWindow(0);
    assert_eq!(error.to_string(), "Invalid window size 0: must be at least 1");

    let error = ForecastError::InsufficientData {
        required: 7,
        actual: 3,
    };
    assert_eq!(
        error.to_string(),
        "Insufficient data: need at least 7 observations, have 3"
    );

    let io_error = io::Error::new(io::ErrorKind::PermissionDenied, "permission denied");
    let error_string = ForecastError::from(io_error).to_string();
    assert!(error_string.contains("IO error"));
    assert!(error_string.contains("permission denied"));
}

#[test]
fn test_invalid_range_reports_bounds() {
    let start = NaiveDate::from_ymd_opt(2021, 12, 31).unwrap();
    let end = NaiveDate::from_ymd_opt(2021, 1, 1).unwrap();

    let error = DateRange::new(start, end).unwrap_err();
    assert!(matches!(error, ForecastError::InvalidRange { .. }));
    assert_eq!(
        error.to_string(),
        "Invalid range: start 2021-12-31 is after end 2021-01-01"
    );
}

#[test]
fn test_forecast_failure_classification() {
    assert!(ForecastError::ModelFit("constant series".to_string()).is_forecast_failure());
    assert!(ForecastError::InsufficientData {
        required: 7,
        actual: 0
    }
    .is_forecast_failure());
    assert!(!ForecastError::InvalidWindow(0).is_forecast_failure());
    assert!(!ForecastError::DataFormat("bad".to_string()).is_forecast_failure());
}
