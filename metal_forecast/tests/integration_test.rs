use chrono::NaiveDate;
use metal_forecast::export::DataTable;
use metal_forecast::summary::{box_summary, histogram, DEFAULT_BINS};
use metal_forecast::{
    correlate, forecast, moving_average, DateRange, ForecastError, LoadOptions, SeriesStore,
};
use std::io::Write;
use tempfile::{tempdir, NamedTempFile};

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

// Helper function to create one instrument's price file
fn create_sample_data(base: f64, step: f64) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();

    writeln!(file, "Date,Open,Close").unwrap();
    for day in 1..=31 {
        let wobble = [0.0, 1.5, -1.0, 0.5, -0.5][day % 5];
        let close = base + step * (day as f64 + wobble);
        writeln!(file, "2023-01-{:02},{:.4},{:.4}", day, close - step, close).unwrap();
    }

    file
}

fn sample_store(files: &[(&str, &NamedTempFile)]) -> SeriesStore {
    let mut store = SeriesStore::new();
    for (name, file) in files {
        store
            .load_csv(*name, file.path(), &LoadOptions::default())
            .unwrap();
    }
    store
}

#[test]
fn test_full_dashboard_workflow() {
    // 1. Create sample data files
    let gold_file = create_sample_data(1800.0, 2.0);
    let silver_file = create_sample_data(23.0, 0.05);

    // 2. Load data
    let store = sample_store(&[("Gold", &gold_file), ("Silver", &silver_file)]);
    assert_eq!(store.instruments(), vec!["Gold", "Silver"]);
    assert_eq!(store.common_fields(), vec!["Open", "Close"]);

    // 3. Restrict to a date range
    let range = DateRange::new(ymd(2023, 1, 5), ymd(2023, 1, 25)).unwrap();
    let gold = store.series("Gold", "Close").unwrap().filter(&range);
    let silver = store.series("Silver", "Close").unwrap().filter(&range);
    assert_eq!(gold.len(), 21);

    // 4. Smooth
    let smoothed = moving_average(&gold, 5).unwrap();
    assert_eq!(smoothed.len(), 21);
    assert_eq!(smoothed.values().iter().filter(|v| v.is_some()).count(), 17);

    // 5. Summaries
    let hist = histogram(&gold, DEFAULT_BINS).unwrap();
    assert_eq!(hist.total(), 21);
    let summary = box_summary(&gold).unwrap();
    assert!(summary.min <= summary.median && summary.median <= summary.max);

    // 6. Correlate; both series share one shape at different scales
    let matrix = correlate(&[&gold, &silver]).unwrap();
    assert_eq!(matrix.overlap, 21);
    assert!(matrix.sparse);
    assert!(matrix.get("Gold", "Silver").unwrap() > 0.9);

    // 7. Forecast
    let result = forecast(&gold, 15).unwrap();
    assert_eq!(result.horizon(), 15);
    assert_eq!(result.dates()[0], ymd(2023, 1, 26));

    // 8. Export
    let dir = tempdir().unwrap();
    let path = dir.path().join("filtered_data.csv");
    let table = DataTable::from_instrument(store.table("Gold").unwrap(), &range);
    table.export_csv(&path).unwrap();
    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.starts_with("Date,Open,Close\n2023-01-05,"));
    assert_eq!(text.lines().count(), 22);
}

#[test]
fn test_combined_export_labels_each_instrument() {
    let gold_file = create_sample_data(1800.0, 2.0);
    let silver_file = create_sample_data(23.0, 0.05);
    let store = sample_store(&[("Gold", &gold_file), ("Silver", &silver_file)]);

    let range = DateRange::new(ymd(2023, 1, 1), ymd(2023, 1, 2)).unwrap();
    let table = DataTable::combined(&store, &store.common_fields(), &range).unwrap();
    assert_eq!(table.len(), 4);

    let mut out = Vec::new();
    table.write_csv(&mut out).unwrap();
    let text = String::from_utf8(out).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "Date,Open,Close,Metal");
    assert!(lines[1].ends_with(",Gold"));
    assert!(lines[4].ends_with(",Silver"));
}

#[test]
fn test_narrow_range_degrades_gracefully() {
    let gold_file = create_sample_data(1800.0, 2.0);
    let store = sample_store(&[("Gold", &gold_file)]);

    let range = DateRange::new(ymd(2023, 1, 10), ymd(2023, 1, 12)).unwrap();
    let gold = store.series("Gold", "Close").unwrap().filter(&range);

    let err = forecast(&gold, 75).unwrap_err();
    assert!(err.is_forecast_failure());

    let smoothed = moving_average(&gold, 5).unwrap();
    assert!(smoothed.values().iter().all(Option::is_none));
}

#[test]
fn test_unknown_instrument_and_field() {
    let gold_file = create_sample_data(1800.0, 2.0);
    let store = sample_store(&[("Gold", &gold_file)]);

    assert!(matches!(
        store.series("Copper", "Close"),
        Err(ForecastError::InvalidParameter(_))
    ));
    assert!(matches!(
        store.series("Gold", "Volume"),
        Err(ForecastError::InvalidParameter(_))
    ));
}
