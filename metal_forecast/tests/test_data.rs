use chrono::NaiveDate;
use metal_forecast::data::{DataLoader, DuplicatePolicy, LoadOptions, SeriesStore};
use metal_forecast::ForecastError;
use pretty_assertions::assert_eq;
use std::io::Write;
use tempfile::NamedTempFile;

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn csv_file(lines: &[&str]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    for line in lines {
        writeln!(file, "{}", line).unwrap();
    }
    file
}

#[test]
fn test_data_loader_from_csv() {
    let file = csv_file(&[
        "Date,Open,High,Low,Close",
        "2023-01-03,100.0,105.0,98.0,103.0",
        "2023-01-01,103.0,107.0,101.0,106.0",
        "2023-01-02,106.0,110.0,104.0,108.0",
    ]);

    let table = DataLoader::from_csv("Gold", file.path(), &LoadOptions::default()).unwrap();

    assert_eq!(table.len(), 3);
    assert_eq!(table.fields(), &["Open", "High", "Low", "Close"]);
    assert_eq!(
        table.dates(),
        &[ymd(2023, 1, 1), ymd(2023, 1, 2), ymd(2023, 1, 3)]
    );
    assert_eq!(
        table.series("Close").unwrap().values(),
        vec![106.0, 108.0, 103.0]
    );
}

#[test]
fn test_timezone_offsets_collapse_to_local_date() {
    let file = csv_file(&[
        "Date,Price",
        "2021-03-01T23:00:00-05:00,10.0",
        "2021-03-02T08:00:00+09:00,11.0",
        "2021-03-02T01:00:00+00:00,12.0",
    ]);

    let table = DataLoader::from_csv("Gold", file.path(), &LoadOptions::default()).unwrap();

    // The two 2021-03-02 rows collapse; the later row wins
    let series = table.series("Price").unwrap();
    assert_eq!(series.dates(), vec![ymd(2021, 3, 1), ymd(2021, 3, 2)]);
    assert_eq!(series.values(), vec![10.0, 12.0]);
}

#[test]
fn test_reject_policy_fails_on_duplicates() {
    let file = csv_file(&["Date,Price", "2021-03-01,10.0", "2021-03-01,11.0"]);
    let options = LoadOptions {
        duplicates: DuplicatePolicy::Reject,
        ..LoadOptions::default()
    };

    let err = DataLoader::from_csv("Gold", file.path(), &options).unwrap_err();
    assert!(matches!(err, ForecastError::DataFormat(_)));
}

#[test]
fn test_missing_required_field() {
    let file = csv_file(&["Date,Price", "2021-03-01,10.0"]);
    let options = LoadOptions {
        fields: Some(vec!["Close".to_string()]),
        ..LoadOptions::default()
    };

    let err = DataLoader::from_csv("Gold", file.path(), &options).unwrap_err();
    assert!(matches!(err, ForecastError::DataFormat(msg) if msg.contains("Close")));
}

#[test]
fn test_unparseable_date() {
    let file = csv_file(&["Date,Price", "2021-03-01,10.0", "yesterday,11.0"]);

    let err = DataLoader::from_csv("Gold", file.path(), &LoadOptions::default()).unwrap_err();
    assert!(matches!(err, ForecastError::DataFormat(msg) if msg.contains("yesterday")));
}

#[test]
fn test_text_columns_are_skipped_unless_required() {
    let file = csv_file(&[
        "Date,Price,Change %",
        "2021-03-01,10.0,0.5%",
        "2021-03-02,11.0,-0.2%",
    ]);

    let table = DataLoader::from_csv("Gold", file.path(), &LoadOptions::default()).unwrap();
    assert_eq!(table.fields(), &["Price"]);

    let options = LoadOptions {
        fields: Some(vec!["Change %".to_string()]),
        ..LoadOptions::default()
    };
    assert!(DataLoader::from_csv("Gold", file.path(), &options).is_err());
}

#[test]
fn test_blank_cells_become_gaps() {
    let file = csv_file(&[
        "Date,Open,Close",
        "2021-03-01,10.0,10.5",
        "2021-03-02,,11.5",
        "2021-03-03,11.0,12.5",
    ]);

    let table = DataLoader::from_csv("Gold", file.path(), &LoadOptions::default()).unwrap();
    assert_eq!(table.series("Open").unwrap().len(), 2);
    assert_eq!(table.series("Close").unwrap().len(), 3);
    assert_eq!(table.column("Open").unwrap()[1], None);
}

#[test]
fn test_store_queries() {
    let gold = csv_file(&["Date,Open,Close", "2020-01-01,1.0,1.5", "2020-06-30,2.0,2.5"]);
    let silver = csv_file(&["Date,Close", "2020-02-01,3.0"]);

    let mut store = SeriesStore::new();
    let options = LoadOptions::default();
    store.load_csv("Gold", gold.path(), &options).unwrap();
    store.load_csv("Silver", silver.path(), &options).unwrap();

    assert_eq!(store.len(), 2);
    assert_eq!(store.common_fields(), vec!["Close".to_string()]);
    assert_eq!(
        store.date_span("Gold").unwrap(),
        Some((ymd(2020, 1, 1), ymd(2020, 6, 30)))
    );
    assert_eq!(store.fields("Gold").unwrap(), &["Open", "Close"]);
}

#[test]
fn test_data_loader_error_handling() {
    let result = DataLoader::from_csv("Gold", "nonexistent_file.csv", &LoadOptions::default());
    assert!(matches!(result, Err(ForecastError::IoError(_))));

    // No date column
    let file = csv_file(&["invalid,csv,format", "1,2,3"]);
    let result = DataLoader::from_csv("Gold", file.path(), &LoadOptions::default());
    assert!(matches!(result, Err(ForecastError::DataFormat(_))));
}

#[test]
fn test_late_thousands_separator_in_long_file() {
    // Plain prices for longer than a typical inference window, then
    // quoted thousands once the price crosses 1,000
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "Date,Price").unwrap();
    let start = ymd(2018, 1, 1);
    for i in 0..1200u64 {
        let date = start + chrono::Days::new(i);
        if i < 1100 {
            writeln!(file, "{},9{:02}.00", date, i % 100).unwrap();
        } else {
            writeln!(file, "{},\"1,0{:02}.00\"", date, i - 1100).unwrap();
        }
    }

    let table = DataLoader::from_csv("Platinum", file.path(), &LoadOptions::default()).unwrap();
    let prices = table.series("Price").unwrap();

    assert_eq!(prices.len(), 1200);
    assert_eq!(prices.values()[1099], 999.0);
    assert_eq!(prices.values()[1100], 1000.0);
    assert_eq!(prices.values()[1199], 1099.0);
}
