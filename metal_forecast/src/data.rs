//! Price table loading and the in-memory series store

use crate::error::{ForecastError, Result};
use crate::utils::{normalize_date, parse_number};
use chrono::NaiveDate;
use polars::prelude::{CsvReader, DataFrame, DataType, SerReader, Series};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::Path;
use tracing::{debug, info, warn};

/// A single dated price
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub date: NaiveDate,
    pub value: f64,
}

impl Observation {
    pub fn new(date: NaiveDate, value: f64) -> Self {
        Self { date, value }
    }
}

/// One price field of one instrument, ordered by strictly increasing date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    instrument: String,
    field: String,
    observations: Vec<Observation>,
}

/// What to do when a table carries the same date more than once
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// Later rows replace earlier rows for the same date
    #[default]
    KeepLast,
    /// Fail the load
    Reject,
}

/// Options controlling how a raw table becomes price series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadOptions {
    /// Name of the date column
    pub date_column: String,
    /// Fields that must be present; `None` takes every numeric column
    pub fields: Option<Vec<String>>,
    pub duplicates: DuplicatePolicy,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            date_column: "Date".to_string(),
            fields: None,
            duplicates: DuplicatePolicy::default(),
        }
    }
}

/// Every field of one instrument, row-aligned on a shared date index
#[derive(Debug, Clone, PartialEq)]
pub struct InstrumentTable {
    instrument: String,
    dates: Vec<NaiveDate>,
    fields: Vec<String>,
    /// `columns[f][row]`, `None` for a blank cell
    columns: Vec<Vec<Option<f64>>>,
    series: Vec<PriceSeries>,
}

/// Data loader for price tables
#[derive(Debug)]
pub struct DataLoader;

/// Holds the loaded tables of every instrument.
///
/// Built once by the composition root and passed around by reference;
/// tables are never mutated after insertion.
#[derive(Debug, Clone, Default)]
pub struct SeriesStore {
    tables: Vec<InstrumentTable>,
}

impl PriceSeries {
    /// Create a series from observations already in strictly increasing
    /// date order
    pub fn new(
        instrument: impl Into<String>,
        field: impl Into<String>,
        observations: Vec<Observation>,
    ) -> Result<Self> {
        if let Some(pair) = observations.windows(2).find(|w| w[0].date >= w[1].date) {
            return Err(ForecastError::DataFormat(format!(
                "Dates must be strictly increasing: {} is followed by {}",
                pair[0].date, pair[1].date
            )));
        }
        if let Some(obs) = observations.iter().find(|o| !o.value.is_finite()) {
            return Err(ForecastError::DataFormat(format!(
                "Non-finite value on {}",
                obs.date
            )));
        }

        Ok(Self {
            instrument: instrument.into(),
            field: field.into(),
            observations,
        })
    }

    /// Create a series from observations in any order, applying `policy`
    /// to repeated dates
    pub fn from_unsorted(
        instrument: impl Into<String>,
        field: impl Into<String>,
        mut observations: Vec<Observation>,
        policy: DuplicatePolicy,
    ) -> Result<Self> {
        // Stable sort keeps input order among equal dates
        observations.sort_by_key(|o| o.date);
        let keep = dedup_indices(
            &observations.iter().map(|o| o.date).collect::<Vec<_>>(),
            policy,
        )?;
        let observations = keep.into_iter().map(|i| observations[i]).collect();
        Self::new(instrument, field, observations)
    }

    /// Derive a series sharing this one's labels
    pub(crate) fn derived(&self, observations: Vec<Observation>) -> Self {
        Self {
            instrument: self.instrument.clone(),
            field: self.field.clone(),
            observations,
        }
    }

    pub fn instrument(&self) -> &str {
        &self.instrument
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.observations.iter().map(|o| o.date).collect()
    }

    pub fn values(&self) -> Vec<f64> {
        self.observations.iter().map(|o| o.value).collect()
    }

    /// Value observed on `date`, if any
    pub fn value_on(&self, date: NaiveDate) -> Option<f64> {
        self.observations
            .binary_search_by_key(&date, |o| o.date)
            .ok()
            .map(|i| self.observations[i].value)
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.observations.first().map(|o| o.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.observations.last().map(|o| o.date)
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }
}

/// Indices to keep from an ascending date list under `policy`
fn dedup_indices(dates: &[NaiveDate], policy: DuplicatePolicy) -> Result<Vec<usize>> {
    let mut keep: Vec<usize> = Vec::with_capacity(dates.len());
    let mut dropped = 0usize;

    for (i, date) in dates.iter().enumerate() {
        let previous = keep.last().copied();
        match previous {
            Some(prev) if dates[prev] == *date => match policy {
                DuplicatePolicy::Reject => {
                    return Err(ForecastError::DataFormat(format!(
                        "Duplicate date {}",
                        date
                    )));
                }
                DuplicatePolicy::KeepLast => {
                    if let Some(slot) = keep.last_mut() {
                        *slot = i;
                    }
                    dropped += 1;
                }
            },
            _ => keep.push(i),
        }
    }

    if dropped > 0 {
        warn!(dropped, "collapsed duplicate dates, keeping the last row of each");
    }

    Ok(keep)
}

impl DataLoader {
    /// Load one instrument's price table from a CSV file
    pub fn from_csv<P: AsRef<Path>>(
        instrument: &str,
        path: P,
        options: &LoadOptions,
    ) -> Result<InstrumentTable> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let df = CsvReader::new(file)
            .infer_schema(None)
            .has_header(true)
            .finish()
            .map_err(|e| {
                ForecastError::DataFormat(format!("Cannot read {}: {}", path.display(), e))
            })?;

        debug!(instrument, path = %path.display(), rows = df.height(), "read csv");
        Self::from_dataframe(instrument, &df, options)
    }

    /// Build one instrument's price table from an existing DataFrame
    pub fn from_dataframe(
        instrument: &str,
        df: &DataFrame,
        options: &LoadOptions,
    ) -> Result<InstrumentTable> {
        let raw_dates = Self::date_column(df, &options.date_column)?;
        let (fields, raw_columns) = Self::field_columns(df, options)?;

        // Sort rows by date, stable so duplicates keep file order
        let mut order: Vec<usize> = (0..raw_dates.len()).collect();
        order.sort_by_key(|&i| raw_dates[i]);
        let sorted_dates: Vec<NaiveDate> = order.iter().map(|&i| raw_dates[i]).collect();
        let keep = dedup_indices(&sorted_dates, options.duplicates)?;
        let rows: Vec<usize> = keep.iter().map(|&k| order[k]).collect();

        let dates: Vec<NaiveDate> = rows.iter().map(|&i| raw_dates[i]).collect();
        let columns: Vec<Vec<Option<f64>>> = raw_columns
            .iter()
            .map(|column| rows.iter().map(|&i| column[i]).collect())
            .collect();

        let series = fields
            .iter()
            .zip(&columns)
            .map(|(field, column)| {
                let observations = dates
                    .iter()
                    .zip(column)
                    .filter_map(|(date, value)| value.map(|v| Observation::new(*date, v)))
                    .collect();
                PriceSeries::new(instrument, field.as_str(), observations)
            })
            .collect::<Result<Vec<_>>>()?;

        info!(
            instrument,
            rows = dates.len(),
            fields = fields.len(),
            "loaded price table"
        );

        Ok(InstrumentTable {
            instrument: instrument.to_string(),
            dates,
            fields,
            columns,
            series,
        })
    }

    /// Parse the date column into naive calendar dates
    fn date_column(df: &DataFrame, name: &str) -> Result<Vec<NaiveDate>> {
        let column = df.column(name).map_err(|_| {
            ForecastError::DataFormat(format!("Date column '{}' not found", name))
        })?;
        let text = column.cast(&DataType::Utf8)?;

        text.utf8()?
            .into_iter()
            .enumerate()
            .map(|(row, cell)| {
                let cell = cell.unwrap_or("");
                normalize_date(cell).ok_or_else(|| {
                    ForecastError::DataFormat(format!(
                        "Unparseable date '{}' in column '{}' at row {}",
                        cell,
                        name,
                        row + 1
                    ))
                })
            })
            .collect()
    }

    /// Resolve the field columns to load and read their values
    fn field_columns(
        df: &DataFrame,
        options: &LoadOptions,
    ) -> Result<(Vec<String>, Vec<Vec<Option<f64>>>)> {
        let mut fields = Vec::new();
        let mut columns = Vec::new();

        match &options.fields {
            Some(required) => {
                for name in required {
                    let column = df.column(name).map_err(|_| {
                        ForecastError::DataFormat(format!("Required column '{}' not found", name))
                    })?;
                    columns.push(Self::numeric_values(column)?);
                    fields.push(name.clone());
                }
            }
            None => {
                for column in df.get_columns() {
                    if column.name() == options.date_column {
                        continue;
                    }
                    match Self::numeric_values(column) {
                        Ok(values) => {
                            fields.push(column.name().to_string());
                            columns.push(values);
                        }
                        Err(e) => warn!(column = column.name(), error = %e, "skipping column"),
                    }
                }
            }
        }

        if fields.is_empty() {
            return Err(ForecastError::DataFormat(
                "No numeric price columns found".to_string(),
            ));
        }

        Ok((fields, columns))
    }

    /// Read a column as optional floats; text columns must hold numbers
    fn numeric_values(column: &Series) -> Result<Vec<Option<f64>>> {
        let dtype = column.dtype();
        if dtype.is_numeric() {
            let floats = column.cast(&DataType::Float64)?;
            return Ok(floats
                .f64()?
                .into_iter()
                .map(|v| v.filter(|v| v.is_finite()))
                .collect());
        }

        if *dtype != DataType::Utf8 {
            return Err(ForecastError::DataFormat(format!(
                "Column '{}' has non-numeric type {}",
                column.name(),
                dtype
            )));
        }

        column
            .utf8()?
            .into_iter()
            .map(|cell| {
                parse_number(cell.unwrap_or("")).map_err(|_| {
                    ForecastError::DataFormat(format!(
                        "Column '{}' holds non-numeric value '{}'",
                        column.name(),
                        cell.unwrap_or("")
                    ))
                })
            })
            .collect()
    }
}

impl InstrumentTable {
    pub fn instrument(&self) -> &str {
        &self.instrument
    }

    /// Field names in column order
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Row dates, ascending and unique
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// Raw cells of `field`, aligned with `dates()`
    pub fn column(&self, field: &str) -> Option<&[Option<f64>]> {
        self.fields
            .iter()
            .position(|f| f == field)
            .map(|i| self.columns[i].as_slice())
    }

    /// The observed values of `field` as a series
    pub fn series(&self, field: &str) -> Option<&PriceSeries> {
        self.series.iter().find(|s| s.field() == field)
    }

    /// First and last date of the table
    pub fn date_span(&self) -> Option<(NaiveDate, NaiveDate)> {
        Some((*self.dates.first()?, *self.dates.last()?))
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}

impl SeriesStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load an instrument from CSV and add it to the store
    pub fn load_csv<P: AsRef<Path>>(
        &mut self,
        instrument: &str,
        path: P,
        options: &LoadOptions,
    ) -> Result<()> {
        let table = DataLoader::from_csv(instrument, path, options)?;
        self.insert(table);
        Ok(())
    }

    /// Add a table, replacing any table of the same instrument
    pub fn insert(&mut self, table: InstrumentTable) {
        match self
            .tables
            .iter_mut()
            .find(|t| t.instrument == table.instrument)
        {
            Some(existing) => *existing = table,
            None => self.tables.push(table),
        }
    }

    /// Instrument names in insertion order
    pub fn instruments(&self) -> Vec<&str> {
        self.tables.iter().map(|t| t.instrument()).collect()
    }

    pub fn table(&self, instrument: &str) -> Result<&InstrumentTable> {
        self.tables
            .iter()
            .find(|t| t.instrument == instrument)
            .ok_or_else(|| {
                ForecastError::InvalidParameter(format!("Unknown instrument '{}'", instrument))
            })
    }

    pub fn series(&self, instrument: &str, field: &str) -> Result<&PriceSeries> {
        self.table(instrument)?.series(field).ok_or_else(|| {
            ForecastError::InvalidParameter(format!(
                "Instrument '{}' has no field '{}'",
                instrument, field
            ))
        })
    }

    pub fn fields(&self, instrument: &str) -> Result<&[String]> {
        Ok(self.table(instrument)?.fields())
    }

    /// Fields present for every instrument, in the first table's order
    pub fn common_fields(&self) -> Vec<String> {
        let Some((first, rest)) = self.tables.split_first() else {
            return Vec::new();
        };

        first
            .fields
            .iter()
            .filter(|f| rest.iter().all(|t| t.fields.contains(f)))
            .cloned()
            .collect()
    }

    /// First and last date of an instrument's table
    pub fn date_span(&self, instrument: &str) -> Result<Option<(NaiveDate, NaiveDate)>> {
        Ok(self.table(instrument)?.date_span())
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}
