//! Tabular views of filtered data and delimited-file export

use crate::data::{InstrumentTable, SeriesStore};
use crate::error::{ForecastError, Result};
use crate::range::DateRange;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::Path;
use tracing::info;

/// Default file name of an export
pub const DEFAULT_EXPORT_FILE: &str = "filtered_data.csv";

/// One dated row of a data table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableRow {
    pub date: NaiveDate,
    /// Instrument label, set only for combined tables
    pub metal: Option<String>,
    pub values: Vec<Option<f64>>,
}

/// Rows restricted to a date range, ready to display or export
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataTable {
    pub columns: Vec<String>,
    pub rows: Vec<TableRow>,
}

impl DataTable {
    /// Every field of one instrument within `range`
    pub fn from_instrument(table: &InstrumentTable, range: &DateRange) -> Self {
        let columns = table.fields().to_vec();
        let rows = Self::rows_in_range(table, &columns, range, None);
        Self { columns, rows }
    }

    /// The given fields of every instrument within `range`, stacked one
    /// instrument after another and labelled with the instrument name
    pub fn combined(store: &SeriesStore, fields: &[String], range: &DateRange) -> Result<Self> {
        let mut rows = Vec::new();
        for instrument in store.instruments() {
            let table = store.table(instrument)?;
            if let Some(missing) = fields.iter().find(|f| table.column(f).is_none()) {
                return Err(ForecastError::InvalidParameter(format!(
                    "Instrument '{}' has no field '{}'",
                    instrument, missing
                )));
            }
            rows.extend(Self::rows_in_range(
                table,
                fields,
                range,
                Some(instrument.to_string()),
            ));
        }

        Ok(Self {
            columns: fields.to_vec(),
            rows,
        })
    }

    fn rows_in_range(
        table: &InstrumentTable,
        fields: &[String],
        range: &DateRange,
        metal: Option<String>,
    ) -> Vec<TableRow> {
        let columns: Vec<&[Option<f64>]> = fields
            .iter()
            .filter_map(|f| table.column(f))
            .collect();

        table
            .dates()
            .iter()
            .enumerate()
            .filter(|(_, date)| range.contains(**date))
            .map(|(row, date)| TableRow {
                date: *date,
                metal: metal.clone(),
                values: columns.iter().map(|c| c[row]).collect(),
            })
            .collect()
    }

    fn is_combined(&self) -> bool {
        self.rows.iter().any(|r| r.metal.is_some())
    }

    /// Write the table as CSV: `Date`, the value columns, then `Metal`
    /// for combined tables. Blank cells stay blank.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let combined = self.is_combined();
        let mut csv = csv::Writer::from_writer(writer);

        let mut header = vec!["Date".to_string()];
        header.extend(self.columns.iter().cloned());
        if combined {
            header.push("Metal".to_string());
        }
        csv.write_record(&header)?;

        for row in &self.rows {
            let mut record = vec![row.date.format("%Y-%m-%d").to_string()];
            record.extend(
                row.values
                    .iter()
                    .map(|v| v.map(|v| v.to_string()).unwrap_or_default()),
            );
            if combined {
                record.push(row.metal.clone().unwrap_or_default());
            }
            csv.write_record(&record)?;
        }

        csv.flush()?;
        Ok(())
    }

    /// Write the table to `path`, replacing any existing file
    pub fn export_csv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let file = std::fs::File::create(path)?;
        self.write_csv(file)?;
        info!(path = %path.display(), rows = self.rows.len(), "exported data table");
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
