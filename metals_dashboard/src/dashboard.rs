//! The dashboard: a loaded store plus the evaluation of one selection
//! into every panel's data

use crate::config::{check_window, check_years, horizon_days, DashboardConfig};
use crate::error::{DashboardError, Result};
use chrono::NaiveDate;
use metal_forecast::export::DataTable;
use metal_forecast::summary::{box_summary, describe, histogram, Description, Histogram};
use metal_forecast::{
    moving_average, ArimaModel, CorrelationEngine, CorrelationMatrix, DateRange, ForecastEngine,
    ForecastResult, PriceSeries, SeriesStore, SmoothedSeries,
};
use price_math::statistics::FiveNumberSummary;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, info, warn};

/// Which instruments a view covers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetalChoice {
    Single(String),
    /// Every loaded instrument at once
    All,
}

impl FromStr for MetalChoice {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("all") {
            Ok(MetalChoice::All)
        } else {
            Ok(MetalChoice::Single(s.to_string()))
        }
    }
}

impl fmt::Display for MetalChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetalChoice::Single(name) => write!(f, "{}", name),
            MetalChoice::All => write!(f, "All"),
        }
    }
}

/// Everything the user picks for one view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Selection {
    pub metal: MetalChoice,
    /// Price field; the first available field when unset
    pub field: Option<String>,
    /// Range bounds; the span of the viewed data when unset
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub window: usize,
    pub forecast_years: usize,
}

impl Selection {
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    pub fn with_range(mut self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        self.start = start;
        self.end = end;
        self
    }

    pub fn with_window(mut self, window: usize) -> Self {
        self.window = window;
        self
    }

    pub fn with_forecast_years(mut self, years: usize) -> Self {
        self.forecast_years = years;
        self
    }
}

/// Per-instrument panel data
#[derive(Debug, Clone, Serialize)]
pub struct SeriesPanel {
    /// Filtered series behind the trend line
    pub series: PriceSeries,
    pub smoothed: SmoothedSeries,
    pub histogram: Histogram,
    pub box_summary: Option<FiveNumberSummary>,
    pub description: Option<Description>,
}

/// What the forecast panel shows
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ForecastOutcome {
    Forecast { result: ForecastResult },
    /// The model could not be fit to the selected data
    Notice { message: String },
    /// Forecasting does not apply to the combined view
    Unavailable { message: String },
}

/// Every derived artifact of one selection
#[derive(Debug, Clone, Serialize)]
pub struct DashboardView {
    pub metal: MetalChoice,
    pub field: String,
    pub range: DateRange,
    pub window: usize,
    pub panels: Vec<SeriesPanel>,
    /// Only for the combined view
    pub correlation: Option<CorrelationMatrix>,
    pub forecast: ForecastOutcome,
    pub table: DataTable,
}

impl DashboardView {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Loaded price history plus the settings views are evaluated with
#[derive(Debug, Clone)]
pub struct Dashboard {
    store: SeriesStore,
    config: DashboardConfig,
}

impl Dashboard {
    /// Load every configured instrument once
    pub fn from_config(config: DashboardConfig) -> Result<Self> {
        config.validate()?;
        let options = config.load_options();
        let mut store = SeriesStore::new();
        for source in &config.instruments {
            store.load_csv(&source.name, &source.path, &options)?;
        }

        info!(instruments = store.len(), "dashboard ready");
        Ok(Self { store, config })
    }

    /// Wrap an already populated store
    pub fn from_store(store: SeriesStore, config: DashboardConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { store, config })
    }

    pub fn store(&self) -> &SeriesStore {
        &self.store
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    /// A selection seeded with the configured defaults
    pub fn selection(&self, metal: MetalChoice) -> Selection {
        Selection {
            metal,
            field: None,
            start: None,
            end: None,
            window: self.config.defaults.window,
            forecast_years: self.config.defaults.forecast_years,
        }
    }

    /// Fields offered for a choice: the instrument's own, or those every
    /// instrument shares
    pub fn fields(&self, metal: &MetalChoice) -> Result<Vec<String>> {
        match metal {
            MetalChoice::Single(name) => Ok(self.store.fields(name)?.to_vec()),
            MetalChoice::All => Ok(self.store.common_fields()),
        }
    }

    /// Evaluate a selection into a view.
    ///
    /// Malformed selections are rejected before anything is computed. A
    /// forecast that cannot be fit is reported in the view, not as an error.
    pub fn evaluate(&self, selection: &Selection) -> Result<DashboardView> {
        check_window(selection.window).map_err(DashboardError::InvalidSelection)?;
        check_years(selection.forecast_years).map_err(DashboardError::InvalidSelection)?;

        let instruments = self.instruments(&selection.metal)?;
        let field = self.resolve_field(selection)?;
        let range = self.resolve_range(selection, &instruments)?;

        let series: Vec<PriceSeries> = instruments
            .iter()
            .map(|name| -> Result<PriceSeries> {
                Ok(self.store.series(name, &field)?.filter(&range))
            })
            .collect::<Result<_>>()?;

        let panels = series
            .iter()
            .map(|s| self.panel(s, selection.window))
            .collect::<Result<Vec<_>>>()?;

        let (correlation, forecast, table) = match &selection.metal {
            MetalChoice::All => {
                let refs: Vec<&PriceSeries> = series.iter().collect();
                let matrix = CorrelationEngine::new(self.config.defaults.min_overlap)
                    .correlate(&refs)?;
                let table = DataTable::combined(&self.store, &self.store.common_fields(), &range)?;
                let outcome = ForecastOutcome::Unavailable {
                    message: "Select a single metal to see its forecast".to_string(),
                };
                (Some(matrix), outcome, table)
            }
            MetalChoice::Single(name) => {
                let outcome = self.forecast_outcome(&series[0], selection.forecast_years)?;
                let table = DataTable::from_instrument(self.store.table(name)?, &range);
                (None, outcome, table)
            }
        };

        debug!(
            metal = %selection.metal,
            field = %field,
            start = %range.start(),
            end = %range.end(),
            "evaluated selection"
        );

        Ok(DashboardView {
            metal: selection.metal.clone(),
            field,
            range,
            window: selection.window,
            panels,
            correlation,
            forecast,
            table,
        })
    }

    /// Write a view's data table as CSV
    pub fn export<P: AsRef<Path>>(&self, view: &DashboardView, path: P) -> Result<()> {
        view.table.export_csv(path)?;
        Ok(())
    }

    fn instruments(&self, metal: &MetalChoice) -> Result<Vec<String>> {
        match metal {
            MetalChoice::Single(name) => {
                self.store.table(name)?;
                Ok(vec![name.clone()])
            }
            MetalChoice::All => Ok(self
                .store
                .instruments()
                .into_iter()
                .map(String::from)
                .collect()),
        }
    }

    fn resolve_field(&self, selection: &Selection) -> Result<String> {
        let available = self.fields(&selection.metal)?;
        match &selection.field {
            Some(field) if available.contains(field) => Ok(field.clone()),
            Some(field) => Err(DashboardError::InvalidSelection(format!(
                "field '{}' is not available for {}; choose one of: {}",
                field,
                selection.metal,
                available.join(", ")
            ))),
            None => available.into_iter().next().ok_or_else(|| {
                DashboardError::InvalidSelection(format!(
                    "no price field is shared by every instrument in {}",
                    selection.metal
                ))
            }),
        }
    }

    fn resolve_range(&self, selection: &Selection, instruments: &[String]) -> Result<DateRange> {
        let mut span: Option<(NaiveDate, NaiveDate)> = None;
        for name in instruments {
            if let Some((first, last)) = self.store.date_span(name)? {
                span = Some(match span {
                    Some((lo, hi)) => (lo.min(first), hi.max(last)),
                    None => (first, last),
                });
            }
        }

        let start = selection.start.or(span.map(|s| s.0));
        let end = selection.end.or(span.map(|s| s.1));
        match (start, end) {
            (Some(start), Some(end)) => Ok(DateRange::new(start, end)?),
            _ => Err(DashboardError::InvalidSelection(format!(
                "{} has no dated rows to derive a range from",
                selection.metal
            ))),
        }
    }

    fn panel(&self, series: &PriceSeries, window: usize) -> Result<SeriesPanel> {
        Ok(SeriesPanel {
            series: series.clone(),
            smoothed: moving_average(series, window)?,
            histogram: histogram(series, self.config.defaults.histogram_bins)?,
            box_summary: box_summary(series),
            description: describe(series),
        })
    }

    fn forecast_outcome(&self, series: &PriceSeries, years: usize) -> Result<ForecastOutcome> {
        let defaults = &self.config.defaults;
        let model = ArimaModel::default().with_estimator(defaults.estimator);
        let engine = ForecastEngine::new(model).with_confidence_level(defaults.confidence_level)?;

        match engine.forecast(series, horizon_days(years)) {
            Ok(result) => Ok(ForecastOutcome::Forecast { result }),
            Err(e) if e.is_forecast_failure() => {
                warn!(instrument = series.instrument(), error = %e, "forecast unavailable");
                Ok(ForecastOutcome::Notice {
                    message: e.to_string(),
                })
            }
            Err(e) => Err(e.into()),
        }
    }
}
