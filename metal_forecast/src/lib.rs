//! # Metal Forecast
//!
//! Data preparation and short-horizon forecasting for precious-metal
//! price series.
//!
//! ## Features
//!
//! - Loading dated price tables into a [`SeriesStore`] with timezone-naive dates
//! - Inclusive date-range filtering
//! - Trailing simple moving averages
//! - Date-aligned Pearson correlation across instruments
//! - ARIMA(5,1,0) forecasts projected onto consecutive calendar days
//! - Histogram and box plot summaries, CSV export of filtered data
//!
//! Every operation is a pure function of its arguments and returns freshly
//! allocated results; nothing is cached between calls.
//!
//! ## Quick Start
//!
//! ```no_run
//! use chrono::NaiveDate;
//! use metal_forecast::{forecast, moving_average, DateRange, LoadOptions, SeriesStore};
//!
//! # fn main() -> metal_forecast::error::Result<()> {
//! let mut store = SeriesStore::new();
//! store.load_csv("Gold", "data/Gold.csv", &LoadOptions::default())?;
//!
//! let range = DateRange::new(
//!     NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
//!     NaiveDate::from_ymd_opt(2023, 12, 31).unwrap(),
//! )?;
//! let closes = store.series("Gold", "Close")?.filter(&range);
//!
//! let smoothed = moving_average(&closes, 5)?;
//! let projection = forecast(&closes, 75)?;
//! println!("{} smoothed points, {} forecast days", smoothed.len(), projection.horizon());
//! # Ok(())
//! # }
//! ```

pub mod correlation;
pub mod data;
pub mod error;
pub mod export;
pub mod forecast;
pub mod models;
pub mod range;
pub mod smoothing;
pub mod summary;
pub mod utils;

// Re-export commonly used types
pub use crate::correlation::{correlate, CorrelationEngine, CorrelationMatrix};
pub use crate::data::{
    DataLoader, DuplicatePolicy, InstrumentTable, LoadOptions, Observation, PriceSeries,
    SeriesStore,
};
pub use crate::error::ForecastError;
pub use crate::export::DataTable;
pub use crate::forecast::{forecast, ForecastEngine, ForecastPoint, ForecastResult};
pub use crate::models::arima::{ArEstimator, ArimaModel};
pub use crate::models::{ForecastModel, TrainedForecastModel};
pub use crate::range::{filter, DateRange, FilteredSeries};
pub use crate::smoothing::{moving_average, SmoothedSeries};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
