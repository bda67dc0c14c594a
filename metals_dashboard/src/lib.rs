//! # Metals Dashboard
//!
//! Composition root over [`metal_forecast`]: loads the configured
//! instruments once, then evaluates user selections into the data behind
//! each dashboard panel.
//!
//! ## Example
//!
//! ```no_run
//! use metals_dashboard::{Dashboard, DashboardConfig, MetalChoice};
//!
//! # fn main() -> metals_dashboard::Result<()> {
//! let dashboard = Dashboard::from_config(DashboardConfig::load("dashboard.toml")?)?;
//! let selection = dashboard
//!     .selection(MetalChoice::Single("Gold".to_string()))
//!     .with_field("Close")
//!     .with_window(10);
//!
//! let view = dashboard.evaluate(&selection)?;
//! println!("{}", metals_dashboard::report::render_view(&view));
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod dashboard;
pub mod error;
pub mod report;

pub use crate::config::{horizon_days, DashboardConfig, InstrumentSource, ViewDefaults};
pub use crate::dashboard::{
    Dashboard, DashboardView, ForecastOutcome, MetalChoice, Selection, SeriesPanel,
};
pub use crate::error::{DashboardError, Result};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
