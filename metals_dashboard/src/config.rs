//! Dashboard configuration.
//!
//! Loaded from a TOML file; every key is optional and falls back to the
//! defaults below.

use crate::error::{DashboardError, Result};
use metal_forecast::correlation::DEFAULT_MIN_OVERLAP;
use metal_forecast::export::DEFAULT_EXPORT_FILE;
use metal_forecast::summary::DEFAULT_BINS;
use metal_forecast::{ArEstimator, DuplicatePolicy, LoadOptions};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Smallest and largest moving average window offered
pub const WINDOW_BOUNDS: (usize, usize) = (1, 30);
/// Smallest and largest forecast length in years
pub const YEAR_BOUNDS: (usize, usize) = (1, 5);
/// Daily forecast steps per forecast year
pub const STEPS_PER_YEAR: usize = 15;

/// One instrument and the CSV file holding its history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstrumentSource {
    pub name: String,
    pub path: PathBuf,
}

/// Initial values of the per-view settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewDefaults {
    pub window: usize,
    pub forecast_years: usize,
    pub histogram_bins: usize,
    pub confidence_level: f64,
    pub min_overlap: usize,
    pub estimator: ArEstimator,
}

impl Default for ViewDefaults {
    fn default() -> Self {
        Self {
            window: 5,
            forecast_years: 5,
            histogram_bins: DEFAULT_BINS,
            confidence_level: 0.95,
            min_overlap: DEFAULT_MIN_OVERLAP,
            estimator: ArEstimator::default(),
        }
    }
}

/// Root configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub date_column: String,
    pub duplicate_policy: DuplicatePolicy,
    pub instruments: Vec<InstrumentSource>,
    pub defaults: ViewDefaults,
    pub export_path: PathBuf,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        let instruments = ["Gold", "Platinum", "Silver"]
            .iter()
            .map(|name| InstrumentSource {
                name: name.to_string(),
                path: PathBuf::from("data").join(format!("{}.csv", name)),
            })
            .collect();

        Self {
            date_column: "Date".to_string(),
            duplicate_policy: DuplicatePolicy::default(),
            instruments,
            defaults: ViewDefaults::default(),
            export_path: PathBuf::from(DEFAULT_EXPORT_FILE),
        }
    }
}

impl DashboardConfig {
    /// Load and validate configuration from a file path.
    ///
    /// Relative instrument paths resolve against the directory of the file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let mut config = Self::from_toml_str(&content)?;

        if let Some(base) = path.parent() {
            for source in &mut config.instruments {
                if source.path.is_relative() {
                    source.path = base.join(&source.path);
                }
            }
        }

        Ok(config)
    }

    /// Parse and validate configuration text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: DashboardConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check every setting against its accepted bounds
    pub fn validate(&self) -> Result<()> {
        if self.instruments.is_empty() {
            return Err(invalid("at least one instrument is required"));
        }
        for (i, source) in self.instruments.iter().enumerate() {
            if source.name.trim().is_empty() {
                return Err(invalid("instrument names must not be empty"));
            }
            if source.name.eq_ignore_ascii_case("all") {
                return Err(invalid("'All' is reserved for the combined view"));
            }
            if self.instruments[..i].iter().any(|s| s.name == source.name) {
                return Err(invalid(&format!(
                    "instrument '{}' is listed twice",
                    source.name
                )));
            }
        }

        let defaults = &self.defaults;
        check_window(defaults.window).map_err(|e| invalid(&e))?;
        check_years(defaults.forecast_years).map_err(|e| invalid(&e))?;
        if defaults.histogram_bins == 0 {
            return Err(invalid("histogram_bins must be at least 1"));
        }
        if !(defaults.confidence_level > 0.0 && defaults.confidence_level < 1.0) {
            return Err(invalid(&format!(
                "confidence_level must be between 0 and 1, got {}",
                defaults.confidence_level
            )));
        }

        Ok(())
    }

    /// Options handed to the CSV loader for every instrument
    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            date_column: self.date_column.clone(),
            fields: None,
            duplicates: self.duplicate_policy,
        }
    }
}

/// Forecast horizon in days for a number of forecast years
pub fn horizon_days(years: usize) -> usize {
    years * STEPS_PER_YEAR
}

pub(crate) fn check_window(window: usize) -> std::result::Result<(), String> {
    let (lo, hi) = WINDOW_BOUNDS;
    if (lo..=hi).contains(&window) {
        Ok(())
    } else {
        Err(format!("window must be in {}..={}, got {}", lo, hi, window))
    }
}

pub(crate) fn check_years(years: usize) -> std::result::Result<(), String> {
    let (lo, hi) = YEAR_BOUNDS;
    if (lo..=hi).contains(&years) {
        Ok(())
    } else {
        Err(format!("forecast years must be in {}..={}, got {}", lo, hi, years))
    }
}

fn invalid(message: &str) -> DashboardError {
    DashboardError::InvalidConfig(message.to_string())
}
