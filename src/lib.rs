//! # Precious Metals Workspace
//!
//! Facade over the workspace crates:
//!
//! - [`price_math`]: numeric kernels (rolling means, statistics, AR estimation)
//! - [`metal_forecast`]: price series loading, filtering, smoothing,
//!   correlation and ARIMA forecasting
//! - [`metals_dashboard`]: configuration and dashboard views over the above
//!
//! ```
//! use precious_metals_workspace::price_math::statistics::mean;
//!
//! assert_eq!(mean(&[1800.0, 1810.0, 1820.0]), Some(1810.0));
//! ```

pub use metal_forecast;
pub use metals_dashboard;
pub use price_math;
