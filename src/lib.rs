//! Monthly power consumption forecasting per zone.
//!
//! Four years of historical monthly consumption for seven zones are fitted
//! into a [`model::ModelBundle`]: one polynomial curve per zone and year,
//! plus one linear year-trend per zone and month anchored to the baseline
//! year. Predictions evaluate the baseline curve and add the trend
//! adjustment for the requested year.

/// Scenario configuration, presets, and validation.
pub mod config;
pub mod error;
/// CSV loading and export.
pub mod io;
pub mod model;
/// Twelve-month prediction reports.
pub mod report;
pub mod synthetic;
/// Historical trend tables and the trend repository.
pub mod trend;

/// REST API serving the fitted model (requires the `api` feature).
#[cfg(feature = "api")]
pub mod api;
