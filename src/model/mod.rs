//! Curve fitting, year-adjustment synthesis, and prediction.

/// Per-month year-over-year adjustment functions.
pub mod adjustment;
pub mod bundle;
/// Per-zone monthly curve fitting.
pub mod curve;
pub mod polynomial;
pub mod predict;

pub use adjustment::{AdjustmentFunction, synthesize};
pub use bundle::{ModelBundle, ZoneModel, build_model_bundle};
pub use curve::{ZoneCurve, ZoneCurveFitter, fit_zone_curve};
pub use polynomial::{FitDiagnostics, Polynomial};
pub use predict::{PredictionRequest, predict};
