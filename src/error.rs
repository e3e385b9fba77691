//! Error taxonomy for fitting, prediction, and history loading.

use thiserror::Error;

/// Result type alias for forecasting operations.
pub type Result<T> = std::result::Result<T, ForecastError>;

/// Errors surfaced by the forecasting pipeline.
///
/// Nothing is retried locally: the computation is deterministic over static
/// history, so every error is returned to the caller of the failing operation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ForecastError {
    /// A historical trend does not hold exactly one record per month.
    #[error("trend for {year} has {got} monthly records, expected {expected}")]
    DataShape {
        year: i32,
        expected: usize,
        got: usize,
    },

    /// A least-squares solve was singular, rank-deficient, ill-conditioned, or non-finite.
    #[error("fit failure: {0}")]
    FitFailure(String),

    /// A monthly record does not hold one value per zone.
    #[error("trend for {year} month {month} has {got} zone values, expected {expected}")]
    ZoneCount {
        year: i32,
        month: usize,
        expected: usize,
        got: usize,
    },

    /// Zone index outside `0..zone_count`.
    #[error("invalid zone index {zone} (valid: 0..{zone_count})")]
    InvalidZoneIndex { zone: usize, zone_count: usize },

    /// Month index outside `0..12`.
    #[error("invalid month index {month} (valid: 0..12)")]
    InvalidMonthIndex { month: usize },

    /// The repository holds no historical years.
    #[error("trend repository is empty")]
    EmptyRepository,

    /// Historical years are not consecutive.
    #[error("historical years must be consecutive: expected {expected}, got {got}")]
    NonContiguousYears { expected: i32, got: i32 },

    /// A rate or penalty table has the wrong dimensions.
    #[error("table {table} is {got_rows}x{got_cols}, expected {expected_rows}x{expected_cols}")]
    TableShape {
        table: String,
        expected_rows: usize,
        expected_cols: usize,
        got_rows: usize,
        got_cols: usize,
    },

    /// A data file could not be opened or read.
    #[error("io error: {0}")]
    Io(String),

    /// A data file was readable but its contents were malformed.
    #[error("parse error in {path} at line {line}: {message}")]
    Parse {
        path: String,
        line: usize,
        message: String,
    },
}
