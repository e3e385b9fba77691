//! Loads per-year trend tables into a [`TrendRepository`].
//!
//! Each historical year is one headerless CSV file with 12 rows (Jan..Dec)
//! and one column per zone (`z1..z7`).

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::HistoryConfig;
use crate::error::{ForecastError, Result};
use crate::trend::{HistoricalTrend, MONTH_COUNT, TrendRepository, ZONE_COUNT};

use super::read_numeric_rows;

/// Path of the trend file for `year`: `<dir>/<prefix><year>.csv`.
pub fn trend_file_path(dir: &Path, prefix: &str, year: i32) -> PathBuf {
    dir.join(format!("{prefix}{year}.csv"))
}

/// Parses one year's trend table from any reader.
///
/// # Errors
///
/// Returns `Parse` for malformed rows and `DataShape` if the table does not
/// have exactly 12 rows.
pub fn read_trend<R: Read>(reader: R, year: i32, source: &str) -> Result<HistoricalTrend> {
    let rows = read_numeric_rows(reader, source, ZONE_COUNT)?;
    if rows.len() != MONTH_COUNT {
        return Err(ForecastError::DataShape {
            year,
            expected: MONTH_COUNT,
            got: rows.len(),
        });
    }
    Ok(HistoricalTrend::from_rows(year, rows))
}

/// Loads one year's trend table from `path`.
///
/// # Errors
///
/// Returns `Io` if the file cannot be opened, otherwise as [`read_trend`].
pub fn load_trend_file(path: &Path, year: i32) -> Result<HistoricalTrend> {
    let file = File::open(path)
        .map_err(|e| ForecastError::Io(format!("cannot open \"{}\": {e}", path.display())))?;
    let trend = read_trend(file, year, &path.display().to_string())?;
    debug!(year, path = %path.display(), "loaded trend file");
    Ok(trend)
}

/// Loads `years` consecutive trend files starting at `baseline_year`.
///
/// # Arguments
///
/// * `dir` - Directory holding the trend files
/// * `prefix` - File name prefix (e.g. `"NBTrend"`)
/// * `baseline_year` - First year to load
/// * `years` - Number of consecutive years
///
/// # Errors
///
/// Fails on the first file that cannot be loaded.
pub fn load_repository(
    dir: &Path,
    prefix: &str,
    baseline_year: i32,
    years: usize,
) -> Result<TrendRepository> {
    let trends = (baseline_year..)
        .take(years)
        .map(|year| load_trend_file(&trend_file_path(dir, prefix, year), year))
        .collect::<Result<Vec<_>>>()?;
    TrendRepository::new(trends)
}

/// Loads the repository described by `config`, which must name a data directory.
///
/// # Errors
///
/// Returns `Io` if `config.data_dir` is unset, otherwise as [`load_repository`].
pub fn load_from_config(config: &HistoryConfig) -> Result<TrendRepository> {
    let dir = config
        .data_dir
        .as_deref()
        .ok_or_else(|| ForecastError::Io("history.data_dir is not set".to_string()))?;
    load_repository(dir, &config.file_prefix, config.baseline_year, config.years)
}
