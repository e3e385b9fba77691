//! Read-only rate tables keyed by the extended zone set.
//!
//! These tables are not used by the forecast itself; they are loaded and
//! carried alongside the history for downstream cost computations.

use std::fs::File;
use std::path::Path;

use serde::Serialize;
use tracing::debug;

use crate::config::RatesConfig;
use crate::error::{ForecastError, Result};
use crate::trend::{EXTENDED_ZONE_COUNT, ZONE_COUNT};

use super::read_numeric_rows;

/// Generation types, in `PlantProductionRates.csv` column order.
pub const PLANT_TYPES: [&str; 5] = ["thermal", "nuclear", "combustion", "hydro", "wind"];

/// Penalty table file name (11 x 11, rows and columns `z1..z11`).
pub const PENALTY_FILE: &str = "PenaltyValues.csv";
/// Plant production table file name (7 rows `z1..z7` x 5 plant types).
pub const PLANT_RATES_FILE: &str = "PlantProductionRates.csv";
/// Optional incentive rate file: one row `emission,non_emission`.
pub const INCENTIVE_FILE: &str = "IncentiveRates.csv";

/// Penalty values, plant production rates, and incentive tax rates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RateTables {
    penalty_values: Vec<Vec<f64>>,
    plant_production_rates: Vec<Vec<f64>>,
    /// Incentive rate applied to emitting generation.
    pub emission_tax: f64,
    /// Incentive rate applied to non-emitting generation.
    pub non_emission_tax: f64,
}

impl RateTables {
    /// Creates rate tables after checking their dimensions.
    ///
    /// # Errors
    ///
    /// Returns `TableShape` if the penalty table is not 11 x 11 or the plant
    /// table is not 7 x 5.
    pub fn new(
        penalty_values: Vec<Vec<f64>>,
        plant_production_rates: Vec<Vec<f64>>,
        emission_tax: f64,
        non_emission_tax: f64,
    ) -> Result<Self> {
        check_shape(
            "penalty_values",
            &penalty_values,
            EXTENDED_ZONE_COUNT,
            EXTENDED_ZONE_COUNT,
        )?;
        check_shape(
            "plant_production_rates",
            &plant_production_rates,
            ZONE_COUNT,
            PLANT_TYPES.len(),
        )?;
        Ok(Self {
            penalty_values,
            plant_production_rates,
            emission_tax,
            non_emission_tax,
        })
    }

    /// Penalty for the (`row_zone`, `col_zone`) pair of the extended zone set.
    pub fn penalty(&self, row_zone: usize, col_zone: usize) -> Option<f64> {
        self.penalty_values
            .get(row_zone)
            .and_then(|row| row.get(col_zone))
            .copied()
    }

    /// Production rate of `plant` (see [`PLANT_TYPES`]) in `zone`.
    pub fn plant_rate(&self, zone: usize, plant: &str) -> Option<f64> {
        let column = PLANT_TYPES.iter().position(|p| *p == plant)?;
        self.plant_production_rates
            .get(zone)
            .and_then(|row| row.get(column))
            .copied()
    }

    pub fn penalty_values(&self) -> &[Vec<f64>] {
        &self.penalty_values
    }

    pub fn plant_production_rates(&self) -> &[Vec<f64>] {
        &self.plant_production_rates
    }
}

fn check_shape(
    table: &str,
    rows: &[Vec<f64>],
    expected_rows: usize,
    expected_cols: usize,
) -> Result<()> {
    let got_cols = rows.first().map_or(0, Vec::len);
    if rows.len() != expected_rows || rows.iter().any(|r| r.len() != expected_cols) {
        return Err(ForecastError::TableShape {
            table: table.to_string(),
            expected_rows,
            expected_cols,
            got_rows: rows.len(),
            got_cols,
        });
    }
    Ok(())
}

fn read_table_file(path: &Path, columns: usize) -> Result<Vec<Vec<f64>>> {
    let file = File::open(path)
        .map_err(|e| ForecastError::Io(format!("cannot open \"{}\": {e}", path.display())))?;
    read_numeric_rows(file, &path.display().to_string(), columns)
}

/// Loads rate tables from `dir`.
///
/// `IncentiveRates.csv` is optional; when absent, the rates configured in
/// `config` apply.
///
/// # Errors
///
/// Returns `Io`, `Parse`, or `TableShape` for missing or malformed tables.
pub fn load_rate_tables(dir: &Path, config: &RatesConfig) -> Result<RateTables> {
    let penalty = read_table_file(&dir.join(PENALTY_FILE), EXTENDED_ZONE_COUNT)?;
    let plants = read_table_file(&dir.join(PLANT_RATES_FILE), PLANT_TYPES.len())?;

    let incentive_path = dir.join(INCENTIVE_FILE);
    let (emission_tax, non_emission_tax) = if incentive_path.exists() {
        let rows = read_table_file(&incentive_path, 2)?;
        match rows.first() {
            Some(row) => (row[0], row[1]),
            None => (config.emission_tax, config.non_emission_tax),
        }
    } else {
        (config.emission_tax, config.non_emission_tax)
    };

    debug!(dir = %dir.display(), emission_tax, non_emission_tax, "loaded rate tables");
    RateTables::new(penalty, plants, emission_tax, non_emission_tax)
}
