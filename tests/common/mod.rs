//! Shared test fixtures for integration tests.

#![allow(dead_code)]

use std::fs;
use std::path::Path;

use nb_power_forecast::config::{HistoryConfig, SyntheticConfig};
use nb_power_forecast::synthetic::SyntheticHistory;
use nb_power_forecast::trend::{HistoricalTrend, MONTH_COUNT, TrendRepository, ZONE_COUNT};

/// Years 2015..=2018 of constant `value` MW in every zone and month.
pub fn flat_repository(value: f64) -> TrendRepository {
    let trends = (2015..2019)
        .map(|year| HistoricalTrend::from_rows(year, vec![vec![value; ZONE_COUNT]; MONTH_COUNT]))
        .collect();
    TrendRepository::new(trends).unwrap()
}

/// Noise-free seasonal history: 1000 MW base, 30% swing, `growth` per year.
pub fn seasonal_config(growth: f64) -> SyntheticConfig {
    SyntheticConfig {
        base_mw: 1000.0,
        seasonal_amp: 0.3,
        annual_growth: growth,
        noise_std_mw: 0.0,
        seed: 42,
        uniform_zones: false,
    }
}

/// Four years of synthetic history for 2015..=2018.
pub fn synthetic_repository(config: SyntheticConfig) -> TrendRepository {
    SyntheticHistory::new(config)
        .repository(&HistoryConfig::default())
        .unwrap()
}

/// Writes one `NBTrend<year>.csv` per trend of `repository` into `dir`.
pub fn write_trend_files(dir: &Path, repository: &TrendRepository) {
    for trend in repository.trends() {
        let body: Vec<String> = trend
            .months()
            .iter()
            .map(|m| {
                m.values()
                    .iter()
                    .map(|v| format!("{v}"))
                    .collect::<Vec<_>>()
                    .join(",")
            })
            .collect();
        fs::write(
            dir.join(format!("NBTrend{}.csv", trend.year())),
            body.join("\n"),
        )
        .unwrap();
    }
}

/// Writes an `rows` x `cols` numeric table of `value` to `path`.
pub fn write_table(path: &Path, rows: usize, cols: usize, value: f64) {
    let line = vec![format!("{value}"); cols].join(",");
    fs::write(path, vec![line; rows].join("\n")).unwrap();
}
