//! TOML-based forecast configuration and preset definitions.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::trend::{BASELINE_YEAR, CURVE_DEGREE, HISTORICAL_YEARS, MONTH_COUNT};

/// Default upper bound on a curve fit's conditioning estimate.
pub const DEFAULT_MAX_CONDITION: f64 = 1e10;
/// Default incentive rate for emitting generation.
pub const DEFAULT_EMISSION_TAX: f64 = 0.015;
/// Default incentive rate for non-emitting generation.
pub const DEFAULT_NON_EMISSION_TAX: f64 = 0.009;

/// Top-level forecast configuration parsed from TOML.
///
/// All fields have defaults matching the baseline preset. Load from TOML
/// with [`ForecastConfig::from_toml_file`] or use
/// [`ForecastConfig::baseline`] for the built-in default.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ForecastConfig {
    /// Where and how many historical years to read.
    #[serde(default)]
    pub history: HistoryConfig,
    /// Curve fitting parameters.
    #[serde(default)]
    pub model: ModelConfig,
    /// Rate and penalty table location and incentive rates.
    #[serde(default)]
    pub rates: RatesConfig,
    /// Synthetic history used when no data directory is configured.
    #[serde(default)]
    pub synthetic: SyntheticConfig,
    /// Report parameters.
    #[serde(default)]
    pub report: ReportConfig,
}

/// Historical data source.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HistoryConfig {
    /// Earliest historical year.
    pub baseline_year: i32,
    /// Number of consecutive historical years (must be >= 2).
    pub years: usize,
    /// Directory holding one trend CSV per year; synthetic history if absent.
    pub data_dir: Option<PathBuf>,
    /// File name prefix; files are `<data_dir>/<file_prefix><year>.csv`.
    pub file_prefix: String,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            baseline_year: BASELINE_YEAR,
            years: HISTORICAL_YEARS,
            data_dir: None,
            file_prefix: "NBTrend".to_string(),
        }
    }
}

/// Curve fitting parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ModelConfig {
    /// Degree of the per-zone monthly polynomial (1..=11).
    pub degree: usize,
    /// Fits with a larger conditioning estimate are rejected.
    pub max_condition: f64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            degree: CURVE_DEGREE,
            max_condition: DEFAULT_MAX_CONDITION,
        }
    }
}

/// Rate and penalty tables.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RatesConfig {
    /// Directory holding `PenaltyValues.csv` and `PlantProductionRates.csv`.
    pub dir: Option<PathBuf>,
    /// Emission incentive rate, used when `IncentiveRates.csv` is absent.
    pub emission_tax: f64,
    /// Non-emission incentive rate, used when `IncentiveRates.csv` is absent.
    pub non_emission_tax: f64,
}

impl Default for RatesConfig {
    fn default() -> Self {
        Self {
            dir: None,
            emission_tax: DEFAULT_EMISSION_TAX,
            non_emission_tax: DEFAULT_NON_EMISSION_TAX,
        }
    }
}

/// Parameters of the seeded synthetic history.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SyntheticConfig {
    /// Mean monthly consumption of the first zone in the baseline year (MW).
    pub base_mw: f64,
    /// Relative seasonal swing (0.3 = +/-30% between winter and summer).
    pub seasonal_amp: f64,
    /// Compound annual growth rate.
    pub annual_growth: f64,
    /// Gaussian noise standard deviation (MW).
    pub noise_std_mw: f64,
    /// Random seed.
    pub seed: u64,
    /// Give every zone the first zone's size instead of the built-in zone scales.
    pub uniform_zones: bool,
}

impl Default for SyntheticConfig {
    fn default() -> Self {
        Self {
            base_mw: 1000.0,
            seasonal_amp: 0.3,
            annual_growth: 0.02,
            noise_std_mw: 10.0,
            seed: 42,
            uniform_zones: false,
        }
    }
}

/// Report parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReportConfig {
    /// Year to forecast when none is given on the command line.
    pub target_year: i32,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            target_year: BASELINE_YEAR + HISTORICAL_YEARS as i32,
        }
    }
}

/// Configuration error with field path and constraint description.
#[derive(Debug)]
pub struct ConfigError {
    /// Dotted field path (e.g., `"model.degree"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "config error: {}: {}", self.field, self.message)
    }
}

impl std::error::Error for ConfigError {}

impl ForecastConfig {
    /// Returns the baseline configuration.
    pub fn baseline() -> Self {
        Self::default()
    }

    /// Returns the flat preset: constant 100 MW history in every zone.
    pub fn flat() -> Self {
        Self {
            synthetic: SyntheticConfig {
                base_mw: 100.0,
                seasonal_amp: 0.0,
                annual_growth: 0.0,
                noise_std_mw: 0.0,
                uniform_zones: true,
                ..SyntheticConfig::default()
            },
            ..Self::default()
        }
    }

    /// Returns the growth preset: steep load growth with noisier months.
    pub fn growth() -> Self {
        Self {
            synthetic: SyntheticConfig {
                annual_growth: 0.06,
                noise_std_mw: 25.0,
                ..SyntheticConfig::default()
            },
            ..Self::default()
        }
    }

    /// Available preset names.
    pub const PRESETS: &[&str] = &["baseline", "flat", "growth"];

    /// Loads a configuration from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "baseline" => Ok(Self::baseline()),
            "flat" => Ok(Self::flat()),
            "growth" => Ok(Self::growth()),
            _ => Err(ConfigError {
                field: "preset".to_string(),
                message: format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            }),
        }
    }

    /// Parses a configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError {
            field: "config".to_string(),
            message: format!("cannot read \"{}\": {e}", path.display()),
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError {
            field: "toml".to_string(),
            message: e.to_string(),
        })
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        let h = &self.history;
        if h.years < 2 {
            errors.push(ConfigError {
                field: "history.years".into(),
                message: "must be >= 2 to fit a year trend".into(),
            });
        }
        if h.file_prefix.is_empty() {
            errors.push(ConfigError {
                field: "history.file_prefix".into(),
                message: "must not be empty".into(),
            });
        }

        let m = &self.model;
        if m.degree == 0 || m.degree >= MONTH_COUNT {
            errors.push(ConfigError {
                field: "model.degree".into(),
                message: format!("must be in 1..={}, got {}", MONTH_COUNT - 1, m.degree),
            });
        }
        if m.max_condition.is_nan() || m.max_condition <= 1.0 {
            errors.push(ConfigError {
                field: "model.max_condition".into(),
                message: "must be > 1".into(),
            });
        }

        let r = &self.rates;
        if r.emission_tax < 0.0 {
            errors.push(ConfigError {
                field: "rates.emission_tax".into(),
                message: "must be >= 0".into(),
            });
        }
        if r.non_emission_tax < 0.0 {
            errors.push(ConfigError {
                field: "rates.non_emission_tax".into(),
                message: "must be >= 0".into(),
            });
        }

        let s = &self.synthetic;
        if s.base_mw <= 0.0 {
            errors.push(ConfigError {
                field: "synthetic.base_mw".into(),
                message: "must be > 0".into(),
            });
        }
        if !(0.0..1.0).contains(&s.seasonal_amp) {
            errors.push(ConfigError {
                field: "synthetic.seasonal_amp".into(),
                message: "must be in [0.0, 1.0)".into(),
            });
        }
        if s.noise_std_mw < 0.0 {
            errors.push(ConfigError {
                field: "synthetic.noise_std_mw".into(),
                message: "must be >= 0".into(),
            });
        }

        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn baseline_preset_valid() {
        let cfg = ForecastConfig::baseline();
        let errors = cfg.validate();
        assert!(errors.is_empty(), "baseline should be valid: {errors:?}");
        assert_eq!(cfg.model.degree, 10);
        assert_eq!(cfg.history.baseline_year, 2015);
        assert_eq!(cfg.history.years, 4);
        assert_eq!(cfg.report.target_year, 2019);
    }

    #[test]
    fn from_preset_unknown() {
        let err = ForecastConfig::from_preset("nonexistent");
        assert!(err.is_err());
        let e = err.err();
        assert!(e.is_some_and(|e| e.message.contains("unknown preset")));
    }

    #[test]
    fn all_presets_are_valid() {
        for name in ForecastConfig::PRESETS {
            let cfg = ForecastConfig::from_preset(name);
            assert!(cfg.is_ok(), "preset \"{name}\" should load");
            let errors = cfg.as_ref().map(|c| c.validate()).unwrap_or_default();
            assert!(
                errors.is_empty(),
                "preset \"{name}\" should be valid: {errors:?}"
            );
        }
    }

    #[test]
    fn flat_preset_has_no_variation() {
        let flat = ForecastConfig::flat();
        assert_eq!(flat.synthetic.base_mw, 100.0);
        assert_eq!(flat.synthetic.seasonal_amp, 0.0);
        assert_eq!(flat.synthetic.noise_std_mw, 0.0);
        assert!(flat.synthetic.uniform_zones);
    }

    #[test]
    fn valid_toml_parses() {
        let toml = r#"
[history]
baseline_year = 2015
years = 4
data_dir = "PastYearData"
file_prefix = "NBTrend"

[model]
degree = 8
max_condition = 1e12

[rates]
dir = "Information"
emission_tax = 0.02
non_emission_tax = 0.01

[synthetic]
base_mw = 500.0
seasonal_amp = 0.2
annual_growth = 0.01
noise_std_mw = 5.0
seed = 7

[report]
target_year = 2025
"#;
        let cfg = ForecastConfig::from_toml_str(toml);
        assert!(cfg.is_ok(), "valid TOML should parse: {:?}", cfg.err());
        let cfg = cfg.ok();
        assert_eq!(cfg.as_ref().map(|c| c.model.degree), Some(8));
        assert_eq!(cfg.as_ref().map(|c| c.report.target_year), Some(2025));
        assert_eq!(
            cfg.as_ref().and_then(|c| c.history.data_dir.clone()),
            Some(PathBuf::from("PastYearData"))
        );
    }

    #[test]
    fn invalid_toml_unknown_field() {
        let toml = r#"
[model]
degree = 10
bogus_field = true
"#;
        assert!(ForecastConfig::from_toml_str(toml).is_err());
    }

    #[test]
    fn partial_toml_uses_defaults() {
        let toml = r#"
[synthetic]
seed = 99
"#;
        let cfg = ForecastConfig::from_toml_str(toml).ok();
        assert_eq!(cfg.as_ref().map(|c| c.synthetic.seed), Some(99));
        assert_eq!(cfg.as_ref().map(|c| c.model.degree), Some(10));
        assert!(cfg.as_ref().is_some_and(|c| c.history.data_dir.is_none()));
    }

    #[test]
    fn validation_catches_degree_out_of_range() {
        for degree in [0, 12] {
            let mut cfg = ForecastConfig::baseline();
            cfg.model.degree = degree;
            let errors = cfg.validate();
            assert!(errors.iter().any(|e| e.field == "model.degree"));
        }
    }

    #[test]
    fn validation_catches_single_year_history() {
        let mut cfg = ForecastConfig::baseline();
        cfg.history.years = 1;
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "history.years"));
    }

    #[test]
    fn validation_catches_nan_condition_limit() {
        let mut cfg = ForecastConfig::baseline();
        cfg.model.max_condition = f64::NAN;
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "model.max_condition"));
    }

    #[test]
    fn validation_catches_negative_noise() {
        let mut cfg = ForecastConfig::baseline();
        cfg.synthetic.noise_std_mw = -1.0;
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "synthetic.noise_std_mw"));
    }
}
