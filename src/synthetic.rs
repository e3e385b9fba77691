//! Seeded synthetic consumption history.

use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::config::{HistoryConfig, SyntheticConfig};
use crate::error::Result;
use crate::trend::{HistoricalTrend, MONTH_COUNT, TrendRepository, ZONE_COUNT};

/// Relative size of each zone compared to the first.
const ZONE_SCALES: [f64; ZONE_COUNT] = [1.0, 0.45, 0.8, 0.3, 0.6, 0.25, 0.5];

/// Generator for plausible monthly consumption tables.
///
/// Demand peaks in January and bottoms out in July, grows at a compound
/// annual rate, and carries Gaussian noise. The same parameters and seed
/// always produce the same history.
///
/// # Examples
///
/// ```
/// use nb_power_forecast::config::{HistoryConfig, SyntheticConfig};
/// use nb_power_forecast::synthetic::SyntheticHistory;
///
/// let mut generator = SyntheticHistory::new(SyntheticConfig::default());
/// let repo = generator.repository(&HistoryConfig::default()).unwrap();
/// assert_eq!(repo.year_count(), 4);
/// assert_eq!(repo.baseline_year(), 2015);
/// ```
#[derive(Debug, Clone)]
pub struct SyntheticHistory {
    config: SyntheticConfig,
    rng: StdRng,
}

impl SyntheticHistory {
    /// Creates a generator seeded from `config.seed`.
    pub fn new(config: SyntheticConfig) -> Self {
        let rng = StdRng::seed_from_u64(config.seed);
        Self { config, rng }
    }

    /// Noise-free consumption for `zone` in the `year_index`-th year and `month`.
    pub fn expected_mw(&self, zone: usize, year_index: usize, month: usize) -> f64 {
        expected_mw(&self.config, zone, year_index, month)
    }

    /// Generates one year of twelve monthly records.
    pub fn trend(&mut self, year: i32, year_index: usize) -> HistoricalTrend {
        let rows = (0..MONTH_COUNT)
            .map(|month| {
                (0..ZONE_COUNT)
                    .map(|zone| {
                        let noise = gaussian_noise(&mut self.rng, self.config.noise_std_mw);
                        (expected_mw(&self.config, zone, year_index, month) + noise).max(0.0)
                    })
                    .collect()
            })
            .collect();
        HistoricalTrend::from_rows(year, rows)
    }

    /// Generates the consecutive years described by `history`.
    ///
    /// # Errors
    ///
    /// Returns `EmptyRepository` if `history.years` is zero.
    pub fn repository(&mut self, history: &HistoryConfig) -> Result<TrendRepository> {
        let trends = (0..history.years)
            .map(|i| self.trend(history.baseline_year + i as i32, i))
            .collect();
        TrendRepository::new(trends)
    }
}

fn expected_mw(c: &SyntheticConfig, zone: usize, year_index: usize, month: usize) -> f64 {
    let scale = if c.uniform_zones {
        1.0
    } else {
        ZONE_SCALES[zone % ZONE_COUNT]
    };
    let growth = (1.0 + c.annual_growth).powi(year_index as i32);
    let angle = 2.0 * std::f64::consts::PI * month as f64 / MONTH_COUNT as f64;
    c.base_mw * scale * growth * (1.0 + c.seasonal_amp * angle.cos())
}

/// Gaussian noise with mean 0 via the Box-Muller transform.
///
/// Returns 0 without touching `rng` when `std_dev` is not positive.
pub fn gaussian_noise(rng: &mut StdRng, std_dev: f64) -> f64 {
    if std_dev <= 0.0 {
        return 0.0;
    }

    let u1: f64 = rng.random::<f64>().clamp(1e-12, 1.0);
    let u2: f64 = rng.random::<f64>();
    let z0 = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
    z0 * std_dev
}
