//! Synthetic monthly price and booking-volume series for a route.
//!
//! Each month combines a route-specific baseline, a sinusoidal season keyed
//! on the calendar month and Gaussian noise. Price also carries a small linear upward
//! trend. The route codes only perturb the baselines through a stable hash,
//! so any pair of codes yields a valid series.
//!
//! Noise comes from a `ChaCha8Rng`, so the same route, seed and start month
//! always reproduce the same series on every platform.

use crate::error::{AirlineDemandError, Result};
use crate::models::{route_key, DemandSeries, SimulatedMonth};
use chrono::{Datelike, Months, NaiveDate, Utc};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Length of the series shown on the dashboard.
pub const SIMULATED_MONTHS: u32 = 36;

/// Months per seasonal cycle.
pub const SEASON_MONTHS: u32 = 12;

// ---------------------------------------------------------------------------
// SimulationParams
// ---------------------------------------------------------------------------

/// Shape of the simulated curves.
///
/// ```text
/// price(t)  = base_price + hash % price_spread
///           + price_amplitude * season(m) + price_trend * t + N(0, price_noise)
/// volume(t) = base_volume + hash % volume_spread
///           + volume_season_level * (1 + volume_season_amplitude * season(m))
///           + N(0, volume_noise)
/// season(m) = sin(2πm/12), m = calendar month of record t (0 = January)
/// ```
///
/// Prices are floored at `min_price` and volumes at `min_volume`. A series
/// always has [`SIMULATED_MONTHS`] records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationParams {
    pub base_price: f64,
    pub price_spread: u32,
    pub price_amplitude: f64,
    pub price_trend: f64,
    pub price_noise: f64,
    pub min_price: f64,
    pub base_volume: f64,
    pub volume_spread: u32,
    pub volume_season_level: f64,
    pub volume_season_amplitude: f64,
    pub volume_noise: f64,
    pub min_volume: u64,
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self {
            base_price: 100.0,
            price_spread: 50,
            price_amplitude: 15.0,
            price_trend: 0.5,
            price_noise: 6.0,
            min_price: 1.0,
            base_volume: 500.0,
            volume_spread: 200,
            volume_season_level: 300.0,
            volume_season_amplitude: 0.4,
            volume_noise: 40.0,
            min_volume: 1,
        }
    }
}

impl SimulationParams {
    /// The same curves without any noise.
    pub fn noiseless() -> Self {
        Self {
            price_noise: 0.0,
            volume_noise: 0.0,
            ..Self::default()
        }
    }

    /// Reject parameters that could produce non-positive or non-finite values.
    pub fn validate(&self) -> Result<()> {
        let finite = [
            ("base_price", self.base_price),
            ("price_amplitude", self.price_amplitude),
            ("price_trend", self.price_trend),
            ("price_noise", self.price_noise),
            ("min_price", self.min_price),
            ("base_volume", self.base_volume),
            ("volume_season_level", self.volume_season_level),
            ("volume_season_amplitude", self.volume_season_amplitude),
            ("volume_noise", self.volume_noise),
        ];
        if let Some((name, _)) = finite.iter().find(|(_, v)| !v.is_finite()) {
            return Err(invalid(format!("{} must be finite", name)));
        }
        if self.min_price <= 0.0 {
            return Err(invalid(format!("min_price must be > 0, got {}", self.min_price)));
        }
        if self.min_volume == 0 {
            return Err(invalid("min_volume must be at least 1".to_string()));
        }
        if self.price_noise < 0.0 || self.volume_noise < 0.0 {
            return Err(invalid("noise standard deviations must be >= 0".to_string()));
        }
        Ok(())
    }
}

fn invalid(msg: String) -> AirlineDemandError {
    AirlineDemandError::InvalidArgument(format!("simulation params: {}", msg))
}

// ---------------------------------------------------------------------------
// DemandSimulator
// ---------------------------------------------------------------------------

/// Pure generator of [`DemandSeries`]; holds no state besides its parameters.
#[derive(Debug, Clone, Default)]
pub struct DemandSimulator {
    params: SimulationParams,
}

impl DemandSimulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulator with custom curve parameters, validated up front.
    pub fn with_params(params: SimulationParams) -> Result<Self> {
        params.validate()?;
        Ok(Self { params })
    }

    pub fn params(&self) -> &SimulationParams {
        &self.params
    }

    /// Simulate a series starting at the current calendar month (UTC).
    pub fn simulate(&self, origin: &str, destination: &str, seed: Option<u64>) -> DemandSeries {
        self.simulate_from(origin, destination, seed, Utc::now().date_naive())
    }

    /// Simulate a series whose first month contains `start`.
    ///
    /// Record `i` is dated on the first day of the `i`-th month after the
    /// start month. `seed = None` draws the noise from OS entropy.
    pub fn simulate_from(
        &self,
        origin: &str,
        destination: &str,
        seed: Option<u64>,
        start: NaiveDate,
    ) -> DemandSeries {
        let p = &self.params;
        let key = route_key(origin, destination);
        let hash = route_hash(&key);

        let mut rng = match seed {
            Some(s) => ChaCha8Rng::seed_from_u64(s),
            None => ChaCha8Rng::from_entropy(),
        };

        let price_base = p.base_price + spread_offset(hash, p.price_spread);
        let volume_base = p.base_volume + spread_offset(hash, p.volume_spread);
        let first = first_of_month(start);

        let months = (0..SIMULATED_MONTHS)
            .map(|t| {
                let date = first
                    .checked_add_months(Months::new(t))
                    .unwrap_or(NaiveDate::MAX);
                let season = seasonal_wave(date.month0());
                let tf = f64::from(t);

                let price_noise = gaussian(&mut rng, p.price_noise);
                let volume_noise = gaussian(&mut rng, p.volume_noise);

                let price = price_base
                    + p.price_amplitude * season
                    + p.price_trend * tf
                    + price_noise;
                let volume = volume_base
                    + p.volume_season_level * (1.0 + p.volume_season_amplitude * season)
                    + volume_noise;

                SimulatedMonth {
                    month_index: t,
                    date,
                    price: price.max(p.min_price),
                    booking_volume: volume.round().max(p.min_volume as f64) as u64,
                }
            })
            .collect();

        DemandSeries {
            route: key,
            seed,
            months,
        }
    }
}

/// Stable 32-bit hash of a route key.
pub fn route_hash(key: &str) -> u32 {
    xxhash_rust::xxh32::xxh32(key.as_bytes(), 0)
}

/// `sin(2πm/12)` for calendar month `month0` (0 = January).
///
/// Peaks in April, bottoms out in October.
pub fn seasonal_wave(month0: u32) -> f64 {
    let phase = f64::from(month0 % SEASON_MONTHS) / f64::from(SEASON_MONTHS);
    (2.0 * PI * phase).sin()
}

fn spread_offset(hash: u32, spread: u32) -> f64 {
    if spread == 0 {
        0.0
    } else {
        f64::from(hash % spread)
    }
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(date.year(), date.month(), 1).unwrap_or(date)
}

/// Box-Muller sample from N(0, std_dev²).
fn gaussian<R: Rng>(rng: &mut R, std_dev: f64) -> f64 {
    // Draw both uniforms even when std_dev is 0 so the stream stays aligned
    let u1: f64 = 1.0 - rng.gen::<f64>();
    let u2: f64 = rng.gen::<f64>();
    if std_dev == 0.0 {
        return 0.0;
    }
    std_dev.abs() * (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos()
}
