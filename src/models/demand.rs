use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// SimulatedMonth — one synthetic month of price and booking volume
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulatedMonth {
    pub month_index: u32,
    /// First day of the simulated month.
    pub date: NaiveDate,
    pub price: f64,
    pub booking_volume: u64,
}

// ---------------------------------------------------------------------------
// DemandSeries — a full simulation run for one route
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemandSeries {
    /// `"SRC-DST"` route key the series was generated for.
    pub route: String,
    /// Seed of the noise generator, `None` when drawn from OS entropy.
    pub seed: Option<u64>,
    pub months: Vec<SimulatedMonth>,
}

impl DemandSeries {
    pub fn len(&self) -> usize {
        self.months.len()
    }

    pub fn is_empty(&self) -> bool {
        self.months.is_empty()
    }

    pub fn prices(&self) -> Vec<f64> {
        self.months.iter().map(|m| m.price).collect()
    }

    pub fn booking_volumes(&self) -> Vec<u64> {
        self.months.iter().map(|m| m.booking_volume).collect()
    }

    /// Mean simulated price over the whole series (0.0 when empty).
    pub fn mean_price(&self) -> f64 {
        if self.months.is_empty() {
            return 0.0;
        }
        self.months.iter().map(|m| m.price).sum::<f64>() / self.months.len() as f64
    }

    pub fn total_bookings(&self) -> u64 {
        self.months.iter().map(|m| m.booking_volume).sum()
    }
}
