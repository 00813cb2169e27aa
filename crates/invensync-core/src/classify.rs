use serde::{Deserialize, Serialize};

use crate::config::{CRITICAL_MAX_STOCK, LOW_MAX_STOCK};
use crate::model::StockStatus;

/// Upper bounds (inclusive) of the Critical and Low stock tiers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    pub critical_max: u32,
    pub low_max: u32,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            critical_max: CRITICAL_MAX_STOCK,
            low_max: LOW_MAX_STOCK,
        }
    }
}

impl Thresholds {
    /// Map a unit count to its stock tier.
    pub fn classify(&self, stock: u32) -> StockStatus {
        if stock <= self.critical_max {
            StockStatus::Critical
        } else if stock <= self.low_max {
            StockStatus::Low
        } else {
            StockStatus::Ok
        }
    }
}

/// Classify with the default thresholds: `<= 10` Critical, `<= 25` Low, else OK.
pub fn classify(stock: u32) -> StockStatus {
    Thresholds::default().classify(stock)
}
