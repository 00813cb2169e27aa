//! Forecast board. Predicted stock and days remaining are random-walked;
//! current stock and trend stay as seeded.

use invensync_core::{ForecastConfig, ForecastRecord, ForecastUrgency};
use rand::Rng;
use tracing::debug;

use crate::walk::step_count;

#[derive(Clone, Debug)]
pub struct ForecastBoard {
    records: Vec<ForecastRecord>,
    config: ForecastConfig,
}

impl ForecastBoard {
    pub fn new(mut records: Vec<ForecastRecord>, config: ForecastConfig) -> Self {
        for r in &mut records {
            r.days_remaining = r.days_remaining.max(config.min_days);
        }
        Self { records, config }
    }

    pub fn records(&self) -> &[ForecastRecord] {
        &self.records
    }

    pub fn tick<R: Rng>(&mut self, rng: &mut R) {
        let cfg = &self.config;
        for r in &mut self.records {
            r.predicted_stock = step_count(rng, r.predicted_stock, &cfg.predicted_delta, 0);
            r.days_remaining = step_count(rng, r.days_remaining, &cfg.days_delta, cfg.min_days);
        }
        debug!(records = self.records.len(), "forecast tick");
    }

    /// Products projected to run out within three days.
    pub fn critical(&self) -> impl Iterator<Item = &ForecastRecord> {
        self.records
            .iter()
            .filter(|r| r.urgency() == ForecastUrgency::Critical)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::walk::seeded_rng;
    use invensync_core::{seed, SimConfig, Trend};

    fn board() -> ForecastBoard {
        ForecastBoard::new(seed::forecasts(), SimConfig::default().forecast)
    }

    #[test]
    fn days_never_drop_below_one() {
        let mut b = board();
        let mut rng = seeded_rng(11);
        for _ in 0..200 {
            b.tick(&mut rng);
            assert!(b.records().iter().all(|r| r.days_remaining >= 1));
        }
        // Every record walks down to the floor eventually.
        assert!(b.records().iter().all(|r| r.days_remaining == 1));
    }

    #[test]
    fn trend_and_current_stock_are_fixed() {
        let mut b = board();
        let before = b.records().to_vec();
        b.tick(&mut seeded_rng(5));
        for (old, new) in before.iter().zip(b.records()) {
            assert_eq!(old.trend, new.trend);
            assert_eq!(old.current_stock, new.current_stock);
            let d = i64::from(new.predicted_stock) - i64::from(old.predicted_stock);
            assert!(d <= 4);
        }
        assert_eq!(b.records()[2].trend, Trend::Increasing);
    }

    #[test]
    fn urgency_tiers() {
        let b = board();
        let critical: Vec<&str> = b.critical().map(|r| r.product.as_str()).collect();
        assert_eq!(critical, vec!["USB Cables"]);
        let mut r = b.records()[0].clone();
        r.days_remaining = 7;
        assert_eq!(r.urgency(), ForecastUrgency::Warning);
        r.days_remaining = 8;
        assert_eq!(r.urgency(), ForecastUrgency::Ok);
    }
}
