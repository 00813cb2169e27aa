//! Rack sensor grid.
//!
//! Stock, battery and temperature are random-walked each tick. `status` is
//! not derived from any of them: a sensor may report 5% battery and still be
//! `online`. Callers that want a health tier must compute it themselves.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use invensync_core::{Sensor, SensorConfig, SensorStatus};
use rand::Rng;
use serde::Serialize;
use tracing::debug;

use crate::walk::{step_count, step_int, step_real};

/// Per-zone sensor counts by status.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ZoneStats {
    pub zone: String,
    pub total: usize,
    pub online: usize,
    pub warning: usize,
    pub offline: usize,
}

#[derive(Clone, Debug)]
pub struct SensorGrid {
    sensors: Vec<Sensor>,
    config: SensorConfig,
}

impl SensorGrid {
    /// Build a grid, clamping seeded readings into the configured ranges.
    pub fn new(mut sensors: Vec<Sensor>, config: SensorConfig) -> Self {
        for s in &mut sensors {
            s.battery = config.battery_range.clamp(i64::from(s.battery)) as u8;
            s.temperature = config.temperature_range.clamp(s.temperature);
        }
        Self { sensors, config }
    }

    pub fn sensors(&self) -> &[Sensor] {
        &self.sensors
    }

    pub fn get(&self, id: &str) -> Option<&Sensor> {
        self.sensors.iter().find(|s| s.id == id)
    }

    pub fn tick<R: Rng>(&mut self, rng: &mut R, now: NaiveDateTime) {
        let cfg = &self.config;
        for s in &mut self.sensors {
            s.stock = step_count(rng, s.stock, &cfg.stock_delta, 0);
            // battery_range is validated to lie within u8
            s.battery =
                step_int(rng, i64::from(s.battery), &cfg.battery_delta, &cfg.battery_range) as u8;
            s.temperature = step_real(
                rng,
                s.temperature,
                &cfg.temperature_delta,
                &cfg.temperature_range,
            );
            s.last_update = now;
        }
        debug!(sensors = self.sensors.len(), "sensor tick");
    }

    /// Status counts per zone, ordered by zone name.
    pub fn zone_stats(&self) -> Vec<ZoneStats> {
        let mut zones: BTreeMap<&str, ZoneStats> = BTreeMap::new();
        for s in &self.sensors {
            let entry = zones.entry(s.zone.as_str()).or_insert_with(|| ZoneStats {
                zone: s.zone.clone(),
                ..ZoneStats::default()
            });
            entry.total += 1;
            match s.status {
                SensorStatus::Online => entry.online += 1,
                SensorStatus::Warning => entry.warning += 1,
                SensorStatus::Offline => entry.offline += 1,
            }
        }
        zones.into_values().collect()
    }
}
