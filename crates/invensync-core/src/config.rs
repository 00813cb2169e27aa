use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::classify::Thresholds;
use crate::model::Position;

pub const DEFAULT_SEED: u64 = 42;

pub const INVENTORY_PERIOD_MS: u64 = 3_000;
pub const SENSOR_PERIOD_MS: u64 = 4_000;
pub const FORECAST_PERIOD_MS: u64 = 5_000;
pub const ALERT_SPAWN_PERIOD_MS: u64 = 20_000;
pub const MOVEMENT_PERIOD_MS: u64 = 200;

pub const CRITICAL_MAX_STOCK: u32 = 10;
pub const LOW_MAX_STOCK: u32 = 25;

pub const INVENTORY_STOCK_DELTA: IntRange = IntRange::new(-3, 2);

pub const SENSOR_STOCK_DELTA: IntRange = IntRange::new(-2, 1);
pub const SENSOR_BATTERY_DELTA: IntRange = IntRange::new(-1, 1);
pub const SENSOR_BATTERY_RANGE: IntRange = IntRange::new(0, 100);
pub const SENSOR_TEMPERATURE_DELTA: RealRange = RealRange::new(-1.0, 1.0);
pub const SENSOR_TEMPERATURE_RANGE: RealRange = RealRange::new(18.0, 30.0);

pub const FORECAST_PREDICTED_DELTA: IntRange = IntRange::new(-5, 4);
pub const FORECAST_DAYS_DELTA: IntRange = IntRange::new(-1, 0);
pub const FORECAST_MIN_DAYS: u32 = 1;

pub const MOVEMENT_ORIGIN: Position = Position::new(5.0, 85.0);
pub const MOVEMENT_TARGET_X: RealRange = RealRange::new(10.0, 80.0);
pub const MOVEMENT_TARGET_Y: RealRange = RealRange::new(15.0, 75.0);
pub const MOVEMENT_SPEED: f64 = 0.8;
pub const ARRIVAL_RADIUS: f64 = 2.0;
pub const POPULATION_CAP: usize = 3;
pub const SPAWN_PROBABILITY: f64 = 0.3;
pub const MOVEMENT_LABELS: [&str; 3] = ["Inventory Restock", "Quality Check", "Order Pickup"];

pub const ALERT_CAPACITY: usize = 10;
pub const ALERT_CRITICAL_PROBABILITY: f64 = 0.5;
pub const ALERT_SPAWN_PRODUCT: &str = "Power Banks";
pub const ALERT_SPAWN_MESSAGE: &str = "Stock level changed - monitoring required";

/// Configuration rejected at construction time.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{0}: period must be > 0 ms")]
    ZeroPeriod(&'static str),
    #[error("{field}: min {min} is greater than max {max}")]
    InvertedRange {
        field: &'static str,
        min: f64,
        max: f64,
    },
    #[error("{field}: [{min}, {max}] does not fit in [{lo}, {hi}]")]
    OutOfRange {
        field: &'static str,
        min: i64,
        max: i64,
        lo: i64,
        hi: i64,
    },
    #[error("{0}: non-finite value")]
    NonFinite(&'static str),
    #[error("{field}: probability {value} outside [0, 1]")]
    ProbabilityOutOfRange { field: &'static str, value: f64 },
    #[error("{field}: must be > 0, got {value}")]
    NonPositive { field: &'static str, value: f64 },
    #[error("thresholds: low_max {low_max} is below critical_max {critical_max}")]
    ThresholdOrder { critical_max: u32, low_max: u32 },
    #[error("{0}: capacity must be at least 1")]
    ZeroCapacity(&'static str),
    #[error("{0}: floor must be at least 1 day")]
    ZeroFloor(&'static str),
    #[error("movement.labels must not be empty")]
    EmptyLabels,
}

/// Inclusive integer range, used both for random deltas and for clamps.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntRange {
    pub min: i64,
    pub max: i64,
}

impl IntRange {
    pub const fn new(min: i64, max: i64) -> Self {
        Self { min, max }
    }

    pub fn clamp(&self, value: i64) -> i64 {
        value.clamp(self.min, self.max)
    }

    pub fn validate(&self, field: &'static str) -> Result<(), ConfigError> {
        if self.min > self.max {
            return Err(ConfigError::InvertedRange {
                field,
                min: self.min as f64,
                max: self.max as f64,
            });
        }
        Ok(())
    }
}

/// Closed real range.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RealRange {
    pub min: f64,
    pub max: f64,
}

impl RealRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }

    pub fn contains(&self, value: f64) -> bool {
        (self.min..=self.max).contains(&value)
    }

    pub fn validate(&self, field: &'static str) -> Result<(), ConfigError> {
        if !(self.min.is_finite() && self.max.is_finite()) {
            return Err(ConfigError::NonFinite(field));
        }
        if self.min > self.max {
            return Err(ConfigError::InvertedRange {
                field,
                min: self.min,
                max: self.max,
            });
        }
        Ok(())
    }
}

/// Tick periods per concern, in milliseconds.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CadenceConfig {
    pub inventory_ms: u64,
    pub sensors_ms: u64,
    pub forecast_ms: u64,
    pub alert_spawn_ms: u64,
    pub movement_ms: u64,
}

impl Default for CadenceConfig {
    fn default() -> Self {
        Self {
            inventory_ms: INVENTORY_PERIOD_MS,
            sensors_ms: SENSOR_PERIOD_MS,
            forecast_ms: FORECAST_PERIOD_MS,
            alert_spawn_ms: ALERT_SPAWN_PERIOD_MS,
            movement_ms: MOVEMENT_PERIOD_MS,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InventoryConfig {
    pub stock_delta: IntRange,
}

impl Default for InventoryConfig {
    fn default() -> Self {
        Self {
            stock_delta: INVENTORY_STOCK_DELTA,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SensorConfig {
    pub stock_delta: IntRange,
    pub battery_delta: IntRange,
    pub battery_range: IntRange,
    pub temperature_delta: RealRange,
    pub temperature_range: RealRange,
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            stock_delta: SENSOR_STOCK_DELTA,
            battery_delta: SENSOR_BATTERY_DELTA,
            battery_range: SENSOR_BATTERY_RANGE,
            temperature_delta: SENSOR_TEMPERATURE_DELTA,
            temperature_range: SENSOR_TEMPERATURE_RANGE,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastConfig {
    pub predicted_delta: IntRange,
    pub days_delta: IntRange,
    pub min_days: u32,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            predicted_delta: FORECAST_PREDICTED_DELTA,
            days_delta: FORECAST_DAYS_DELTA,
            min_days: FORECAST_MIN_DAYS,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementConfig {
    /// Loading dock where every entity spawns.
    pub origin: Position,
    pub target_x: RealRange,
    pub target_y: RealRange,
    /// Distance covered per movement tick.
    pub speed: f64,
    pub arrival_radius: f64,
    pub population_cap: usize,
    pub spawn_probability: f64,
    pub labels: Vec<String>,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            origin: MOVEMENT_ORIGIN,
            target_x: MOVEMENT_TARGET_X,
            target_y: MOVEMENT_TARGET_Y,
            speed: MOVEMENT_SPEED,
            arrival_radius: ARRIVAL_RADIUS,
            population_cap: POPULATION_CAP,
            spawn_probability: SPAWN_PROBABILITY,
            labels: MOVEMENT_LABELS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertConfig {
    /// Maximum number of retained alerts; the oldest are evicted first.
    pub capacity: usize,
    pub critical_probability: f64,
    pub spawn_product: String,
    pub spawn_message: String,
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            capacity: ALERT_CAPACITY,
            critical_probability: ALERT_CRITICAL_PROBABILITY,
            spawn_product: ALERT_SPAWN_PRODUCT.to_string(),
            spawn_message: ALERT_SPAWN_MESSAGE.to_string(),
        }
    }
}

fn default_epoch() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, 15)
        .and_then(|d| d.and_hms_opt(8, 0, 0))
        .unwrap_or_default()
}

/// Simulation configuration parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Seed for the deterministic RNG.
    pub rng_seed: u64,
    /// Wall-clock time at virtual time zero.
    pub epoch: NaiveDateTime,
    pub cadence: CadenceConfig,
    pub thresholds: Thresholds,
    pub inventory: InventoryConfig,
    pub sensors: SensorConfig,
    pub forecast: ForecastConfig,
    pub movement: MovementConfig,
    pub alerts: AlertConfig,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            rng_seed: DEFAULT_SEED,
            epoch: default_epoch(),
            cadence: CadenceConfig::default(),
            thresholds: Thresholds::default(),
            inventory: InventoryConfig::default(),
            sensors: SensorConfig::default(),
            forecast: ForecastConfig::default(),
            movement: MovementConfig::default(),
            alerts: AlertConfig::default(),
        }
    }
}

fn validate_probability(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if !value.is_finite() {
        return Err(ConfigError::NonFinite(field));
    }
    if !(0.0..=1.0).contains(&value) {
        return Err(ConfigError::ProbabilityOutOfRange { field, value });
    }
    Ok(())
}

fn validate_positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if !value.is_finite() {
        return Err(ConfigError::NonFinite(field));
    }
    if value <= 0.0 {
        return Err(ConfigError::NonPositive { field, value });
    }
    Ok(())
}

fn validate_position(field: &'static str, p: &Position) -> Result<(), ConfigError> {
    if !(p.x.is_finite() && p.y.is_finite()) {
        return Err(ConfigError::NonFinite(field));
    }
    Ok(())
}

impl SimConfig {
    /// Check every bound. Engines refuse to start on a malformed config.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let c = &self.cadence;
        for (field, ms) in [
            ("cadence.inventory_ms", c.inventory_ms),
            ("cadence.sensors_ms", c.sensors_ms),
            ("cadence.forecast_ms", c.forecast_ms),
            ("cadence.alert_spawn_ms", c.alert_spawn_ms),
            ("cadence.movement_ms", c.movement_ms),
        ] {
            if ms == 0 {
                return Err(ConfigError::ZeroPeriod(field));
            }
        }

        if self.thresholds.low_max < self.thresholds.critical_max {
            return Err(ConfigError::ThresholdOrder {
                critical_max: self.thresholds.critical_max,
                low_max: self.thresholds.low_max,
            });
        }

        self.inventory.stock_delta.validate("inventory.stock_delta")?;

        let s = &self.sensors;
        s.stock_delta.validate("sensors.stock_delta")?;
        s.battery_delta.validate("sensors.battery_delta")?;
        s.battery_range.validate("sensors.battery_range")?;
        if s.battery_range.min < 0 || s.battery_range.max > i64::from(u8::MAX) {
            return Err(ConfigError::OutOfRange {
                field: "sensors.battery_range",
                min: s.battery_range.min,
                max: s.battery_range.max,
                lo: 0,
                hi: i64::from(u8::MAX),
            });
        }
        s.temperature_delta.validate("sensors.temperature_delta")?;
        s.temperature_range.validate("sensors.temperature_range")?;

        let f = &self.forecast;
        f.predicted_delta.validate("forecast.predicted_delta")?;
        f.days_delta.validate("forecast.days_delta")?;
        if f.min_days == 0 {
            return Err(ConfigError::ZeroFloor("forecast.min_days"));
        }

        let m = &self.movement;
        validate_position("movement.origin", &m.origin)?;
        m.target_x.validate("movement.target_x")?;
        m.target_y.validate("movement.target_y")?;
        validate_positive("movement.speed", m.speed)?;
        validate_positive("movement.arrival_radius", m.arrival_radius)?;
        validate_probability("movement.spawn_probability", m.spawn_probability)?;
        if m.labels.is_empty() {
            return Err(ConfigError::EmptyLabels);
        }

        let a = &self.alerts;
        if a.capacity == 0 {
            return Err(ConfigError::ZeroCapacity("alerts.capacity"));
        }
        validate_probability("alerts.critical_probability", a.critical_probability)?;
        Ok(())
    }
}
