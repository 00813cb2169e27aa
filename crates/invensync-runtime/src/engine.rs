//! The warehouse engine: manager state in an ECS world, one schedule per
//! cadence, driven by the virtual clock.

use std::collections::HashMap;

use bevy_ecs::prelude::*;
use bevy_ecs::schedule::ExecutorKind;
use chrono::{Duration, NaiveDateTime};
use invensync_core::{
    seed, Alert, ConfigError, ForecastRecord, InventoryItem, ReplenishmentItem, Sensor, SimConfig,
};
use invensync_sim::walk::{seeded_rng, SimRng};
use invensync_sim::{
    AlertBook, Fleet, ForecastBoard, InventoryBoard, LogReorderSink, ReorderSink,
    ReplenishmentDesk, SensorGrid,
};
use tracing::{info, trace, warn};

use crate::clock::{ClockRegistry, TimerHandle};

/// The independent periodic concerns of the simulation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Cadence {
    Inventory,
    Sensors,
    Forecast,
    AlertSpawn,
    Movement,
}

impl Cadence {
    pub const ALL: [Cadence; 5] = [
        Cadence::Inventory,
        Cadence::Sensors,
        Cadence::Forecast,
        Cadence::AlertSpawn,
        Cadence::Movement,
    ];

    /// Configured period of this cadence in milliseconds.
    pub fn period_ms(&self, config: &SimConfig) -> u64 {
        let c = &config.cadence;
        match self {
            Cadence::Inventory => c.inventory_ms,
            Cadence::Sensors => c.sensors_ms,
            Cadence::Forecast => c.forecast_ms,
            Cadence::AlertSpawn => c.alert_spawn_ms,
            Cadence::Movement => c.movement_ms,
        }
    }
}

/// Initial collections for every manager.
#[derive(Clone, Debug)]
pub struct Seed {
    pub inventory: Vec<InventoryItem>,
    pub sensors: Vec<Sensor>,
    pub alerts: Vec<Alert>,
    pub forecasts: Vec<ForecastRecord>,
    pub replenishment: Vec<ReplenishmentItem>,
}

impl Seed {
    /// The fixed startup data of the dashboard.
    pub fn standard(config: &SimConfig) -> Self {
        Self {
            inventory: seed::inventory(config.epoch, &config.thresholds),
            sensors: seed::sensors(config.epoch),
            alerts: seed::alerts(config.epoch),
            forecasts: seed::forecasts(),
            replenishment: seed::replenishment(),
        }
    }

    /// No entities at all.
    pub fn empty() -> Self {
        Self {
            inventory: Vec::new(),
            sensors: Vec::new(),
            alerts: Vec::new(),
            forecasts: Vec::new(),
            replenishment: Vec::new(),
        }
    }
}

#[derive(Resource)]
pub(crate) struct Inventory(pub(crate) InventoryBoard);

#[derive(Resource)]
pub(crate) struct Sensors(pub(crate) SensorGrid);

#[derive(Resource)]
pub(crate) struct Forecasts(pub(crate) ForecastBoard);

#[derive(Resource)]
pub(crate) struct Alerts(pub(crate) AlertBook);

#[derive(Resource)]
pub(crate) struct Movers(pub(crate) Fleet);

#[derive(Resource)]
pub(crate) struct Replenishment(pub(crate) ReplenishmentDesk);

#[derive(Resource)]
struct Rng(SimRng);

/// Wall time of the tick being run.
#[derive(Resource)]
struct Now(NaiveDateTime);

fn inventory_system(mut board: ResMut<Inventory>, mut rng: ResMut<Rng>, now: Res<Now>) {
    board.0.tick(&mut rng.0, now.0);
}

fn sensor_system(mut grid: ResMut<Sensors>, mut rng: ResMut<Rng>, now: Res<Now>) {
    grid.0.tick(&mut rng.0, now.0);
}

fn forecast_system(mut board: ResMut<Forecasts>, mut rng: ResMut<Rng>) {
    board.0.tick(&mut rng.0);
}

fn alert_spawn_system(mut book: ResMut<Alerts>, mut rng: ResMut<Rng>, now: Res<Now>) {
    book.0.tick(&mut rng.0, now.0);
}

fn movement_system(mut fleet: ResMut<Movers>, mut rng: ResMut<Rng>) {
    fleet.0.tick(&mut rng.0);
}

fn build_schedule(cadence: Cadence) -> Schedule {
    let mut schedule = Schedule::default();
    schedule.set_executor_kind(ExecutorKind::SingleThreaded);
    match cadence {
        Cadence::Inventory => schedule.add_systems(inventory_system),
        Cadence::Sensors => schedule.add_systems(sensor_system),
        Cadence::Forecast => schedule.add_systems(forecast_system),
        Cadence::AlertSpawn => schedule.add_systems(alert_spawn_system),
        Cadence::Movement => schedule.add_systems(movement_system),
    };
    schedule
}

/// Owns every manager and the timers that drive them.
///
/// Single logical writer: ticks and commands run to completion one at a
/// time on the caller's thread.
pub struct WarehouseEngine {
    pub(crate) world: World,
    schedules: HashMap<Cadence, Schedule>,
    clock: ClockRegistry<Cadence>,
    handles: Vec<TimerHandle>,
    pub(crate) config: SimConfig,
    pub(crate) sink: Box<dyn ReorderSink + Send>,
    pub(crate) selected_sensor: Option<String>,
}

impl WarehouseEngine {
    /// Engine over the standard seed data. Fails fast on a malformed config.
    pub fn new(config: SimConfig) -> Result<Self, ConfigError> {
        let seed = Seed::standard(&config);
        Self::with_seed(config, seed)
    }

    pub fn with_seed(config: SimConfig, seed: Seed) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut world = World::new();
        world.insert_resource(Inventory(InventoryBoard::new(
            seed.inventory,
            config.thresholds,
            config.inventory.clone(),
        )));
        world.insert_resource(Sensors(SensorGrid::new(seed.sensors, config.sensors.clone())));
        world.insert_resource(Forecasts(ForecastBoard::new(
            seed.forecasts,
            config.forecast.clone(),
        )));
        world.insert_resource(Alerts(AlertBook::new(seed.alerts, config.alerts.clone())));
        world.insert_resource(Movers(Fleet::new(config.movement.clone())));
        world.insert_resource(Replenishment(ReplenishmentDesk::new(seed.replenishment)));
        world.insert_resource(Rng(seeded_rng(config.rng_seed)));
        world.insert_resource(Now(config.epoch));

        let schedules = Cadence::ALL
            .iter()
            .map(|c| (*c, build_schedule(*c)))
            .collect();

        Ok(Self {
            world,
            schedules,
            clock: ClockRegistry::new(),
            handles: Vec::new(),
            config,
            sink: Box::new(LogReorderSink),
            selected_sensor: None,
        })
    }

    /// Replace the reorder collaborator.
    pub fn with_reorder_sink(mut self, sink: impl ReorderSink + Send + 'static) -> Self {
        self.sink = Box::new(sink);
        self
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn is_running(&self) -> bool {
        !self.handles.is_empty()
    }

    /// Register one timer per cadence. Calling it again while running is a no-op.
    pub fn start(&mut self) {
        if self.is_running() {
            return;
        }
        for cadence in Cadence::ALL {
            // periods are validated non-zero at construction
            match self.clock.schedule(cadence.period_ms(&self.config), cadence) {
                Ok(handle) => self.handles.push(handle),
                Err(e) => warn!(?cadence, error = %e, "timer not scheduled"),
            }
        }
        info!(timers = self.handles.len(), at_ms = self.clock.now_ms(), "engine started");
    }

    /// Cancel every timer registered by [`start`](Self::start).
    pub fn stop(&mut self) {
        if !self.is_running() {
            return;
        }
        let cancelled = self
            .handles
            .drain(..)
            .filter(|h| self.clock.cancel(*h))
            .count();
        info!(cancelled, at_ms = self.clock.now_ms(), "engine stopped");
    }

    /// Timers still registered with the clock.
    pub fn active_timers(&self) -> usize {
        self.clock.active()
    }

    /// Virtual milliseconds since the epoch.
    pub fn elapsed_ms(&self) -> u64 {
        self.clock.now_ms()
    }

    /// Current wall time of the simulation.
    pub fn now(&self) -> NaiveDateTime {
        self.at(self.clock.now_ms())
    }

    fn at(&self, ms: u64) -> NaiveDateTime {
        let offset = Duration::milliseconds(i64::try_from(ms).unwrap_or(i64::MAX));
        self.config
            .epoch
            .checked_add_signed(offset)
            .unwrap_or(NaiveDateTime::MAX)
    }

    /// Move virtual time forward by `ms`, running every tick that falls due
    /// on the way. Returns the number of ticks run.
    pub fn advance(&mut self, ms: u64) -> usize {
        let until = self.clock.now_ms().saturating_add(ms);
        let mut ran = 0;
        while let Some(tick) = self.clock.pop_due(until) {
            self.run_tick(tick.payload, tick.due_ms);
            ran += 1;
        }
        self.clock.advance_to(until);
        ran
    }

    /// Run one cadence immediately, outside the timer schedule.
    pub fn run_cadence(&mut self, cadence: Cadence) {
        let now = self.clock.now_ms();
        self.run_tick(cadence, now);
    }

    fn run_tick(&mut self, cadence: Cadence, due_ms: u64) {
        let now = self.at(due_ms);
        self.world.resource_mut::<Now>().0 = now;
        if let Some(schedule) = self.schedules.get_mut(&cadence) {
            schedule.run(&mut self.world);
        }
        trace!(?cadence, due_ms, "tick");
    }
}

impl Drop for WarehouseEngine {
    fn drop(&mut self) {
        let leaked = self.clock.active();
        if leaked > 0 {
            warn!(leaked, "engine dropped without stop(); timers leaked");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_registers_one_timer_per_cadence() {
        let mut engine = WarehouseEngine::new(SimConfig::default()).unwrap();
        assert_eq!(engine.active_timers(), 0);
        engine.start();
        engine.start();
        assert_eq!(engine.active_timers(), 5);
        engine.stop();
        assert_eq!(engine.active_timers(), 0);
        assert!(!engine.is_running());
    }

    #[test]
    fn malformed_config_fails_at_construction() {
        let mut cfg = SimConfig::default();
        cfg.cadence.inventory_ms = 0;
        assert!(matches!(
            WarehouseEngine::new(cfg),
            Err(ConfigError::ZeroPeriod("cadence.inventory_ms"))
        ));
    }

    #[test]
    fn tick_counts_follow_periods() {
        let mut engine = WarehouseEngine::new(SimConfig::default()).unwrap();
        engine.start();
        // 60s: 20 inventory, 15 sensors, 12 forecast, 3 alert spawns, 300 movement
        assert_eq!(engine.advance(60_000), 20 + 15 + 12 + 3 + 300);
        assert_eq!(engine.elapsed_ms(), 60_000);
        engine.stop();
    }

    #[test]
    fn stopped_engine_lets_time_pass_without_ticks() {
        let mut engine = WarehouseEngine::new(SimConfig::default()).unwrap();
        assert_eq!(engine.advance(10_000), 0);
        assert_eq!(engine.elapsed_ms(), 10_000);
        assert_eq!(
            engine.now(),
            engine.config().epoch + Duration::seconds(10)
        );
    }

    #[test]
    fn restart_after_stop_does_not_resurrect_old_handles() {
        let mut engine = WarehouseEngine::new(SimConfig::default()).unwrap();
        engine.start();
        engine.advance(1_000);
        engine.stop();
        engine.start();
        assert_eq!(engine.active_timers(), 5);
        // first inventory tick after restart is a full period later
        assert_eq!(engine.advance(2_999), 2_999 / 200);
        engine.stop();
    }

    #[test]
    fn split_advances_replay_the_same_ticks() {
        let run = |steps: &[u64]| {
            let mut engine = WarehouseEngine::new(SimConfig::default()).unwrap();
            engine.start();
            let ticks: usize = steps.iter().map(|&ms| engine.advance(ms)).sum();
            engine.stop();
            (ticks, engine.snapshot())
        };
        // 12s is due for inventory, sensors and movement at once
        let whole = run(&[24_000]);
        assert_eq!(whole, run(&[12_000, 12_000]));
        assert_eq!(whole, run(&[1, 11_999, 7_000, 5_000]));
    }
}
