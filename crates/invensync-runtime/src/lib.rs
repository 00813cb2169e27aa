#![deny(warnings)]

//! Runtime for the InvenSync warehouse simulation.
//!
//! The [`WarehouseEngine`] keeps every manager as a resource in a `bevy_ecs`
//! world and runs one single-threaded schedule per cadence whenever the
//! virtual [`ClockRegistry`] reports a tick as due. Presentation layers read
//! owned snapshots and issue commands through the engine; they never touch
//! manager state directly.

pub mod clock;
mod engine;
mod surface;

pub use clock::{ClockError, ClockRegistry, TickEvent, TimerHandle};
pub use engine::{Cadence, Seed, WarehouseEngine};
pub use surface::{age_label, WarehouseSnapshot};

pub use invensync_sim::{PurchaseOrder, ReorderRequest, ReorderSink};
