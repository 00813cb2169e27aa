#![deny(warnings)]

//! Simulation managers for InvenSync.
//!
//! Each manager exclusively owns one entity collection and mutates it only
//! through its `tick` (driven by the caller's RNG and virtual clock) or
//! through explicit commands. Nothing here schedules itself; the runtime
//! decides when ticks happen.

pub mod alerts;
pub mod forecast;
pub mod inventory;
pub mod movement;
pub mod replenishment;
pub mod sensors;
pub mod walk;

pub use alerts::{AlertBook, LogReorderSink, ReorderRequest, ReorderSink};
pub use forecast::ForecastBoard;
pub use inventory::{InventoryBoard, InventorySummary};
pub use movement::Fleet;
pub use replenishment::{PurchaseOrder, PurchaseOrderLine, ReplenishmentDesk, ReplenishmentSummary};
pub use sensors::{SensorGrid, ZoneStats};
