//! Read models and commands consumed by the presentation layer.
//!
//! Every list accessor returns an owned copy; callers cannot reach engine
//! internals. Commands apply synchronously and treat unknown ids as no-ops.

use chrono::NaiveDateTime;
use invensync_core::{
    Alert, AlertFilter, ForecastRecord, InventoryItem, MovingEntity, Position, ReplenishmentItem,
    Sensor, StockStatus,
};
use invensync_sim::{InventorySummary, PurchaseOrder, ReplenishmentSummary, ZoneStats};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::debug;

use crate::engine::{Alerts, Forecasts, Inventory, Movers, Replenishment, Sensors, WarehouseEngine};

/// Everything the dashboard renders, captured at one instant.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct WarehouseSnapshot {
    pub at: NaiveDateTime,
    pub inventory: Vec<InventoryItem>,
    pub dashboard: InventorySummary,
    pub sensors: Vec<Sensor>,
    pub zones: Vec<ZoneStats>,
    pub moving: Vec<MovingEntity>,
    pub alerts: Vec<Alert>,
    pub alert_badge: usize,
    pub forecasts: Vec<ForecastRecord>,
    pub replenishment: Vec<ReplenishmentItem>,
    pub replenishment_summary: ReplenishmentSummary,
}

/// Relative age as shown next to timestamps, e.g. "3s ago".
pub fn age_label(then: NaiveDateTime, now: NaiveDateTime) -> String {
    let secs = (now - then).num_seconds();
    if secs < 1 {
        "Just now".to_string()
    } else if secs < 60 {
        format!("{secs}s ago")
    } else if secs < 3_600 {
        format!("{}m ago", secs / 60)
    } else {
        format!("{}h ago", secs / 3_600)
    }
}

impl WarehouseEngine {
    pub fn list_inventory(&self) -> Vec<InventoryItem> {
        self.world.resource::<Inventory>().0.items().to_vec()
    }

    pub fn dashboard_summary(&self) -> InventorySummary {
        self.world.resource::<Inventory>().0.summary()
    }

    pub fn list_sensors(&self) -> Vec<Sensor> {
        self.world.resource::<Sensors>().0.sensors().to_vec()
    }

    pub fn zone_stats(&self) -> Vec<ZoneStats> {
        self.world.resource::<Sensors>().0.zone_stats()
    }

    pub fn list_moving_entities(&self) -> Vec<MovingEntity> {
        self.world.resource::<Movers>().0.entities().to_vec()
    }

    /// Activity feed lines for entities in progress.
    pub fn activity_feed(&self) -> Vec<String> {
        self.world.resource::<Movers>().0.activity()
    }

    pub fn list_alerts(&self, filter: AlertFilter) -> Vec<Alert> {
        self.world.resource::<Alerts>().0.filtered(filter)
    }

    /// Navigation badge: unacknowledged alerts in the list.
    pub fn alert_badge(&self) -> usize {
        self.world.resource::<Alerts>().0.unacknowledged()
    }

    pub fn list_forecasts(&self) -> Vec<ForecastRecord> {
        self.world.resource::<Forecasts>().0.records().to_vec()
    }

    pub fn list_replenishment(&self) -> Vec<ReplenishmentItem> {
        self.world.resource::<Replenishment>().0.items().to_vec()
    }

    pub fn replenishment_summary(&self) -> ReplenishmentSummary {
        self.world.resource::<Replenishment>().0.summary()
    }

    /// Running reorder cost of a prospective purchase-order selection.
    pub fn selection_cost(&self, ids: &[String]) -> Decimal {
        self.world.resource::<Replenishment>().0.selection_cost(ids)
    }

    pub fn snapshot(&self) -> WarehouseSnapshot {
        WarehouseSnapshot {
            at: self.now(),
            inventory: self.list_inventory(),
            dashboard: self.dashboard_summary(),
            sensors: self.list_sensors(),
            zones: self.zone_stats(),
            moving: self.list_moving_entities(),
            alerts: self.list_alerts(AlertFilter::All),
            alert_badge: self.alert_badge(),
            forecasts: self.list_forecasts(),
            replenishment: self.list_replenishment(),
            replenishment_summary: self.replenishment_summary(),
        }
    }

    /// Apply an exact stock change to one inventory item, as a goods-in or
    /// picking event would. Returns the re-derived status.
    pub fn adjust_stock(&mut self, id: &str, delta: i64) -> Option<StockStatus> {
        let now = self.now();
        self.world
            .resource_mut::<Inventory>()
            .0
            .apply_delta(id, delta, now)
    }

    /// Send a mover from the origin to `target`. `None` at the population cap.
    pub fn dispatch_mover(&mut self, target: Position, label: &str) -> Option<MovingEntity> {
        self.world
            .resource_mut::<Movers>()
            .0
            .spawn_at(target, label)
            .cloned()
    }

    pub fn acknowledge_alert(&mut self, id: &str) -> bool {
        self.world.resource_mut::<Alerts>().0.acknowledge(id)
    }

    /// Hand the alert to the reorder collaborator, then acknowledge it.
    pub fn reorder_alert(&mut self, id: &str) -> bool {
        let mut alerts = self.world.resource_mut::<Alerts>();
        alerts.0.reorder(id, self.sink.as_mut())
    }

    pub fn ignore_alert(&mut self, id: &str) -> bool {
        self.world.resource_mut::<Alerts>().0.ignore(id).is_some()
    }

    /// Returns the new flag value, or `None` for an unknown item.
    pub fn toggle_auto_replenish(&mut self, id: &str) -> Option<bool> {
        self.world
            .resource_mut::<Replenishment>()
            .0
            .toggle_auto_replenish(id)
    }

    pub fn set_supplier(&mut self, id: &str, supplier: &str) -> bool {
        self.world
            .resource_mut::<Replenishment>()
            .0
            .set_supplier(id, supplier)
    }

    pub fn generate_purchase_order(&mut self, ids: &[String]) -> Option<PurchaseOrder> {
        let today = self.now().date();
        self.world
            .resource_mut::<Replenishment>()
            .0
            .generate_purchase_order(ids, today)
    }

    /// Select a sensor for the detail panel. Unknown ids leave the current
    /// selection as it was and return `None`.
    pub fn select_sensor(&mut self, id: &str) -> Option<Sensor> {
        let sensor = self.world.resource::<Sensors>().0.get(id).cloned()?;
        debug!(id, "sensor selected");
        self.selected_sensor = Some(sensor.id.clone());
        Some(sensor)
    }

    pub fn clear_sensor_selection(&mut self) {
        self.selected_sensor = None;
    }

    /// Latest readings of the selected sensor.
    pub fn selected_sensor(&self) -> Option<Sensor> {
        let id = self.selected_sensor.as_deref()?;
        self.world.resource::<Sensors>().0.get(id).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use invensync_core::{AlertPriority, OrderStatus, SimConfig};

    fn engine() -> WarehouseEngine {
        WarehouseEngine::new(SimConfig::default()).unwrap()
    }

    #[test]
    fn age_labels() {
        let t = SimConfig::default().epoch;
        assert_eq!(age_label(t, t), "Just now");
        assert_eq!(age_label(t, t + Duration::seconds(3)), "3s ago");
        assert_eq!(age_label(t, t + Duration::seconds(125)), "2m ago");
        assert_eq!(age_label(t, t + Duration::hours(5)), "5h ago");
        assert_eq!(age_label(t + Duration::seconds(5), t), "Just now");
    }

    #[test]
    fn snapshots_are_copies() {
        let mut e = engine();
        let mut inv = e.list_inventory();
        inv[0].stock = 0;
        inv.clear();
        assert_eq!(e.list_inventory().len(), 6);
        assert_eq!(e.list_inventory()[0].stock, 145);

        let mut alerts = e.list_alerts(AlertFilter::All);
        alerts[0].acknowledged = true;
        assert_eq!(e.alert_badge(), 2);
        assert!(e.acknowledge_alert("1"));
        assert_eq!(e.alert_badge(), 1);
    }

    #[test]
    fn ignore_and_filter_through_surface() {
        let mut e = engine();
        assert!(e.ignore_alert("2"));
        assert!(!e.ignore_alert("2"));
        let warnings = e.list_alerts(AlertFilter::Warning);
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].priority, AlertPriority::Warning);
    }

    #[test]
    fn selection_tracks_live_readings() {
        let mut e = engine();
        assert!(e.selected_sensor().is_none());
        let picked = e.select_sensor("S007").unwrap();
        assert_eq!(picked.battery, 15);

        e.start();
        e.advance(40_000);
        e.stop();
        let live = e.selected_sensor().unwrap();
        assert_eq!(live.id, "S007");
        assert_eq!(live.last_update, e.now());

        // unknown id keeps the previous selection
        assert!(e.select_sensor("S404").is_none());
        assert_eq!(e.selected_sensor().unwrap().id, "S007");
        e.clear_sensor_selection();
        assert!(e.selected_sensor().is_none());
    }

    #[test]
    fn purchase_order_uses_virtual_date() {
        let mut e = engine();
        e.advance(2 * 24 * 3_600 * 1_000);
        let ids = vec!["2".to_string()];
        assert_eq!(e.selection_cost(&ids), Decimal::new(199_500, 2));
        let po = e.generate_purchase_order(&ids).unwrap();
        assert_eq!(po.issued_on.to_string(), "2024-01-17");
        let item = e
            .list_replenishment()
            .into_iter()
            .find(|i| i.id == "2")
            .unwrap();
        assert_eq!(item.status, OrderStatus::Ordered);
        assert_eq!(e.replenishment_summary().pending, 0);
        assert!(e.generate_purchase_order(&["x".to_string()]).is_none());
    }

    #[test]
    fn replenishment_commands() {
        let mut e = engine();
        assert_eq!(e.toggle_auto_replenish("1"), Some(false));
        assert_eq!(e.toggle_auto_replenish("404"), None);
        assert!(e.set_supplier("3", "Warehouse Direct"));
        assert!(!e.set_supplier("404", "Warehouse Direct"));
        let s = e.replenishment_summary();
        assert_eq!(s.auto_replenish, 1);
    }

    #[test]
    fn snapshot_serializes() {
        let e = engine();
        let snap = e.snapshot();
        assert_eq!(snap.alert_badge, 2);
        assert_eq!(snap.zones.len(), 3);
        let json = serde_json::to_value(&snap).unwrap();
        assert_eq!(json["inventory"][2]["status"], "Critical");
        assert_eq!(json["inventory"][0]["status"], "OK");
        assert_eq!(json["sensors"][7]["status"], "offline");
    }
}
