//! Alert lifecycle.
//!
//! ```text
//! Active --acknowledge/reorder--> Acknowledged
//! Active | Acknowledged --ignore--> Removed
//! ```
//!
//! The list is most-recent-first and bounded: a spawn that would exceed the
//! capacity evicts from the tail (oldest insertion) first. Removed alerts are
//! never re-added.

use chrono::NaiveDateTime;
use invensync_core::{Alert, AlertConfig, AlertFilter, AlertPriority};
use rand::Rng;
use serde::Serialize;
use tracing::{debug, info};

/// Reorder notification handed to the purchasing collaborator.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ReorderRequest {
    pub alert_id: String,
    pub product: String,
    pub priority: AlertPriority,
}

/// Receives reorder requests raised from alerts.
pub trait ReorderSink {
    fn submit(&mut self, request: ReorderRequest);
}

/// Default sink: records the request in the log and nothing else.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogReorderSink;

impl ReorderSink for LogReorderSink {
    fn submit(&mut self, request: ReorderRequest) {
        info!(
            alert = %request.alert_id,
            product = %request.product,
            priority = ?request.priority,
            "reorder initiated"
        );
    }
}

#[derive(Clone, Debug)]
pub struct AlertBook {
    alerts: Vec<Alert>,
    config: AlertConfig,
    next_id: u64,
}

impl AlertBook {
    /// Build a book from seed alerts (most recent first), truncated to capacity.
    pub fn new(mut alerts: Vec<Alert>, config: AlertConfig) -> Self {
        alerts.truncate(config.capacity);
        let next_id = alerts
            .iter()
            .filter_map(|a| a.id.parse::<u64>().ok())
            .max()
            .unwrap_or(0)
            + 1;
        Self {
            alerts,
            config,
            next_id,
        }
    }

    pub fn alerts(&self) -> &[Alert] {
        &self.alerts
    }

    pub fn get(&self, id: &str) -> Option<&Alert> {
        self.alerts.iter().find(|a| a.id == id)
    }

    /// Alerts matching `filter`, order preserved.
    pub fn filtered(&self, filter: AlertFilter) -> Vec<Alert> {
        self.alerts
            .iter()
            .filter(|a| filter.matches(a))
            .cloned()
            .collect()
    }

    /// Number of alerts still awaiting action; drives the navigation badge.
    pub fn unacknowledged(&self) -> usize {
        self.alerts.iter().filter(|a| !a.acknowledged).count()
    }

    /// Spawn tick: one new alert with a random priority.
    pub fn tick<R: Rng>(&mut self, rng: &mut R, now: NaiveDateTime) -> &Alert {
        let priority = if rng.gen_bool(self.config.critical_probability) {
            AlertPriority::Critical
        } else {
            AlertPriority::Warning
        };
        let product = self.config.spawn_product.clone();
        let message = self.config.spawn_message.clone();
        self.push(product, message, priority, now)
    }

    /// Insert a new alert at the head, evicting the oldest beyond capacity.
    pub fn push(
        &mut self,
        product: impl Into<String>,
        message: impl Into<String>,
        priority: AlertPriority,
        now: NaiveDateTime,
    ) -> &Alert {
        let alert = Alert {
            id: self.next_id.to_string(),
            product: product.into(),
            message: message.into(),
            timestamp: now,
            priority,
            acknowledged: false,
        };
        self.next_id += 1;
        debug!(id = %alert.id, ?priority, "alert raised");
        self.alerts.insert(0, alert);
        if self.alerts.len() > self.config.capacity {
            for evicted in self.alerts.drain(self.config.capacity..) {
                debug!(id = %evicted.id, "alert evicted");
            }
        }
        &self.alerts[0]
    }

    /// Mark an alert handled. Returns `false` for unknown ids.
    pub fn acknowledge(&mut self, id: &str) -> bool {
        match self.alerts.iter_mut().find(|a| a.id == id) {
            Some(alert) => {
                alert.acknowledged = true;
                true
            }
            None => false,
        }
    }

    /// Notify `sink`, then acknowledge. Unknown ids notify nobody.
    pub fn reorder(&mut self, id: &str, sink: &mut dyn ReorderSink) -> bool {
        let Some(alert) = self.get(id) else {
            return false;
        };
        sink.submit(ReorderRequest {
            alert_id: alert.id.clone(),
            product: alert.product.clone(),
            priority: alert.priority,
        });
        self.acknowledge(id)
    }

    /// Remove an alert unconditionally. Returns the removed alert.
    pub fn ignore(&mut self, id: &str) -> Option<Alert> {
        let idx = self.alerts.iter().position(|a| a.id == id)?;
        let removed = self.alerts.remove(idx);
        debug!(id = %removed.id, "alert ignored");
        Some(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::walk::seeded_rng;
    use invensync_core::{seed, SimConfig};
    use proptest::prelude::*;

    #[derive(Default)]
    struct Recorder(Vec<ReorderRequest>);

    impl ReorderSink for Recorder {
        fn submit(&mut self, request: ReorderRequest) {
            self.0.push(request);
        }
    }

    fn book() -> (AlertBook, SimConfig) {
        let cfg = SimConfig::default();
        (
            AlertBook::new(seed::alerts(cfg.epoch), cfg.alerts.clone()),
            cfg,
        )
    }

    #[test]
    fn acknowledge_is_idempotent() {
        let (mut b, _) = book();
        assert!(b.acknowledge("1"));
        let once = b.alerts().to_vec();
        assert!(b.acknowledge("1"));
        assert_eq!(b.alerts(), once.as_slice());
        assert!(b.get("1").unwrap().acknowledged);
    }

    #[test]
    fn missing_ids_are_noops() {
        let (mut b, _) = book();
        let mut sink = Recorder::default();
        assert!(!b.acknowledge("404"));
        assert!(!b.reorder("404", &mut sink));
        assert!(b.ignore("404").is_none());
        assert!(sink.0.is_empty());
        assert_eq!(b.alerts().len(), 3);
    }

    #[test]
    fn reorder_notifies_then_acknowledges() {
        let (mut b, _) = book();
        let mut sink = Recorder::default();
        assert!(b.reorder("2", &mut sink));
        assert_eq!(
            sink.0,
            vec![ReorderRequest {
                alert_id: "2".into(),
                product: "Smartphone Cases".into(),
                priority: AlertPriority::Warning,
            }]
        );
        assert!(b.get("2").unwrap().acknowledged);
    }

    #[test]
    fn ignore_removes_even_acknowledged() {
        let (mut b, _) = book();
        let removed = b.ignore("3").unwrap();
        assert!(removed.acknowledged);
        assert!(b.get("3").is_none());
        assert!(!b.acknowledge("3"));
    }

    #[test]
    fn critical_filter_keeps_order() {
        let (mut b, cfg) = book();
        b.push("Power Banks", "m", AlertPriority::Critical, cfg.epoch);
        // now: [4 Critical, 1 Critical, 2 Warning, 3 Warning]
        b.ignore("3");
        let critical = b.filtered(AlertFilter::Critical);
        let ids: Vec<&str> = critical.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["4", "1"]);
        assert_eq!(b.filtered(AlertFilter::Warning).len(), 1);
        assert_eq!(b.filtered(AlertFilter::All).len(), 3);
    }

    #[test]
    fn overflow_evicts_oldest_first() {
        let (mut b, cfg) = book();
        for _ in 0..7 {
            b.push("p", "m", AlertPriority::Warning, cfg.epoch);
        }
        assert_eq!(b.alerts().len(), 10);
        assert_eq!(b.alerts().last().unwrap().id, "3");

        b.push("p", "m", AlertPriority::Warning, cfg.epoch);
        assert_eq!(b.alerts().len(), 10);
        assert!(b.get("3").is_none());
        assert_eq!(b.alerts().last().unwrap().id, "2");
        assert_eq!(b.alerts()[0].id, "11");
    }

    #[test]
    fn badge_counts_unacknowledged() {
        let (mut b, cfg) = book();
        assert_eq!(b.unacknowledged(), 2);
        b.tick(&mut seeded_rng(0), cfg.epoch);
        assert_eq!(b.unacknowledged(), 3);
        b.acknowledge("1");
        b.ignore("2");
        assert_eq!(b.unacknowledged(), 1);
    }

    #[test]
    fn spawned_alert_uses_template() {
        let (mut b, cfg) = book();
        let a = b.tick(&mut seeded_rng(8), cfg.epoch).clone();
        assert_eq!(a.product, "Power Banks");
        assert_eq!(a.message, "Stock level changed - monitoring required");
        assert!(!a.acknowledged);
        assert_eq!(b.alerts()[0], a);
    }

    proptest! {
        #[test]
        fn length_is_bounded(seed in any::<u64>(), spawns in 0usize..60) {
            let (mut b, cfg) = book();
            let mut rng = seeded_rng(seed);
            for _ in 0..spawns {
                b.tick(&mut rng, cfg.epoch);
                prop_assert!(b.alerts().len() <= 10);
            }
            let ids: Vec<u64> = b.alerts().iter().map(|a| a.id.parse().unwrap()).collect();
            prop_assert!(ids.windows(2).all(|w| w[0] > w[1]));
        }
    }
}
