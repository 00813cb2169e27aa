//! Dashboard inventory: stock random walk with re-classification.

use chrono::NaiveDateTime;
use invensync_core::{InventoryConfig, InventoryItem, StockStatus, Thresholds};
use rand::Rng;
use serde::Serialize;
use tracing::{debug, trace};

use crate::walk::{offset_count, step_count};

/// Aggregates shown on the dashboard header.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct InventorySummary {
    pub total_stock: u64,
    pub critical_items: usize,
    pub low_items: usize,
    /// Time of the most recent inventory tick, if any has run.
    pub last_update: Option<NaiveDateTime>,
}

/// Sole owner of the inventory collection.
#[derive(Clone, Debug)]
pub struct InventoryBoard {
    items: Vec<InventoryItem>,
    thresholds: Thresholds,
    config: InventoryConfig,
    last_tick: Option<NaiveDateTime>,
}

impl InventoryBoard {
    /// Build a board, re-deriving every status from its stock.
    pub fn new(
        mut items: Vec<InventoryItem>,
        thresholds: Thresholds,
        config: InventoryConfig,
    ) -> Self {
        for item in &mut items {
            item.status = thresholds.classify(item.stock);
        }
        Self {
            items,
            thresholds,
            config,
            last_tick: None,
        }
    }

    pub fn items(&self) -> &[InventoryItem] {
        &self.items
    }

    pub fn get(&self, id: &str) -> Option<&InventoryItem> {
        self.items.iter().find(|i| i.id == id)
    }

    /// Apply one independent random delta to every item.
    pub fn tick<R: Rng>(&mut self, rng: &mut R, now: NaiveDateTime) {
        let mut transitions = 0usize;
        for item in &mut self.items {
            let next = step_count(rng, item.stock, &self.config.stock_delta, 0);
            if Self::restock(item, next, &self.thresholds, now) {
                transitions += 1;
            }
        }
        self.last_tick = Some(now);
        debug!(items = self.items.len(), transitions, "inventory tick");
    }

    /// Apply an exact delta to one item. Returns the new status, or `None`
    /// when the id is unknown.
    pub fn apply_delta(&mut self, id: &str, delta: i64, now: NaiveDateTime) -> Option<StockStatus> {
        let thresholds = self.thresholds;
        let item = self.items.iter_mut().find(|i| i.id == id)?;
        let next = offset_count(item.stock, delta, 0);
        Self::restock(item, next, &thresholds, now);
        Some(item.status)
    }

    fn restock(
        item: &mut InventoryItem,
        stock: u32,
        thresholds: &Thresholds,
        now: NaiveDateTime,
    ) -> bool {
        let status = thresholds.classify(stock);
        let changed = status != item.status;
        if changed {
            trace!(id = %item.id, from = ?item.status, to = ?status, stock, "stock tier changed");
        }
        item.stock = stock;
        item.status = status;
        item.last_updated = now;
        changed
    }

    pub fn summary(&self) -> InventorySummary {
        InventorySummary {
            total_stock: self.items.iter().map(|i| u64::from(i.stock)).sum(),
            critical_items: self.count(StockStatus::Critical),
            low_items: self.count(StockStatus::Low),
            last_update: self.last_tick,
        }
    }

    fn count(&self, status: StockStatus) -> usize {
        self.items.iter().filter(|i| i.status == status).count()
    }
}
