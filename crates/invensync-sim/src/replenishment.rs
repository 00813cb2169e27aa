//! Replenishment desk: reorder rules, supplier assignment and purchase orders.

use chrono::NaiveDate;
use invensync_core::{OrderStatus, ReplenishmentItem};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::info;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PurchaseOrderLine {
    pub item_id: String,
    pub product: String,
    pub supplier: String,
    pub quantity: u32,
    pub unit_cost: Decimal,
    pub line_cost: Decimal,
}

/// A purchase order built from the selected replenishment items.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PurchaseOrder {
    pub issued_on: NaiveDate,
    pub lines: Vec<PurchaseOrderLine>,
    pub total_cost: Decimal,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ReplenishmentSummary {
    pub auto_replenish: usize,
    pub pending: usize,
    pub ordered: usize,
}

#[derive(Clone, Debug)]
pub struct ReplenishmentDesk {
    items: Vec<ReplenishmentItem>,
}

impl ReplenishmentDesk {
    pub fn new(items: Vec<ReplenishmentItem>) -> Self {
        Self { items }
    }

    pub fn items(&self) -> &[ReplenishmentItem] {
        &self.items
    }

    pub fn get(&self, id: &str) -> Option<&ReplenishmentItem> {
        self.items.iter().find(|i| i.id == id)
    }

    /// Flip the auto-replenish flag. Returns the new value.
    pub fn toggle_auto_replenish(&mut self, id: &str) -> Option<bool> {
        let item = self.items.iter_mut().find(|i| i.id == id)?;
        item.auto_replenish = !item.auto_replenish;
        Some(item.auto_replenish)
    }

    /// Assign a supplier. Blank names and unknown ids leave state untouched.
    pub fn set_supplier(&mut self, id: &str, supplier: &str) -> bool {
        let supplier = supplier.trim();
        if supplier.is_empty() {
            return false;
        }
        match self.items.iter_mut().find(|i| i.id == id) {
            Some(item) => {
                item.supplier = supplier.to_string();
                true
            }
            None => false,
        }
    }

    /// Reorder cost of a prospective selection; unknown ids count as zero.
    pub fn selection_cost(&self, ids: &[String]) -> Decimal {
        self.items
            .iter()
            .filter(|i| ids.contains(&i.id))
            .map(ReplenishmentItem::order_cost)
            .sum()
    }

    /// Order every known item in `ids` and mark it `ordered`.
    ///
    /// Returns `None` when none of the ids is known.
    pub fn generate_purchase_order(
        &mut self,
        ids: &[String],
        today: NaiveDate,
    ) -> Option<PurchaseOrder> {
        let mut lines = Vec::new();
        for item in self.items.iter_mut().filter(|i| ids.contains(&i.id)) {
            lines.push(PurchaseOrderLine {
                item_id: item.id.clone(),
                product: item.product.clone(),
                supplier: item.supplier.clone(),
                quantity: item.reorder_quantity,
                unit_cost: item.unit_cost,
                line_cost: item.order_cost(),
            });
            item.status = OrderStatus::Ordered;
            item.last_ordered = today;
        }
        if lines.is_empty() {
            return None;
        }
        let total_cost = lines.iter().map(|l| l.line_cost).sum();
        let order = PurchaseOrder {
            issued_on: today,
            lines,
            total_cost,
        };
        info!(items = order.lines.len(), total = %order.total_cost, "purchase order generated");
        Some(order)
    }

    pub fn summary(&self) -> ReplenishmentSummary {
        let mut s = ReplenishmentSummary::default();
        for item in &self.items {
            if item.auto_replenish {
                s.auto_replenish += 1;
            }
            match item.status {
                OrderStatus::Pending => s.pending += 1,
                OrderStatus::Ordered => s.ordered += 1,
                OrderStatus::Delivered => {}
            }
        }
        s
    }
}
