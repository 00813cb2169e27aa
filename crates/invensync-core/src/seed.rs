//! Fixed collections loaded at process start.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;

use crate::classify::Thresholds;
use crate::model::*;

/// Supplier catalogue offered by the replenishment desk.
pub const SUPPLIERS: [&str; 5] = [
    "TechSupply Co.",
    "Cable Direct",
    "Accessory World",
    "Global Electronics",
    "Warehouse Direct",
];

fn ago(epoch: NaiveDateTime, secs: i64) -> NaiveDateTime {
    epoch - Duration::seconds(secs)
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

/// Dashboard inventory. Statuses are derived with `thresholds`.
pub fn inventory(epoch: NaiveDateTime, thresholds: &Thresholds) -> Vec<InventoryItem> {
    [
        ("1", "Wireless Headphones", 145, "Zone A", 2),
        ("2", "Smartphone Cases", 23, "Zone B", 1),
        ("3", "USB Cables", 8, "Zone C", 3),
        ("4", "Bluetooth Speakers", 67, "Zone A", 5),
        ("5", "Power Banks", 34, "Zone B", 2),
        ("6", "Screen Protectors", 12, "Zone C", 1),
    ]
    .into_iter()
    .map(|(id, name, stock, location, age)| InventoryItem {
        id: id.to_string(),
        name: name.to_string(),
        stock,
        location: location.to_string(),
        status: thresholds.classify(stock),
        last_updated: ago(epoch, age),
    })
    .collect()
}

/// Rack sensors across zones A, B and C.
pub fn sensors(epoch: NaiveDateTime) -> Vec<Sensor> {
    use SensorStatus::*;
    [
        ("S001", "Zone A", (15.0, 20.0), "Wireless Headphones", 145, Online, 85, 22.0, 2, "A1-01"),
        ("S002", "Zone A", (35.0, 20.0), "Bluetooth Speakers", 67, Online, 92, 21.0, 1, "A1-02"),
        ("S003", "Zone A", (55.0, 20.0), "Gaming Headsets", 89, Warning, 78, 24.0, 5, "A1-03"),
        ("S004", "Zone B", (15.0, 45.0), "Smartphone Cases", 23, Warning, 67, 23.0, 3, "B1-01"),
        ("S005", "Zone B", (35.0, 45.0), "Power Banks", 34, Online, 45, 25.0, 7, "B1-02"),
        ("S006", "Zone B", (55.0, 45.0), "Charging Cables", 156, Online, 88, 22.0, 4, "B1-03"),
        ("S007", "Zone C", (15.0, 80.0), "USB Cables", 8, Warning, 15, 20.0, 120, "C1-01"),
        ("S008", "Zone C", (35.0, 80.0), "Screen Protectors", 12, Offline, 5, 19.0, 300, "C1-02"),
        ("S009", "Zone C", (55.0, 80.0), "Tablet Stands", 78, Online, 92, 23.0, 1, "C1-03"),
    ]
    .into_iter()
    .map(
        |(id, zone, (x, y), product, stock, status, battery, temperature, age, rack)| Sensor {
            id: id.to_string(),
            zone: zone.to_string(),
            position: Position::new(x, y),
            product: product.to_string(),
            stock,
            status,
            battery,
            temperature,
            last_update: ago(epoch, age),
            rack_id: rack.to_string(),
        },
    )
    .collect()
}

/// Initial alert list, most recent first.
pub fn alerts(epoch: NaiveDateTime) -> Vec<Alert> {
    vec![
        Alert {
            id: "1".to_string(),
            product: "USB Cables".to_string(),
            message: "Stock level has dropped below critical threshold (8 units remaining)"
                .to_string(),
            timestamp: ago(epoch, 2 * 60),
            priority: AlertPriority::Critical,
            acknowledged: false,
        },
        Alert {
            id: "2".to_string(),
            product: "Smartphone Cases".to_string(),
            message: "Low stock warning - 23 units remaining".to_string(),
            timestamp: ago(epoch, 5 * 60),
            priority: AlertPriority::Warning,
            acknowledged: false,
        },
        Alert {
            id: "3".to_string(),
            product: "Screen Protectors".to_string(),
            message: "Inventory level approaching minimum threshold".to_string(),
            timestamp: ago(epoch, 12 * 60),
            priority: AlertPriority::Warning,
            acknowledged: true,
        },
    ]
}

pub fn forecasts() -> Vec<ForecastRecord> {
    [
        ("Wireless Headphones", 145, 89, 12, Trend::Decreasing),
        ("USB Cables", 8, 0, 3, Trend::Decreasing),
        ("Smartphone Cases", 23, 45, 18, Trend::Increasing),
        ("Bluetooth Speakers", 67, 65, 15, Trend::Stable),
    ]
    .into_iter()
    .map(
        |(product, current_stock, predicted_stock, days_remaining, trend)| ForecastRecord {
            product: product.to_string(),
            current_stock,
            predicted_stock,
            days_remaining,
            trend,
        },
    )
    .collect()
}

pub fn replenishment() -> Vec<ReplenishmentItem> {
    vec![
        ReplenishmentItem {
            id: "1".to_string(),
            product: "Wireless Headphones".to_string(),
            current_stock: 145,
            reorder_point: 50,
            reorder_quantity: 200,
            supplier: SUPPLIERS[0].to_string(),
            unit_cost: Decimal::new(4599, 2),
            auto_replenish: true,
            last_ordered: date(2024, 1, 15),
            status: OrderStatus::Delivered,
        },
        ReplenishmentItem {
            id: "2".to_string(),
            product: "USB Cables".to_string(),
            current_stock: 8,
            reorder_point: 25,
            reorder_quantity: 500,
            supplier: SUPPLIERS[1].to_string(),
            unit_cost: Decimal::new(399, 2),
            auto_replenish: false,
            last_ordered: date(2024, 1, 10),
            status: OrderStatus::Pending,
        },
        ReplenishmentItem {
            id: "3".to_string(),
            product: "Smartphone Cases".to_string(),
            current_stock: 23,
            reorder_point: 30,
            reorder_quantity: 300,
            supplier: SUPPLIERS[2].to_string(),
            unit_cost: Decimal::new(1299, 2),
            auto_replenish: true,
            last_ordered: date(2024, 1, 12),
            status: OrderStatus::Ordered,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::classify;
    use crate::config::SimConfig;

    #[test]
    fn seeded_inventory_is_classified() {
        let cfg = SimConfig::default();
        let items = inventory(cfg.epoch, &cfg.thresholds);
        assert_eq!(items.len(), 6);
        for item in &items {
            assert_eq!(item.status, classify(item.stock));
        }
        assert_eq!(items[2].status, StockStatus::Critical);
        assert_eq!(items[1].status, StockStatus::Low);
    }

    #[test]
    fn sensors_keep_their_declared_status() {
        let s = sensors(SimConfig::default().epoch);
        assert_eq!(s.len(), 9);
        let s008 = s.iter().find(|s| s.id == "S008").unwrap();
        assert_eq!(s008.status, SensorStatus::Offline);
        assert_eq!(s008.battery, 5);
        // Low charge does not imply a degraded status.
        let s005 = s.iter().find(|s| s.id == "S005").unwrap();
        assert_eq!(s005.status, SensorStatus::Online);
        assert_eq!(s005.battery, 45);
    }

    #[test]
    fn alerts_are_most_recent_first() {
        let a = alerts(SimConfig::default().epoch);
        assert!(a.windows(2).all(|w| w[0].timestamp >= w[1].timestamp));
        assert_eq!(a.iter().filter(|a| !a.acknowledged).count(), 2);
    }

    #[test]
    fn replenishment_costs_are_exact() {
        let items = replenishment();
        assert_eq!(items[1].order_cost(), Decimal::new(199_500, 2));
        assert!(items.iter().all(|i| SUPPLIERS.contains(&i.supplier.as_str())));
    }
}
