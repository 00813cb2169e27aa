use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A point on the warehouse floor plan, in percent of width/height.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    pub fn distance_to(&self, other: &Position) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Stock tier derived from a unit count by the threshold classifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StockStatus {
    #[serde(rename = "OK")]
    Ok,
    Low,
    Critical,
}

/// A tracked product line on the inventory dashboard.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InventoryItem {
    pub id: String,
    pub name: String,
    /// Units on hand (never negative).
    pub stock: u32,
    /// Zone label, e.g. "Zone A".
    pub location: String,
    /// Always equal to the classification of `stock`.
    pub status: StockStatus,
    pub last_updated: NaiveDateTime,
}

/// Connectivity state reported by a shelf sensor.
///
/// Set at creation and not re-derived from battery or temperature.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SensorStatus {
    Online,
    Warning,
    Offline,
}

/// An IoT shelf sensor mounted on a rack.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Sensor {
    pub id: String,
    pub zone: String,
    pub position: Position,
    pub product: String,
    pub stock: u32,
    pub status: SensorStatus,
    /// Battery charge in percent.
    pub battery: u8,
    /// Ambient temperature in °C.
    pub temperature: f64,
    pub last_update: NaiveDateTime,
    pub rack_id: String,
}

/// Lifecycle phase of a moving entity. `Arrived` entities are pruned on the
/// tick that detects arrival and never appear in a published collection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MovementPhase {
    Moving,
    Arrived,
}

/// A worker or forklift travelling from the loading dock to a rack.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MovingEntity {
    pub id: String,
    pub position: Position,
    pub target: Position,
    /// Activity label, e.g. "Order Pickup".
    pub label: String,
    pub phase: MovementPhase,
}

impl MovingEntity {
    pub fn distance_to_target(&self) -> f64 {
        self.position.distance_to(&self.target)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AlertPriority {
    Critical,
    Warning,
}

/// A stock alert shown on the alerts page.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub id: String,
    pub product: String,
    pub message: String,
    pub timestamp: NaiveDateTime,
    pub priority: AlertPriority,
    pub acknowledged: bool,
}

/// Read-side priority filter for alert listings.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AlertFilter {
    #[default]
    All,
    Critical,
    Warning,
}

impl AlertFilter {
    pub fn matches(&self, alert: &Alert) -> bool {
        match self {
            AlertFilter::All => true,
            AlertFilter::Critical => alert.priority == AlertPriority::Critical,
            AlertFilter::Warning => alert.priority == AlertPriority::Warning,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Increasing,
    Decreasing,
    Stable,
}

/// How soon a product is projected to run out.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ForecastUrgency {
    /// Three days or fewer.
    Critical,
    /// Seven days or fewer.
    Warning,
    Ok,
}

/// Projected stock for a product. The numbers are random-walked, not
/// computed from history.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ForecastRecord {
    pub product: String,
    pub current_stock: u32,
    pub predicted_stock: u32,
    /// Days until stock-out, never below one.
    pub days_remaining: u32,
    pub trend: Trend,
}

impl ForecastRecord {
    pub fn urgency(&self) -> ForecastUrgency {
        match self.days_remaining {
            0..=3 => ForecastUrgency::Critical,
            4..=7 => ForecastUrgency::Warning,
            _ => ForecastUrgency::Ok,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Ordered,
    Delivered,
}

/// A replenishment rule for one product.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReplenishmentItem {
    pub id: String,
    pub product: String,
    pub current_stock: u32,
    pub reorder_point: u32,
    pub reorder_quantity: u32,
    pub supplier: String,
    /// Unit cost in USD.
    pub unit_cost: Decimal,
    pub auto_replenish: bool,
    pub last_ordered: NaiveDate,
    pub status: OrderStatus,
}

impl ReplenishmentItem {
    /// Cost of one full reorder of this item.
    pub fn order_cost(&self) -> Decimal {
        self.unit_cost * Decimal::from(self.reorder_quantity)
    }
}
