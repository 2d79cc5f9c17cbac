//! Order and summary records

use crate::classifier::{ItemType, TimeSlot};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Date format stored in `orders.order_date`
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// One completed order line, normalized for storage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub order_number: String,
    pub order_date: NaiveDate,
    pub item_name: String,
    pub item_type: ItemType,
    pub time_slot: TimeSlot,
    pub quantity: u32,
    /// Yen, no fractional part
    pub subtotal: i64,
}

impl Order {
    pub fn order_date_string(&self) -> String {
        self.order_date.format(DATE_FORMAT).to_string()
    }
}

/// Per-day totals for one (item type, time slot) pair
///
/// Field names match the JSON the dashboard consumes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailySummary {
    pub order_date: String,
    pub item_type: String,
    pub time_slot: String,
    pub total_quantity: i64,
    pub total_amount: i64,
}
