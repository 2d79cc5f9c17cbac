//! Chart reshaping for the dashboard
//!
//! Turns the flat daily summary into one series per time slot for a given
//! item type: daily values (bars) plus running cumulative totals (lines).

use crate::order::DailySummary;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Which summary column a pivot charts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueField {
    Amount,
    Quantity,
}

impl ValueField {
    fn pick(&self, summary: &DailySummary) -> i64 {
        match self {
            ValueField::Amount => summary.total_amount,
            ValueField::Quantity => summary.total_quantity,
        }
    }
}

/// One date on the chart x-axis
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PivotRow {
    pub date: String,
    /// Slot label -> value on this date (0 when the slot had no sales)
    pub daily: BTreeMap<String, i64>,
    /// Slot label -> running total up to and including this date
    pub cumulative: BTreeMap<String, i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlotPivot {
    pub item_type: String,
    pub field: ValueField,
    pub slots: Vec<String>,
    pub rows: Vec<PivotRow>,
}

/// KPI totals for one item type
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeTotals {
    pub item_type: String,
    pub total_amount: i64,
    pub total_quantity: i64,
}

/// Amount and quantity charts for one item type
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChartSet {
    pub totals: TypeTotals,
    pub amount: SlotPivot,
    pub quantity: SlotPivot,
}

/// Distinct item types present, sorted
pub fn item_types(summaries: &[DailySummary]) -> Vec<String> {
    summaries
        .iter()
        .map(|s| s.item_type.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

pub fn pivot_by_slot(summaries: &[DailySummary], item_type: &str, field: ValueField) -> SlotPivot {
    let filtered: Vec<&DailySummary> = summaries
        .iter()
        .filter(|s| s.item_type == item_type)
        .collect();

    let slots: Vec<String> = filtered
        .iter()
        .map(|s| s.time_slot.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let zeroed: BTreeMap<String, i64> = slots.iter().map(|slot| (slot.clone(), 0)).collect();

    let mut by_date: BTreeMap<&str, BTreeMap<String, i64>> = BTreeMap::new();
    for summary in &filtered {
        let daily = by_date
            .entry(summary.order_date.as_str())
            .or_insert_with(|| zeroed.clone());
        *daily.entry(summary.time_slot.clone()).or_insert(0) += field.pick(summary);
    }

    let mut running = zeroed.clone();
    let rows = by_date
        .into_iter()
        .map(|(date, daily)| {
            for (slot, value) in &daily {
                *running.entry(slot.clone()).or_insert(0) += value;
            }
            PivotRow {
                date: date.to_string(),
                daily,
                cumulative: running.clone(),
            }
        })
        .collect();

    SlotPivot {
        item_type: item_type.to_string(),
        field,
        slots,
        rows,
    }
}

pub fn type_totals(summaries: &[DailySummary], item_type: &str) -> TypeTotals {
    summaries
        .iter()
        .filter(|s| s.item_type == item_type)
        .fold(
            TypeTotals {
                item_type: item_type.to_string(),
                total_amount: 0,
                total_quantity: 0,
            },
            |mut totals, s| {
                totals.total_amount += s.total_amount;
                totals.total_quantity += s.total_quantity;
                totals
            },
        )
}

/// Charts for every item type present, in item-type order
pub fn build_charts(summaries: &[DailySummary]) -> Vec<ChartSet> {
    item_types(summaries)
        .iter()
        .map(|item_type| ChartSet {
            totals: type_totals(summaries, item_type),
            amount: pivot_by_slot(summaries, item_type, ValueField::Amount),
            quantity: pivot_by_slot(summaries, item_type, ValueField::Quantity),
        })
        .collect()
}
