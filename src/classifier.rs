//! Item-name classification
//!
//! The POS export only carries a free-text item name. Product category and
//! workshop session are recovered from it by pattern matching.

use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

/// Coarse product category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ItemType {
    HandWheel,
    ElectricWheel,
    PotteryWorkshop,
    DemoDialogueWorkshop,
    Other,
}

impl ItemType {
    pub const ALL: [ItemType; 5] = [
        ItemType::HandWheel,
        ItemType::ElectricWheel,
        ItemType::PotteryWorkshop,
        ItemType::DemoDialogueWorkshop,
        ItemType::Other,
    ];

    /// Label persisted in `orders.item_type`
    pub fn label(&self) -> &'static str {
        match self {
            ItemType::HandWheel => "手回しロクロ",
            ItemType::ElectricWheel => "電動ロクロ",
            ItemType::PotteryWorkshop => "陶芸WS",
            ItemType::DemoDialogueWorkshop => "実演＆対話WS",
            ItemType::Other => "その他",
        }
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Ordered (matchers, label) table. Evaluated top to bottom and the first
/// rule with any matching substring wins, so order is precedence.
const ITEM_TYPE_RULES: &[(&[&str], ItemType)] = &[
    (&["手回しロクロ"], ItemType::HandWheel),
    (&["電動ロクロ"], ItemType::ElectricWheel),
    (&["陶芸体験ワークショップ"], ItemType::PotteryWorkshop),
    (
        &["実演＆対話ワークショップ", "実演&対話ワークショップ"],
        ItemType::DemoDialogueWorkshop,
    ),
];

/// Classify an item name into its product category
pub fn classify_item_type(name: &str) -> ItemType {
    ITEM_TYPE_RULES
        .iter()
        .find(|(needles, _)| needles.iter().any(|needle| name.contains(needle)))
        .map(|(_, item_type)| *item_type)
        .unwrap_or(ItemType::Other)
}

/// Workshop session derived from a `第N部` marker
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TimeSlot {
    /// Digits as written in the item name (leading zeros kept)
    Session(String),
    Unknown,
}

impl TimeSlot {
    pub const UNKNOWN_LABEL: &'static str = "不明";

    /// Label persisted in `orders.time_slot`
    pub fn label(&self) -> String {
        match self {
            TimeSlot::Session(n) => format!("第{}部", n),
            TimeSlot::Unknown => Self::UNKNOWN_LABEL.to_string(),
        }
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

static SESSION_MARKER: Lazy<Regex> = Lazy::new(|| {
    // ASCII digits only; the export never uses full-width numerals here
    Regex::new(r"第([0-9]+)部").expect("session marker pattern is valid")
});

/// Extract the first session marker from an item name
pub fn classify_time_slot(name: &str) -> TimeSlot {
    SESSION_MARKER
        .captures(name)
        .and_then(|caps| caps.get(1))
        .map(|n| TimeSlot::Session(n.as_str().to_string()))
        .unwrap_or(TimeSlot::Unknown)
}
