//! # salesflow
//!
//! Loads point-of-sale order exports for a pottery workshop into SQLite and
//! serves daily per-session totals for the sales dashboard.
//!
//! ```text
//! CP932 CSV bytes → decoder::decode_rows
//!     ↓
//! ingest::ingest (status filter, classifier, validation)
//!     ↓
//! store::SummaryStore (INSERT OR IGNORE, one transaction)
//!     ↓
//! store::SummaryStore::query_daily_summary → pivot::build_charts
//! ```

pub mod classifier;
pub mod config;
pub mod decoder;
pub mod error;
pub mod ingest;
pub mod order;
pub mod pivot;
pub mod sqlite_pragma;
pub mod store;

pub use classifier::{classify_item_type, classify_time_slot, ItemType, TimeSlot};
pub use config::AppConfig;
pub use decoder::decode_rows;
pub use error::{DecodeError, ImportError, RowError, StoreError, UsageError};
pub use ingest::{ingest, IngestStats, LogReportSink, ReportSink};
pub use order::{DailySummary, Order};
pub use pivot::{build_charts, pivot_by_slot, ChartSet, SlotPivot, ValueField};
pub use store::{InsertOutcome, OrderBatch, SummaryStore};
