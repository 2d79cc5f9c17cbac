//! CSV row ingestion
//!
//! Maps decoded export rows onto [`Order`]s and writes them in one
//! transaction. Rows are either accepted (newly stored) or rejected for one
//! of three reasons:
//!
//! - status is not `完了` (cancelled, refunded, pending...)
//! - order number already stored (re-import)
//! - fields cannot be parsed (malformed)
//!
//! A store fault aborts the whole batch; nothing from it is committed.

use crate::classifier::{classify_item_type, classify_time_slot};
use crate::error::{RowError, StoreError};
use crate::order::{Order, DATE_FORMAT};
use crate::store::{InsertOutcome, SummaryStore};
use chrono::NaiveDate;

/// Status value of a settled order
pub const COMPLETED_STATUS: &str = "完了";

/// Rows between progress reports
pub const PROGRESS_EVERY: usize = 500;

/// Column positions in the register's order export
///
/// The export has no stable header names, so columns are positional. A
/// layout change shows up as [`RowError::TooFewColumns`] or parse failures.
pub struct ExportColumns;

impl ExportColumns {
    pub const ORDER_NUMBER: usize = 0;
    pub const STATUS: usize = 1;
    pub const ORDER_DATETIME: usize = 3;
    pub const ITEM_NAME: usize = 8;
    pub const QUANTITY: usize = 12;
    pub const SUBTOTAL: usize = 13;
    pub const MIN_COLUMNS: usize = 14;
}

/// Borrowed view of the columns ingestion reads
#[derive(Debug, Clone, Copy)]
pub struct ExportRow<'a> {
    pub order_number: &'a str,
    pub status: &'a str,
    pub order_datetime: &'a str,
    pub item_name: &'a str,
    pub quantity: &'a str,
    pub subtotal: &'a str,
}

impl<'a> ExportRow<'a> {
    pub fn from_fields(fields: &'a [String]) -> Result<Self, RowError> {
        if fields.len() < ExportColumns::MIN_COLUMNS {
            return Err(RowError::TooFewColumns {
                found: fields.len(),
                expected: ExportColumns::MIN_COLUMNS,
            });
        }

        Ok(Self {
            order_number: &fields[ExportColumns::ORDER_NUMBER],
            status: &fields[ExportColumns::STATUS],
            order_datetime: &fields[ExportColumns::ORDER_DATETIME],
            item_name: &fields[ExportColumns::ITEM_NAME],
            quantity: &fields[ExportColumns::QUANTITY],
            subtotal: &fields[ExportColumns::SUBTOTAL],
        })
    }

    pub fn is_completed(&self) -> bool {
        self.status == COMPLETED_STATUS
    }

    /// Build the stored order, classifying the item name
    pub fn to_order(&self) -> Result<Order, RowError> {
        if self.order_number.trim().is_empty() {
            return Err(RowError::EmptyField("order number"));
        }
        if self.item_name.trim().is_empty() {
            return Err(RowError::EmptyField("item name"));
        }

        let order_date = parse_order_date(self.order_datetime)?;
        let quantity = self
            .quantity
            .trim()
            .parse::<u32>()
            .map_err(|_| RowError::InvalidQuantity(self.quantity.to_string()))?;
        let subtotal = self
            .subtotal
            .trim()
            .parse::<i64>()
            .map_err(|_| RowError::InvalidSubtotal(self.subtotal.to_string()))?;

        Ok(Order {
            order_number: self.order_number.to_string(),
            order_date,
            item_name: self.item_name.to_string(),
            item_type: classify_item_type(self.item_name),
            time_slot: classify_time_slot(self.item_name),
            quantity,
            subtotal,
        })
    }
}

/// Date part of `YYYY-MM-DD hh:mm:ss` (everything before the first space)
pub fn truncate_to_date(datetime: &str) -> &str {
    datetime.split(' ').next().unwrap_or(datetime)
}

fn parse_order_date(datetime: &str) -> Result<NaiveDate, RowError> {
    let date_part = truncate_to_date(datetime);
    NaiveDate::parse_from_str(date_part, DATE_FORMAT)
        .map_err(|_| RowError::InvalidDate(datetime.to_string()))
}

/// Per-row classification
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowOutcome {
    Accepted,
    StatusFiltered,
    Duplicate,
    Malformed(RowError),
}

/// Counters for one ingestion batch
///
/// `accepted + rejected == processed` always holds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestStats {
    pub processed: usize,
    pub accepted: usize,
    pub rejected: usize,
    pub status_filtered: usize,
    pub duplicates: usize,
    pub malformed: usize,
}

impl IngestStats {
    pub fn record(&mut self, outcome: &RowOutcome) {
        self.processed += 1;
        match outcome {
            RowOutcome::Accepted => {
                self.accepted += 1;
                return;
            }
            RowOutcome::StatusFiltered => self.status_filtered += 1,
            RowOutcome::Duplicate => self.duplicates += 1,
            RowOutcome::Malformed(_) => self.malformed += 1,
        }
        self.rejected += 1;
    }
}

/// Operator-facing progress output
pub trait ReportSink {
    fn report(&mut self, processed: usize, accepted: usize, rejected: usize);
}

/// Progress through the `log` facade
#[derive(Debug, Default)]
pub struct LogReportSink;

impl ReportSink for LogReportSink {
    fn report(&mut self, processed: usize, accepted: usize, rejected: usize) {
        log::info!(
            "📊 Progress: {} rows | accepted: {} | rejected: {}",
            processed,
            accepted,
            rejected
        );
    }
}

/// Ingest data rows (header already removed) into the store
///
/// All inserts share one transaction. Returns the batch counters, or the
/// store error that rolled the batch back.
pub fn ingest(
    rows: &[Vec<String>],
    store: &mut SummaryStore,
    sink: &mut dyn ReportSink,
) -> Result<IngestStats, StoreError> {
    let mut stats = IngestStats::default();
    let mut batch = store.begin_batch()?;

    log::info!("🔧 Ingesting {} data rows", rows.len());

    for (index, fields) in rows.iter().enumerate() {
        // +2: 1-based line numbers, header on line 1
        let line = index + 2;

        let outcome = match ExportRow::from_fields(fields) {
            Err(e) => RowOutcome::Malformed(e),
            Ok(row) if !row.is_completed() => {
                log::debug!("   ├─ line {}: status '{}' skipped", line, row.status);
                RowOutcome::StatusFiltered
            }
            Ok(row) => match row.to_order() {
                Err(e) => RowOutcome::Malformed(e),
                Ok(order) => match batch.insert_ignore(&order)? {
                    InsertOutcome::Inserted => RowOutcome::Accepted,
                    InsertOutcome::Duplicate => {
                        log::debug!(
                            "   ├─ line {}: order {} already stored",
                            line,
                            order.order_number
                        );
                        RowOutcome::Duplicate
                    }
                },
            },
        };

        if let RowOutcome::Malformed(e) = &outcome {
            log::warn!("⚠️  line {}: rejected malformed row: {}", line, e);
        }

        stats.record(&outcome);

        if stats.processed % PROGRESS_EVERY == 0 {
            sink.report(stats.processed, stats.accepted, stats.rejected);
        }
    }

    batch.commit()?;
    // Final totals, unless the last periodic report already carried them
    if stats.processed == 0 || stats.processed % PROGRESS_EVERY != 0 {
        sink.report(stats.processed, stats.accepted, stats.rejected);
    }

    log::info!(
        "✅ Batch committed: {} accepted, {} rejected ({} status, {} duplicate, {} malformed)",
        stats.accepted,
        stats.rejected,
        stats.status_filtered,
        stats.duplicates,
        stats.malformed
    );

    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::{ItemType, TimeSlot};
    use tempfile::tempdir;

    fn export_row(
        number: &str,
        status: &str,
        datetime: &str,
        item: &str,
        qty: &str,
        subtotal: &str,
    ) -> Vec<String> {
        let mut fields = vec![String::new(); ExportColumns::MIN_COLUMNS];
        fields[ExportColumns::ORDER_NUMBER] = number.to_string();
        fields[ExportColumns::STATUS] = status.to_string();
        fields[ExportColumns::ORDER_DATETIME] = datetime.to_string();
        fields[ExportColumns::ITEM_NAME] = item.to_string();
        fields[ExportColumns::QUANTITY] = qty.to_string();
        fields[ExportColumns::SUBTOTAL] = subtotal.to_string();
        fields
    }

    #[derive(Default)]
    struct RecordingSink {
        reports: Vec<(usize, usize, usize)>,
    }

    impl ReportSink for RecordingSink {
        fn report(&mut self, processed: usize, accepted: usize, rejected: usize) {
            self.reports.push((processed, accepted, rejected));
        }
    }

    #[test]
    fn test_truncate_to_date() {
        assert_eq!(truncate_to_date("2026-02-12 14:30:00"), "2026-02-12");
        assert_eq!(truncate_to_date("2026-02-12"), "2026-02-12");
        assert_eq!(truncate_to_date(""), "");
    }

    #[test]
    fn test_row_to_order() {
        let fields = export_row(
            "ORD-1",
            "完了",
            "2026-02-12 14:30:00",
            "手回しロクロ体験 第2部",
            "2",
            "8800",
        );
        let order = ExportRow::from_fields(&fields).unwrap().to_order().unwrap();

        assert_eq!(order.order_number, "ORD-1");
        assert_eq!(order.order_date_string(), "2026-02-12");
        assert_eq!(order.item_type, ItemType::HandWheel);
        assert_eq!(order.time_slot, TimeSlot::Session("2".to_string()));
        assert_eq!(order.quantity, 2);
        assert_eq!(order.subtotal, 8800);
    }

    #[test]
    fn test_malformed_fields() {
        let cases = [
            (
                export_row("A", "完了", "2026-02-12 10:00", "x", "abc", "100"),
                RowError::InvalidQuantity("abc".to_string()),
            ),
            (
                export_row("A", "完了", "2026-02-12 10:00", "x", "-1", "100"),
                RowError::InvalidQuantity("-1".to_string()),
            ),
            (
                export_row("A", "完了", "2026-02-12 10:00", "x", "1", "1,000"),
                RowError::InvalidSubtotal("1,000".to_string()),
            ),
            (
                export_row("A", "完了", "2026-02-30 10:00", "x", "1", "100"),
                RowError::InvalidDate("2026-02-30 10:00".to_string()),
            ),
            (
                export_row("", "完了", "2026-02-12 10:00", "x", "1", "100"),
                RowError::EmptyField("order number"),
            ),
        ];

        for (fields, expected) in cases {
            let row = ExportRow::from_fields(&fields).unwrap();
            assert_eq!(row.to_order().unwrap_err(), expected);
        }
    }

    #[test]
    fn test_short_row_is_malformed() {
        let fields: Vec<String> = vec!["A".into(), "完了".into()];
        assert_eq!(
            ExportRow::from_fields(&fields).unwrap_err(),
            RowError::TooFewColumns { found: 2, expected: 14 }
        );
    }

    #[test]
    fn test_ingest_classifies_rows() {
        let mut store = SummaryStore::open_in_memory().unwrap();
        let rows = vec![
            export_row("A-1", "完了", "2026-02-12 10:00:00", "手回しロクロ 第1部", "1", "4400"),
            export_row(
                "A-2",
                "キャンセル",
                "2026-02-12 10:05:00",
                "手回しロクロ 第1部",
                "1",
                "4400",
            ),
            export_row("A-3", "完了", "2026-02-12 11:00:00", "電動ロクロ 第2部", "two", "6600"),
            export_row("A-1", "完了", "2026-02-12 10:00:00", "手回しロクロ 第1部", "1", "4400"),
            vec!["A-5".to_string(), "完了".to_string()],
            export_row(
                "A-6",
                "完了 ",
                "2026-02-13 09:00:00",
                "陶芸体験ワークショップ",
                "1",
                "3000",
            ),
        ];
        let mut sink = RecordingSink::default();

        let stats = ingest(&rows, &mut store, &mut sink).unwrap();

        assert_eq!(stats.processed, 6);
        assert_eq!(stats.accepted, 1);
        assert_eq!(stats.rejected, 5);
        assert_eq!(stats.status_filtered, 2);
        assert_eq!(stats.duplicates, 1);
        assert_eq!(stats.malformed, 2);
        assert_eq!(stats.accepted + stats.rejected, stats.processed);
        assert_eq!(store.order_count().unwrap(), 1);
        assert_eq!(sink.reports.last(), Some(&(6, 1, 5)));
    }

    #[test]
    fn test_progress_reported_periodically() {
        let mut store = SummaryStore::open_in_memory().unwrap();
        let rows: Vec<Vec<String>> = (0..PROGRESS_EVERY + 1)
            .map(|i| {
                export_row(
                    &format!("P-{}", i),
                    "完了",
                    "2026-02-12 10:00:00",
                    "電動ロクロ 第3部",
                    "1",
                    "100",
                )
            })
            .collect();
        let mut sink = RecordingSink::default();

        let stats = ingest(&rows, &mut store, &mut sink).unwrap();

        assert_eq!(stats.accepted, PROGRESS_EVERY + 1);
        assert_eq!(
            sink.reports,
            vec![
                (PROGRESS_EVERY, PROGRESS_EVERY, 0),
                (PROGRESS_EVERY + 1, PROGRESS_EVERY + 1, 0)
            ]
        );
    }

    #[test]
    fn test_store_fault_rolls_back_whole_batch() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("sales.db");
        drop(SummaryStore::open(&db_path).unwrap());

        // Fail the third insert from inside SQLite
        let conn = rusqlite::Connection::open(&db_path).unwrap();
        conn.execute_batch(
            "CREATE TRIGGER fail_x3 BEFORE INSERT ON orders
             WHEN NEW.order_number = 'X3'
             BEGIN SELECT RAISE(ABORT, 'disk fault'); END;",
        )
        .unwrap();
        drop(conn);

        let mut store = SummaryStore::open(&db_path).unwrap();
        let rows: Vec<Vec<String>> = (1..=4)
            .map(|i| {
                export_row(
                    &format!("X{}", i),
                    "完了",
                    "2026-02-12 10:00:00",
                    "手回しロクロ 第1部",
                    "1",
                    "4400",
                )
            })
            .collect();
        let mut sink = RecordingSink::default();

        let result = ingest(&rows, &mut store, &mut sink);

        assert!(matches!(result, Err(StoreError::Database(_))));
        assert_eq!(store.order_count().unwrap(), 0);
        assert!(sink.reports.is_empty());
    }

    #[test]
    fn test_empty_batch() {
        let mut store = SummaryStore::open_in_memory().unwrap();
        let mut sink = RecordingSink::default();

        let stats = ingest(&[], &mut store, &mut sink).unwrap();

        assert_eq!(stats, IngestStats::default());
        assert_eq!(sink.reports, vec![(0, 0, 0)]);
    }
}
