//! SQLite order store and daily aggregation
//!
//! One `orders` table keyed by the POS order number. Writes go through
//! `INSERT OR IGNORE` so re-importing an export is a no-op for rows already
//! stored.

use crate::error::StoreError;
use crate::order::{DailySummary, Order, DATE_FORMAT};
use crate::sqlite_pragma::apply_pragmas;
use chrono::NaiveDate;
use rusqlite::{params, Connection, Transaction};
use std::path::Path;

const SCHEMA_SQL: &str = "
    CREATE TABLE IF NOT EXISTS orders (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        order_number TEXT NOT NULL UNIQUE,
        order_date TEXT NOT NULL,
        item_name TEXT NOT NULL,
        item_type TEXT NOT NULL,
        time_slot TEXT NOT NULL,
        quantity INTEGER NOT NULL,
        subtotal INTEGER NOT NULL
    );
    CREATE INDEX IF NOT EXISTS idx_orders_date ON orders(order_date);
    CREATE INDEX IF NOT EXISTS idx_orders_type ON orders(item_type);
";

const INSERT_SQL: &str = "
    INSERT OR IGNORE INTO orders
        (order_number, order_date, item_name, item_type, time_slot, quantity, subtotal)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
";

const DAILY_SUMMARY_SQL: &str = "
    SELECT
        order_date,
        item_type,
        time_slot,
        SUM(quantity) AS total_quantity,
        SUM(subtotal) AS total_amount
    FROM orders
    WHERE order_date >= ?1
    GROUP BY order_date, item_type, time_slot
    ORDER BY order_date, item_type, time_slot
";

/// Result of an insert-or-ignore
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted,
    /// `order_number` already stored; nothing written
    Duplicate,
}

fn insert_order(conn: &Connection, order: &Order) -> rusqlite::Result<InsertOutcome> {
    let mut stmt = conn.prepare_cached(INSERT_SQL)?;
    let changed = stmt.execute(params![
        order.order_number,
        order.order_date_string(),
        order.item_name,
        order.item_type.label(),
        order.time_slot.label(),
        order.quantity,
        order.subtotal,
    ])?;

    Ok(if changed == 0 {
        InsertOutcome::Duplicate
    } else {
        InsertOutcome::Inserted
    })
}

/// Owned handle to the order database
pub struct SummaryStore {
    conn: Connection,
}

impl SummaryStore {
    /// Open (or create) the database file and make sure the schema exists
    pub fn open(db_path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let db_path = db_path.as_ref();
        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|source| StoreError::CreateDir {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        let store = Self::from_connection(Connection::open(db_path)?)?;
        log::info!("✅ Order store opened at {}", db_path.display());
        Ok(store)
    }

    /// Private in-memory database, mainly for tests
    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self, StoreError> {
        apply_pragmas(&conn)?;
        let store = Self { conn };
        store.ensure_schema()?;
        Ok(store)
    }

    /// Create the orders table and its indexes if absent
    pub fn ensure_schema(&self) -> Result<(), StoreError> {
        self.conn.execute_batch(SCHEMA_SQL)?;
        Ok(())
    }

    /// Insert one order outside any batch (autocommit)
    pub fn insert_ignore(&self, order: &Order) -> Result<InsertOutcome, StoreError> {
        Ok(insert_order(&self.conn, order)?)
    }

    /// Start an all-or-nothing write batch
    pub fn begin_batch(&mut self) -> Result<OrderBatch<'_>, StoreError> {
        let tx = self.conn.transaction()?;
        Ok(OrderBatch { tx, inserted: 0 })
    }

    /// Daily totals per (date, item type, time slot) on or after `cutoff`
    pub fn query_daily_summary(&self, cutoff: NaiveDate) -> Result<Vec<DailySummary>, StoreError> {
        let mut stmt = self.conn.prepare_cached(DAILY_SUMMARY_SQL)?;
        let rows = stmt.query_map([cutoff.format(DATE_FORMAT).to_string()], |row| {
            Ok(DailySummary {
                order_date: row.get(0)?,
                item_type: row.get(1)?,
                time_slot: row.get(2)?,
                total_quantity: row.get(3)?,
                total_amount: row.get(4)?,
            })
        })?;

        let summaries = rows.collect::<rusqlite::Result<Vec<_>>>()?;
        log::debug!(
            "📊 Daily summary since {}: {} groups",
            cutoff.format(DATE_FORMAT),
            summaries.len()
        );
        Ok(summaries)
    }

    /// Number of stored orders
    pub fn order_count(&self) -> Result<i64, StoreError> {
        Ok(self
            .conn
            .query_row("SELECT COUNT(*) FROM orders", [], |row| row.get(0))?)
    }
}

/// Write batch backed by one SQLite transaction
///
/// Dropping the batch without calling [`OrderBatch::commit`] rolls back
/// every insert made through it.
pub struct OrderBatch<'a> {
    tx: Transaction<'a>,
    inserted: usize,
}

impl OrderBatch<'_> {
    pub fn insert_ignore(&mut self, order: &Order) -> Result<InsertOutcome, StoreError> {
        let outcome = insert_order(&self.tx, order)?;
        if outcome == InsertOutcome::Inserted {
            self.inserted += 1;
        }
        Ok(outcome)
    }

    /// Commit and return how many rows were inserted
    pub fn commit(self) -> Result<usize, StoreError> {
        let inserted = self.inserted;
        self.tx.commit()?;
        log::debug!("✅ Committed {} orders to SQLite", inserted);
        Ok(inserted)
    }
}
