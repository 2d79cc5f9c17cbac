//! Connection PRAGMAs shared by every store handle

use rusqlite::Connection;

/// WAL auto-checkpoint threshold in pages
pub const WAL_AUTOCHECKPOINT_PAGES: i64 = 1000;

/// Apply PRAGMAs for a small single-writer database
///
/// - `journal_mode = WAL` so a dashboard can read while an import writes
/// - `synchronous = NORMAL` (safe under WAL)
/// - `wal_autocheckpoint = 1000` pages
///
/// Returns the journal mode SQLite actually selected (`memory` for
/// in-memory databases).
pub fn apply_pragmas(conn: &Connection) -> rusqlite::Result<String> {
    let journal_mode: String =
        conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))?;
    conn.pragma_update(None, "synchronous", "NORMAL")?;
    let _: i64 = conn.pragma_update_and_check(
        None,
        "wal_autocheckpoint",
        WAL_AUTOCHECKPOINT_PAGES,
        |row| row.get(0),
    )?;

    log::debug!("📊 SQLite journal_mode={}", journal_mode);
    Ok(journal_mode)
}
