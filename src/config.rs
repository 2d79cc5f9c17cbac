//! Runtime configuration from environment variables

use crate::order::DATE_FORMAT;
use chrono::NaiveDate;
use std::env;
use std::path::PathBuf;

pub const DEFAULT_DB_PATH: &str = "data/sales.db";

/// Earliest date shown on the dashboard unless overridden
pub const DEFAULT_CUTOFF_DATE: &str = "2026-02-12";

/// Configuration shared by the importer and the summary reader
///
/// Loaded from environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Path to SQLite database file
    pub db_path: PathBuf,

    /// Daily summaries include orders on or after this date
    pub cutoff_date: NaiveDate,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// Environment variables:
    /// - `SALESFLOW_DB_PATH` (default: data/sales.db)
    /// - `SUMMARY_CUTOFF_DATE` (default: 2026-02-12, YYYY-MM-DD)
    pub fn from_env() -> Self {
        let db_path = env::var("SALESFLOW_DB_PATH")
            .unwrap_or_else(|_| DEFAULT_DB_PATH.to_string())
            .into();

        let cutoff_date = match env::var("SUMMARY_CUTOFF_DATE") {
            Ok(raw) => NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT).unwrap_or_else(|_| {
                log::warn!(
                    "Invalid SUMMARY_CUTOFF_DATE '{}', defaulting to {}",
                    raw,
                    DEFAULT_CUTOFF_DATE
                );
                default_cutoff()
            }),
            Err(_) => default_cutoff(),
        };

        Self {
            db_path,
            cutoff_date,
        }
    }
}

fn default_cutoff() -> NaiveDate {
    NaiveDate::parse_from_str(DEFAULT_CUTOFF_DATE, DATE_FORMAT).unwrap_or(NaiveDate::MIN)
}
