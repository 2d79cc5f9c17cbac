//! Daily Summary - prints dashboard data as JSON
//!
//! ## Usage
//!
//! ```bash
//! cargo run --release --bin daily_summary            # {"data": [DailySummary, ...]}
//! cargo run --release --bin daily_summary -- --pivot # {"charts": [ChartSet, ...]}
//! ```
//!
//! ## Environment Variables
//!
//! - SALESFLOW_DB_PATH - SQLite database path (default: data/sales.db)
//! - SUMMARY_CUTOFF_DATE - Earliest order date included (default: 2026-02-12)
//! - RUST_LOG - Logging level (optional, default: info)

use chrono::NaiveDate;
use clap::Parser;
use salesflow::{build_charts, AppConfig, SummaryStore};
use serde_json::json;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "daily_summary", about = "Print daily sales summaries as JSON")]
struct Args {
    /// Reshape into per-item-type charts with cumulative totals
    #[arg(long)]
    pivot: bool,

    /// Earliest order date, YYYY-MM-DD (overrides SUMMARY_CUTOFF_DATE)
    #[arg(long)]
    cutoff: Option<NaiveDate>,

    /// Database path (overrides SALESFLOW_DB_PATH)
    #[arg(long)]
    db: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();

    let args = Args::parse();
    let config = AppConfig::from_env();

    let db_path = args.db.unwrap_or(config.db_path);
    let cutoff = args.cutoff.unwrap_or(config.cutoff_date);

    log::info!("📊 Daily summary since {} from {}", cutoff, db_path.display());

    let store = SummaryStore::open(&db_path)?;
    let summaries = store.query_daily_summary(cutoff)?;

    let output = if args.pivot {
        json!({ "charts": build_charts(&summaries) })
    } else {
        json!({ "data": summaries })
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
