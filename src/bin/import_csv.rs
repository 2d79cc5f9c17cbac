//! CSV Importer - loads a POS order export into the sales database
//!
//! ## Usage
//!
//! ```bash
//! cargo run --release --bin import_csv -- path/to/orders.csv
//! ```
//!
//! ## Environment Variables
//!
//! - SALESFLOW_DB_PATH - SQLite database path (default: data/sales.db)
//! - RUST_LOG - Logging level (optional, default: info)
//!
//! Re-running on the same file is safe: orders already stored are skipped.

use clap::Parser;
use salesflow::{
    decode_rows, ingest, AppConfig, ImportError, IngestStats, LogReportSink, SummaryStore,
    UsageError,
};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(name = "import_csv", about = "Import a POS order export (CP932 CSV)")]
struct Args {
    /// Order export to import
    csv_path: Option<PathBuf>,

    /// Database path (overrides SALESFLOW_DB_PATH)
    #[arg(long)]
    db: Option<PathBuf>,
}

fn resolve_input(path: Option<&Path>) -> Result<PathBuf, UsageError> {
    let path = path.ok_or(UsageError::MissingPath)?;
    let resolved = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .map(|cwd| cwd.join(path))
            .unwrap_or_else(|_| path.to_path_buf())
    };

    if !resolved.is_file() {
        return Err(UsageError::FileNotFound(resolved));
    }
    Ok(resolved)
}

fn run(args: &Args, config: &AppConfig) -> Result<(PathBuf, IngestStats), ImportError> {
    let csv_path = resolve_input(args.csv_path.as_deref())?;
    let db_path = args.db.clone().unwrap_or_else(|| config.db_path.clone());

    log::info!("🚀 Importing {}", csv_path.display());
    log::info!("   └─ Database: {}", db_path.display());

    let raw = std::fs::read(&csv_path)?;
    let rows = decode_rows(&raw)?;
    // First row is the export header
    let data_rows = rows.get(1..).unwrap_or_default();

    let mut store = SummaryStore::open(&db_path)?;
    let stats = ingest(data_rows, &mut store, &mut LogReportSink)?;

    Ok((csv_path, stats))
}

fn main() -> ExitCode {
    dotenv::dotenv().ok();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();

    let args = Args::parse();
    let config = AppConfig::from_env();

    match run(&args, &config) {
        Ok((csv_path, stats)) => {
            let name = csv_path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| csv_path.display().to_string());
            println!("CSV: {}", name);
            println!("  Total rows: {}", stats.processed);
            println!("  Imported: {}", stats.accepted);
            println!(
                "  Skipped (duplicate/refund etc.): {} [status: {}, duplicate: {}, malformed: {}]",
                stats.rejected, stats.status_filtered, stats.duplicates, stats.malformed
            );
            ExitCode::SUCCESS
        }
        Err(ImportError::Usage(e)) => {
            eprintln!("{}", e);
            eprintln!("Usage: import_csv <path/to/file.csv>");
            ExitCode::FAILURE
        }
        Err(e) => {
            log::error!("❌ Import failed: {}", e);
            eprintln!("Import failed: {}", e);
            ExitCode::FAILURE
        }
    }
}
