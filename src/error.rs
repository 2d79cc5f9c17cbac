//! Error types for decoding, ingestion and the summary store

use std::path::PathBuf;
use thiserror::Error;

/// Bad command-line input. Reported before any work is done.
#[derive(Debug, Error)]
pub enum UsageError {
    #[error("missing CSV path argument")]
    MissingPath,
    #[error("file not found: {}", .0.display())]
    FileNotFound(PathBuf),
}

/// Raw export bytes could not be turned into field rows.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("input is not valid {encoding} (first bad byte near offset {offset})")]
    Encoding {
        encoding: &'static str,
        offset: usize,
    },
    #[error("CSV parse error: {0}")]
    Csv(#[from] csv::Error),
}

/// A single data row that cannot become an order. Counted as a rejection.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RowError {
    #[error("row has {found} columns, expected at least {expected}")]
    TooFewColumns { found: usize, expected: usize },
    #[error("empty {0}")]
    EmptyField(&'static str),
    #[error("invalid quantity '{0}'")]
    InvalidQuantity(String),
    #[error("invalid subtotal '{0}'")]
    InvalidSubtotal(String),
    #[error("invalid order date '{0}'")]
    InvalidDate(String),
}

/// Storage-level fault. Aborts the running batch.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
    #[error("failed to create database directory {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Everything that can end an import run.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error(transparent)]
    Usage(#[from] UsageError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error(transparent)]
    Store(#[from] StoreError),
}
