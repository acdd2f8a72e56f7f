//! Export module - cleaned CSV, SQLite table and SQL script

pub mod csv;
pub mod sqlite;

use polars::prelude::PolarsError;
use thiserror::Error;

pub use csv::write_cleaned_csv;
pub use sqlite::SqliteExporter;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
