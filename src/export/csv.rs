//! Cleaned CSV export for dashboard tools.

use super::ExportError;
use crate::data::columns;
use polars::prelude::*;
use std::fs::File;
use std::path::Path;

/// Columns written to the cleaned CSV, in order.
pub const CLEANED_COLUMNS: [&str; 6] = [
    columns::PRODUCT_NAME,
    columns::CATEGORY,
    columns::ACTUAL_PRICE,
    columns::DISCOUNTED_PRICE,
    columns::DISCOUNT_PERCENTAGE,
    columns::PRICE_DIFF,
];

/// Write the fixed column projection of `df` to `path`, replacing any
/// existing file. Header included, no index column.
pub fn write_cleaned_csv(df: &DataFrame, path: &Path) -> Result<usize, ExportError> {
    let mut projected = df.select(CLEANED_COLUMNS)?;

    let mut file = File::create(path)?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .finish(&mut projected)?;

    Ok(projected.height())
}
