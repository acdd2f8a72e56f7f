//! Data Processor Module
//! Derived fields: price difference and category hierarchy levels.

use super::columns;
use polars::prelude::*;
use thiserror::Error;

/// Separator between levels of a category path.
pub const CATEGORY_SEPARATOR: char = '|';

#[derive(Error, Debug)]
pub enum ProcessorError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
}

/// Handles derived-column operations.
pub struct DataProcessor;

impl DataProcessor {
    /// Append `price_diff = actual_price - discounted_price`.
    ///
    /// Negative differences are kept as they are.
    pub fn add_price_diff(df: DataFrame) -> Result<DataFrame, ProcessorError> {
        let df = df
            .lazy()
            .with_column(
                (col(columns::ACTUAL_PRICE) - col(columns::DISCOUNTED_PRICE))
                    .alias(columns::PRICE_DIFF),
            )
            .collect()?;
        Ok(df)
    }

    /// Split `category` on `|` into `category_level_1..=N` columns.
    ///
    /// N is the deepest path found in the data. Shallower paths and null
    /// categories are padded with nulls. Returns the table and N.
    pub fn split_category(mut df: DataFrame) -> Result<(DataFrame, usize), ProcessorError> {
        let paths: Vec<Option<Vec<String>>> = df
            .column(columns::CATEGORY)?
            .str()?
            .into_iter()
            .map(|cell| cell.map(Self::split_path))
            .collect();

        let depth = Self::max_depth(&paths);

        for level in 0..depth {
            let values: Vec<Option<String>> = paths
                .iter()
                .map(|path| path.as_ref().and_then(|parts| parts.get(level).cloned()))
                .collect();
            df.with_column(Column::new(
                columns::category_level(level + 1).into(),
                values,
            ))?;
        }

        Ok((df, depth))
    }

    /// Ordered level labels of a single category path.
    pub fn split_path(path: &str) -> Vec<String> {
        path.split(CATEGORY_SEPARATOR).map(str::to_string).collect()
    }

    fn max_depth(paths: &[Option<Vec<String>>]) -> usize {
        paths
            .iter()
            .filter_map(|p| p.as_ref().map(Vec::len))
            .max()
            .unwrap_or(0)
    }
}
