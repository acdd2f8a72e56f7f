//! Field Normalizer Module
//! Strips currency, thousands and percent symbols and converts to Float64.

use super::columns;
use polars::prelude::*;
use std::num::ParseFloatError;
use thiserror::Error;

/// Why a single cell could not be read as a number.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseFailure {
    #[error("nothing left after removing symbols")]
    Empty,
    #[error("{0}")]
    Invalid(#[from] ParseFloatError),
}

#[derive(Error, Debug)]
pub enum NormalizeError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
    #[error("Column '{column}' row {row}: missing value")]
    MissingValue { column: &'static str, row: usize },
    #[error("Column '{column}' row {row}: cannot parse {value:?} as a number ({source})")]
    InvalidNumber {
        column: &'static str,
        row: usize,
        value: String,
        source: ParseFailure,
    },
}

/// The three text columns that carry numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericField {
    DiscountedPrice,
    ActualPrice,
    DiscountPercentage,
}

impl NumericField {
    pub const ALL: [NumericField; 3] = [
        NumericField::DiscountedPrice,
        NumericField::ActualPrice,
        NumericField::DiscountPercentage,
    ];

    pub fn column(self) -> &'static str {
        match self {
            NumericField::DiscountedPrice => columns::DISCOUNTED_PRICE,
            NumericField::ActualPrice => columns::ACTUAL_PRICE,
            NumericField::DiscountPercentage => columns::DISCOUNT_PERCENTAGE,
        }
    }

    /// Literal symbols removed before parsing.
    pub fn symbols(self) -> &'static [&'static str] {
        match self {
            NumericField::DiscountedPrice | NumericField::ActualPrice => &["₹", ","],
            NumericField::DiscountPercentage => &["%"],
        }
    }
}

/// Remove `symbols` from `raw` and parse what remains.
pub fn parse_numeric(raw: &str, symbols: &[&str]) -> Result<f64, ParseFailure> {
    let mut cleaned = raw.to_string();
    for symbol in symbols {
        cleaned = cleaned.replace(symbol, "");
    }

    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        return Err(ParseFailure::Empty);
    }
    Ok(cleaned.parse::<f64>()?)
}

/// Converts the price and percentage columns in place.
pub struct FieldNormalizer;

impl FieldNormalizer {
    /// Replace every [`NumericField`] column with its Float64 form.
    ///
    /// Aborts on the first cell that does not parse.
    pub fn normalize(mut df: DataFrame) -> Result<DataFrame, NormalizeError> {
        for field in NumericField::ALL {
            let values = Self::parse_column(&df, field)?;
            df.with_column(Column::new(field.column().into(), values))?;
            tracing::debug!(column = field.column(), "normalized to Float64");
        }
        Ok(df)
    }

    fn parse_column(df: &DataFrame, field: NumericField) -> Result<Vec<f64>, NormalizeError> {
        let column = field.column();
        let ca = df.column(column)?.str()?;

        ca.into_iter()
            .enumerate()
            .map(|(row, cell)| {
                let raw = cell.ok_or(NormalizeError::MissingValue { column, row })?;
                parse_numeric(raw, field.symbols()).map_err(|source| {
                    NormalizeError::InvalidNumber {
                        column,
                        row,
                        value: raw.to_string(),
                        source,
                    }
                })
            })
            .collect()
    }
}
