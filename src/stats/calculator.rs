//! Statistics Calculator Module
//! Per-category discount aggregation and descriptive column statistics.

use crate::data::columns;
use polars::prelude::*;
use statrs::statistics::Statistics;
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StatsError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
}

/// Mean discount of one category.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryDiscount {
    pub category: String,
    pub count: usize,
    pub mean_discount: f64,
}

/// Descriptive statistics for a numeric column.
#[derive(Debug, Clone)]
pub struct ColumnStats {
    pub column: String,
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    pub std: f64,
    pub variance: f64,
    pub min: f64,
    pub max: f64,
    pub p95: f64,
    pub p05: f64,
}

impl Default for ColumnStats {
    fn default() -> Self {
        Self {
            column: String::new(),
            count: 0,
            mean: f64::NAN,
            median: f64::NAN,
            std: f64::NAN,
            variance: f64::NAN,
            min: f64::NAN,
            max: f64::NAN,
            p95: f64::NAN,
            p05: f64::NAN,
        }
    }
}

/// Handles statistical calculations over the cleaned catalog.
pub struct StatsCalculator;

impl StatsCalculator {
    /// Categories (full path) with the highest mean discount, best first.
    pub fn top_categories_by_discount(
        df: &DataFrame,
        limit: usize,
    ) -> Result<Vec<CategoryDiscount>, StatsError> {
        Self::mean_discount_by(df, columns::CATEGORY, limit)
    }

    /// Group rows by `key_column`, average `discount_percentage` per group,
    /// sort descending and keep at most `limit` groups.
    ///
    /// Null keys are dropped. Equal means are ordered by key ascending.
    pub fn mean_discount_by(
        df: &DataFrame,
        key_column: &str,
        limit: usize,
    ) -> Result<Vec<CategoryDiscount>, StatsError> {
        let keys = df.column(key_column)?.str()?;
        let discounts = df.column(columns::DISCOUNT_PERCENTAGE)?.f64()?;

        let mut groups: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
        for (key, discount) in keys.into_iter().zip(discounts.into_iter()) {
            if let (Some(key), Some(discount)) = (key, discount) {
                groups.entry(key).or_default().push(discount);
            }
        }

        let mut ranked: Vec<CategoryDiscount> = groups
            .into_iter()
            .map(|(key, values)| CategoryDiscount {
                category: key.to_string(),
                count: values.len(),
                mean_discount: Statistics::mean(&values),
            })
            .collect();

        ranked.sort_by(|a, b| {
            b.mean_discount
                .total_cmp(&a.mean_discount)
                .then_with(|| a.category.cmp(&b.category))
        });
        ranked.truncate(limit);

        Ok(ranked)
    }

    /// Compute descriptive statistics for an array of values.
    pub fn compute_descriptive_stats(values: &[f64]) -> ColumnStats {
        let n = values.len();
        if n == 0 {
            return ColumnStats::default();
        }

        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.total_cmp(b));

        let mean = Statistics::mean(values);
        let median = if n % 2 == 0 {
            (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
        } else {
            sorted[n / 2]
        };

        let variance = if n > 1 {
            Statistics::variance(values)
        } else {
            0.0
        };

        ColumnStats {
            column: String::new(),
            count: n,
            mean,
            median,
            std: variance.sqrt(),
            variance,
            min: sorted[0],
            max: sorted[n - 1],
            p95: Self::percentile(&sorted, 95.0),
            p05: Self::percentile(&sorted, 5.0),
        }
    }

    /// Descriptive statistics for each named numeric column, nulls skipped.
    pub fn summarize_columns(
        df: &DataFrame,
        names: &[&str],
    ) -> Result<Vec<ColumnStats>, StatsError> {
        names
            .iter()
            .map(|name| -> Result<ColumnStats, StatsError> {
                let values: Vec<f64> = df
                    .column(name)?
                    .cast(&DataType::Float64)?
                    .f64()?
                    .into_iter()
                    .flatten()
                    .collect();
                let mut stats = Self::compute_descriptive_stats(&values);
                stats.column = name.to_string();
                Ok(stats)
            })
            .collect()
    }

    /// Calculate percentile using linear interpolation (NumPy compatible).
    fn percentile(sorted_values: &[f64], p: f64) -> f64 {
        let n = sorted_values.len();
        if n == 0 {
            return f64::NAN;
        }
        if n == 1 {
            return sorted_values[0];
        }

        let rank = (p / 100.0) * (n - 1) as f64;
        let lower = rank.floor() as usize;
        let upper = (rank.ceil() as usize).min(n - 1);
        let frac = rank - lower as f64;

        if lower == upper {
            sorted_values[lower]
        } else {
            sorted_values[lower] * (1.0 - frac) + sorted_values[upper] * frac
        }
    }
}
