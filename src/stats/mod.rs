//! Stats module - category aggregation and column summaries

mod calculator;

pub use calculator::{CategoryDiscount, ColumnStats, StatsCalculator, StatsError};
