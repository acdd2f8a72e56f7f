//! Pipeline Configuration
//! Fixed input/output locations and parameters for a pipeline run.

use std::path::{Path, PathBuf};

/// Source dataset read by the loader.
pub const INPUT_CSV: &str = "amazon.csv";
/// Projected, cleaned CSV for dashboard tools.
pub const CLEANED_CSV: &str = "cleaned_amazon_data.csv";
/// Embedded SQLite database file.
pub const DATABASE_FILE: &str = "amazon.db";
/// Table replaced on every run.
pub const TABLE_NAME: &str = "amazon_data";
/// Schema + data script of the database.
pub const SQL_DUMP: &str = "amazon_export.sql";
/// Rendered bar chart.
pub const CHART_PNG: &str = "top_discounts.png";
/// Number of categories kept by the aggregator.
pub const TOP_N: usize = 20;

/// Every literal the pipeline needs, gathered in one place.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    pub input_path: PathBuf,
    pub cleaned_csv_path: PathBuf,
    pub database_path: PathBuf,
    pub table_name: String,
    pub sql_dump_path: PathBuf,
    /// `None` skips chart rendering entirely.
    pub chart_path: Option<PathBuf>,
    /// Hand the rendered chart to the system image viewer.
    pub open_chart: bool,
    pub top_n: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from(INPUT_CSV),
            cleaned_csv_path: PathBuf::from(CLEANED_CSV),
            database_path: PathBuf::from(DATABASE_FILE),
            table_name: TABLE_NAME.to_string(),
            sql_dump_path: PathBuf::from(SQL_DUMP),
            chart_path: Some(PathBuf::from(CHART_PNG)),
            open_chart: true,
            top_n: TOP_N,
        }
    }
}

impl PipelineConfig {
    /// Default configuration with every file placed under `dir`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        let defaults = Self::default();
        Self {
            input_path: dir.join(defaults.input_path),
            cleaned_csv_path: dir.join(defaults.cleaned_csv_path),
            database_path: dir.join(defaults.database_path),
            sql_dump_path: dir.join(defaults.sql_dump_path),
            chart_path: defaults.chart_path.map(|p| dir.join(p)),
            ..defaults
        }
    }

    /// Disable rendering and display of the chart.
    pub fn without_chart(mut self) -> Self {
        self.chart_path = None;
        self.open_chart = false;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_uses_fixed_literals() {
        let config = PipelineConfig::default();
        assert_eq!(config.input_path, PathBuf::from("amazon.csv"));
        assert_eq!(config.database_path, PathBuf::from("amazon.db"));
        assert_eq!(config.table_name, "amazon_data");
        assert_eq!(config.top_n, 20);
        assert!(config.open_chart);
    }

    #[test]
    fn in_dir_rebases_every_path() {
        let config = PipelineConfig::in_dir("/tmp/run");
        assert_eq!(config.input_path, PathBuf::from("/tmp/run/amazon.csv"));
        assert_eq!(
            config.sql_dump_path,
            PathBuf::from("/tmp/run/amazon_export.sql")
        );
        assert_eq!(
            config.chart_path,
            Some(PathBuf::from("/tmp/run/top_discounts.png"))
        );
        assert_eq!(config.table_name, "amazon_data");
    }

    #[test]
    fn without_chart_clears_display() {
        let config = PipelineConfig::default().without_chart();
        assert!(config.chart_path.is_none());
        assert!(!config.open_chart);
    }
}
