//! Pipeline Runner
//! Load, clean, derive, aggregate, chart and export, in that fixed order.

use crate::charts::{ChartError, StaticChartRenderer};
use crate::config::PipelineConfig;
use crate::data::{
    columns, DataLoader, DataProcessor, FieldNormalizer, LoaderError, NormalizeError,
    ProcessorError,
};
use crate::export::{self, ExportError, SqliteExporter};
use crate::stats::{CategoryDiscount, StatsCalculator, StatsError};
use polars::prelude::*;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Rows shown in the preview log.
const PREVIEW_ROWS: usize = 5;

const PREVIEW_COLUMNS: [&str; 5] = [
    columns::PRODUCT_NAME,
    columns::ACTUAL_PRICE,
    columns::DISCOUNTED_PRICE,
    columns::DISCOUNT_PERCENTAGE,
    columns::CATEGORY,
];

const SUMMARY_COLUMNS: [&str; 4] = [
    columns::ACTUAL_PRICE,
    columns::DISCOUNTED_PRICE,
    columns::DISCOUNT_PERCENTAGE,
    columns::PRICE_DIFF,
];

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Load(#[from] LoaderError),
    #[error(transparent)]
    Normalize(#[from] NormalizeError),
    #[error(transparent)]
    Process(#[from] ProcessorError),
    #[error(transparent)]
    Stats(#[from] StatsError),
    #[error(transparent)]
    Chart(#[from] ChartError),
    #[error(transparent)]
    Export(#[from] ExportError),
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
}

/// What a completed run produced.
#[derive(Debug, Clone)]
pub struct PipelineReport {
    pub rows: usize,
    pub category_depth: usize,
    pub top_categories: Vec<CategoryDiscount>,
    pub top_main_categories: Vec<CategoryDiscount>,
    pub table_rows: usize,
}

/// Run every step once. The first failure aborts the run; outputs already
/// written stay on disk.
pub fn run(config: &PipelineConfig) -> Result<PipelineReport, PipelineError> {
    info!(path = %config.input_path.display(), "loading catalog");
    let df = DataLoader::load_csv(&config.input_path)?;
    info!(
        rows = df.height(),
        columns = ?DataLoader::column_names(&df),
        "catalog loaded"
    );

    let df = FieldNormalizer::normalize(df)?;
    let df = DataProcessor::add_price_diff(df)?;
    let (df, category_depth) = DataProcessor::split_category(df)?;
    info!(category_depth, "derived price_diff and category levels");

    log_preview(&df)?;
    for stats in StatsCalculator::summarize_columns(&df, &SUMMARY_COLUMNS)? {
        debug!(
            column = %stats.column,
            count = stats.count,
            mean = stats.mean,
            median = stats.median,
            std = stats.std,
            min = stats.min,
            max = stats.max,
            p05 = stats.p05,
            p95 = stats.p95,
            "column summary"
        );
    }

    let top_categories = StatsCalculator::top_categories_by_discount(&df, config.top_n)?;
    for (rank, entry) in top_categories.iter().enumerate() {
        debug!(
            rank = rank + 1,
            category = %entry.category,
            mean_discount = entry.mean_discount,
            products = entry.count,
            "top category"
        );
    }

    let top_main_categories = if category_depth > 0 {
        StatsCalculator::mean_discount_by(&df, &columns::category_level(1), config.top_n)?
    } else {
        Vec::new()
    };
    if let Some(best) = top_main_categories.first() {
        info!(
            category = %best.category,
            mean_discount = best.mean_discount,
            "main category with the largest average discount"
        );
    }

    if let Some(chart_path) = &config.chart_path {
        StaticChartRenderer::render_bar_chart(&top_categories, chart_path)?;
        info!(path = %chart_path.display(), "chart rendered");
        if config.open_chart {
            if let Err(e) = StaticChartRenderer::show(chart_path) {
                warn!(error = %e, "could not display chart");
            }
        }
    }

    let written = export::write_cleaned_csv(&df, &config.cleaned_csv_path)?;
    info!(path = %config.cleaned_csv_path.display(), rows = written, "cleaned CSV written");

    let mut exporter = SqliteExporter::open(&config.database_path)?;
    exporter.write_table(&df, &config.table_name)?;
    let table_rows = exporter.row_count(&config.table_name)?;
    info!(
        path = %config.database_path.display(),
        table = %config.table_name,
        rows = table_rows,
        "database table replaced"
    );

    exporter.dump_sql(&config.sql_dump_path)?;
    exporter.close()?;

    Ok(PipelineReport {
        rows: df.height(),
        category_depth,
        top_categories,
        top_main_categories,
        table_rows,
    })
}

fn log_preview(df: &DataFrame) -> Result<(), PipelineError> {
    let preview = df.select(PREVIEW_COLUMNS)?.head(Some(PREVIEW_ROWS));
    info!("cleaned data preview:\n{preview}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;
    use std::fs;

    const CATALOG: &str = "\
product_id,product_name,category,discounted_price,actual_price,discount_percentage
P1,Cable,A|X,\"₹1,080\",\"₹1,200\",10%
P2,Charger,A|Y,₹700,\"₹1,000\",30%
P3,Mouse,B|X,₹400,₹500,20%
";

    fn setup() -> (tempfile::TempDir, PipelineConfig) {
        let dir = tempfile::tempdir().expect("temp dir");
        let config = PipelineConfig::in_dir(dir.path()).without_chart();
        fs::write(&config.input_path, CATALOG).expect("write input");
        (dir, config)
    }

    #[test]
    fn three_row_catalog_end_to_end() {
        let (_dir, config) = setup();
        let report = run(&config).unwrap();

        assert_eq!(report.rows, 3);
        assert_eq!(report.category_depth, 2);
        assert_eq!(report.table_rows, 3);

        let main: Vec<(&str, f64)> = report
            .top_main_categories
            .iter()
            .map(|c| (c.category.as_str(), c.mean_discount))
            .collect();
        assert_eq!(main, vec![("A", 20.0), ("B", 20.0)]);

        let full: Vec<(&str, f64)> = report
            .top_categories
            .iter()
            .map(|c| (c.category.as_str(), c.mean_discount))
            .collect();
        assert_eq!(full, vec![("A|Y", 30.0), ("B|X", 20.0), ("A|X", 10.0)]);
    }

    #[test]
    fn database_holds_all_columns_including_levels() {
        let (_dir, config) = setup();
        run(&config).unwrap();

        let conn = Connection::open(&config.database_path).unwrap();
        let mut stmt = conn.prepare("PRAGMA table_info(\"amazon_data\")").unwrap();
        let names: Vec<String> = stmt
            .query_map([], |row| row.get(1))
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(
            names,
            vec![
                "product_id",
                "product_name",
                "category",
                "discounted_price",
                "actual_price",
                "discount_percentage",
                "price_diff",
                "category_level_1",
                "category_level_2",
            ]
        );

        let diff: f64 = conn
            .query_row(
                "SELECT price_diff FROM amazon_data WHERE product_id = 'P1'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(diff, 120.0);
    }

    #[test]
    fn rerun_overwrites_outputs() {
        let (_dir, config) = setup();
        run(&config).unwrap();
        let csv_first = fs::read(&config.cleaned_csv_path).unwrap();
        let dump_first = fs::read_to_string(&config.sql_dump_path).unwrap();

        let report = run(&config).unwrap();
        assert_eq!(report.table_rows, 3);
        assert_eq!(fs::read(&config.cleaned_csv_path).unwrap(), csv_first);
        assert_eq!(
            fs::read_to_string(&config.sql_dump_path).unwrap(),
            dump_first
        );
        assert!(dump_first.starts_with("BEGIN TRANSACTION;\n"));
        assert_eq!(dump_first.matches("INSERT INTO \"amazon_data\"").count(), 3);
    }

    #[test]
    fn malformed_price_aborts_before_any_output() {
        let (_dir, config) = setup();
        fs::write(
            &config.input_path,
            "product_id,product_name,category,discounted_price,actual_price,discount_percentage\n\
             P1,Cable,A|X,free,₹1,10%\n",
        )
        .unwrap();

        let err = run(&config).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::Normalize(NormalizeError::InvalidNumber { row: 0, .. })
        ));
        assert!(!config.cleaned_csv_path.exists());
        assert!(!config.database_path.exists());
    }

    #[test]
    fn missing_input_is_a_load_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let config = PipelineConfig::in_dir(dir.path()).without_chart();
        assert!(matches!(
            run(&config),
            Err(PipelineError::Load(LoaderError::NotFound(_)))
        ));
    }
}
