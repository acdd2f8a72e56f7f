//! Discount Dashboard - Product Catalog Price & Discount Analysis
//!
//! Cleans a product catalog CSV, ranks categories by average discount,
//! charts the ranking and exports the result to CSV and SQLite.

mod charts;
mod config;
mod data;
mod export;
mod logging;
mod pipeline;
mod stats;

use config::PipelineConfig;

fn main() -> anyhow::Result<()> {
    logging::init_logging();

    let config = PipelineConfig::default();
    let report = pipeline::run(&config)?;

    tracing::info!(
        rows = report.rows,
        category_levels = report.category_depth,
        categories_ranked = report.top_categories.len(),
        main_categories = report.top_main_categories.len(),
        table_rows = report.table_rows,
        "pipeline finished"
    );
    tracing::info!(
        "SQL file '{}' created successfully.",
        config.sql_dump_path.display()
    );
    Ok(())
}
