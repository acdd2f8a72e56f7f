//! CSV Data Loader Module
//! Reads the product catalog into a Polars DataFrame.

use polars::prelude::*;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Input file not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("Failed to load CSV: {0}")]
    CsvError(#[from] PolarsError),
}

/// Handles CSV file loading with Polars.
pub struct DataLoader;

impl DataLoader {
    /// Load a CSV file with a header row.
    ///
    /// Schema inference is disabled so every column arrives as text: prices
    /// such as `₹1,099` and percentages such as `64%` are left for the
    /// normalizer to clean.
    pub fn load_csv(file_path: &Path) -> Result<DataFrame, LoaderError> {
        if !file_path.is_file() {
            return Err(LoaderError::NotFound(file_path.to_path_buf()));
        }

        let df = LazyCsvReader::new(file_path)
            .with_has_header(true)
            .with_infer_schema_length(Some(0))
            .finish()?
            .collect()?;

        Ok(df)
    }

    /// Get list of column names from a DataFrame.
    pub fn column_names(df: &DataFrame) -> Vec<String> {
        df.get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn loads_every_column_as_text() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("catalog.csv");
        fs::write(
            &path,
            "product_id,product_name,category,discounted_price,actual_price,discount_percentage\n\
             B01,Cable,Computers|Cables,\"₹1,099\",\"₹1,899\",42%\n\
             B02,Mouse,Computers|Mice,₹399,₹999,60%\n",
        )
        .expect("write csv");

        let df = DataLoader::load_csv(&path).expect("load");
        assert_eq!(df.height(), 2);
        assert_eq!(
            DataLoader::column_names(&df),
            vec![
                "product_id",
                "product_name",
                "category",
                "discounted_price",
                "actual_price",
                "discount_percentage"
            ]
        );
        let prices = df.column("discounted_price").unwrap().str().unwrap();
        assert_eq!(prices.get(0), Some("₹1,099"));
        assert_eq!(prices.get(1), Some("₹399"));
    }

    #[test]
    fn missing_file_is_reported() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("absent.csv");
        let err = DataLoader::load_csv(&path).unwrap_err();
        assert!(matches!(err, LoaderError::NotFound(p) if p == path));
    }
}
