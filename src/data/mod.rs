//! Data module - CSV loading, cleaning and derived fields

mod loader;
mod normalizer;
mod processor;

pub use loader::{DataLoader, LoaderError};
pub use normalizer::{FieldNormalizer, NormalizeError};
pub use processor::{DataProcessor, ProcessorError};

/// Column names of the product catalog.
pub mod columns {
    pub const PRODUCT_NAME: &str = "product_name";
    pub const CATEGORY: &str = "category";
    pub const DISCOUNTED_PRICE: &str = "discounted_price";
    pub const ACTUAL_PRICE: &str = "actual_price";
    pub const DISCOUNT_PERCENTAGE: &str = "discount_percentage";
    pub const PRICE_DIFF: &str = "price_diff";
    /// Prefix of the split category columns, followed by a 1-based level.
    pub const CATEGORY_LEVEL_PREFIX: &str = "category_level_";

    /// Name of the split category column for `level` (1-based).
    pub fn category_level(level: usize) -> String {
        format!("{CATEGORY_LEVEL_PREFIX}{level}")
    }
}
