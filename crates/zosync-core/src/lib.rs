pub mod app_config;
pub mod catalog;
pub mod color;
pub mod config;
pub mod discount;
pub mod mapping;
pub mod price;
pub mod sku;
pub mod snapshot;

use thiserror::Error;

pub use app_config::AppConfig;
pub use catalog::{load_catalog_snapshot, read_catalog, write_catalog, CatalogVariantRecord};
pub use color::{normalize_color, UNKNOWN_COLOR_CODE};
pub use config::{load_app_config, load_app_config_from_env};
pub use discount::{
    plan_restore_price, plan_variant_price, to_storefront_discount, HighPriceMarkdown,
    VariantPricePlan, VariantPrices,
};
pub use mapping::{MappingIndex, MatchError, SkuMatch, VariantTarget};
pub use sku::{derive_sku, derive_sku_for_url, extract_product_id, quick_sku, SKU_PREFIX};
pub use snapshot::{SourceProductSnapshot, StockRow};

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("I/O error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("catalog snapshot error: {0}")]
    Csv(#[from] csv::Error),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
