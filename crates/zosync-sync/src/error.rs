use thiserror::Error;

use zosync_core::MatchError;
use zosync_scraper::ScraperError;
use zosync_storefront::StorefrontError;

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("source page fetch failed: {0}")]
    Fetch(#[from] ScraperError),

    #[error(transparent)]
    Match(#[from] MatchError),

    #[error("storefront request failed: {0}")]
    Storefront(#[from] StorefrontError),

    #[error("storefront product {product_id} has no variants")]
    NoVariants { product_id: i64 },

    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("report error: {0}")]
    Csv(#[from] csv::Error),
}
