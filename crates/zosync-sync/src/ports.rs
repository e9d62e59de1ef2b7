//! Seams between the orchestrator and the outside world.

use async_trait::async_trait;

use zosync_core::{SourceProductSnapshot, VariantPrices};
use zosync_scraper::{ScraperError, SourceClient};
use zosync_storefront::{StorefrontClient, StorefrontError};

/// Produces a snapshot of a source product page.
#[async_trait]
pub trait ProductSource: Send + Sync {
    async fn fetch_snapshot(&self, url: &str) -> Result<SourceProductSnapshot, ScraperError>;
}

/// The storefront operations a sync run needs.
#[async_trait]
pub trait StorefrontApi: Send + Sync {
    /// All variants of a product with coerced prices.
    async fn fetch_variants(&self, product_id: i64) -> Result<Vec<VariantPrices>, StorefrontError>;

    /// Writes `price`, and `compare_at_price` when given.
    async fn update_variant_price(
        &self,
        product_id: i64,
        variant_id: i64,
        price: i64,
        compare_at_price: Option<i64>,
    ) -> Result<(), StorefrontError>;
}

#[async_trait]
impl ProductSource for SourceClient {
    async fn fetch_snapshot(&self, url: &str) -> Result<SourceProductSnapshot, ScraperError> {
        Self::fetch_snapshot(self, url).await
    }
}

#[async_trait]
impl StorefrontApi for StorefrontClient {
    async fn fetch_variants(&self, product_id: i64) -> Result<Vec<VariantPrices>, StorefrontError> {
        let variants = self.fetch_product_variants(product_id).await?;
        Ok(variants.iter().map(zosync_storefront::StoreVariant::prices).collect())
    }

    async fn update_variant_price(
        &self,
        product_id: i64,
        variant_id: i64,
        price: i64,
        compare_at_price: Option<i64>,
    ) -> Result<(), StorefrontError> {
        Self::update_variant_price(self, product_id, variant_id, price, compare_at_price).await
    }
}
