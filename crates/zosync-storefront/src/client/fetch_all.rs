use std::time::Duration;

use crate::error::StorefrontError;
use crate::types::StoreProduct;

use super::StorefrontClient;
use super::MAX_PAGES;

impl StorefrontClient {
    /// Fetches every published product, page by page from page 1.
    ///
    /// Stops at the first empty page or the first page without any published
    /// product; unpublished products on earlier pages are dropped.
    /// `inter_request_delay_ms` is slept between page requests.
    ///
    /// # Errors
    ///
    /// Propagates any page error; already-fetched pages are discarded.
    /// Returns [`StorefrontError::PaginationLimit`] after [`MAX_PAGES`] pages.
    pub async fn fetch_all_published_products(
        &self,
        inter_request_delay_ms: u64,
    ) -> Result<Vec<StoreProduct>, StorefrontError> {
        let mut published: Vec<StoreProduct> = Vec::new();
        let mut page: u32 = 1;

        loop {
            if page as usize > MAX_PAGES {
                return Err(StorefrontError::PaginationLimit {
                    max_pages: MAX_PAGES,
                });
            }
            if page > 1 && inter_request_delay_ms > 0 {
                tokio::time::sleep(Duration::from_millis(inter_request_delay_ms)).await;
            }

            let products = self.fetch_products_page(page).await?;
            if products.is_empty() {
                break;
            }
            let total = products.len();
            let page_published: Vec<StoreProduct> =
                products.into_iter().filter(|p| p.is_published).collect();
            tracing::debug!(page, total, published = page_published.len(), "fetched products page");
            if page_published.is_empty() {
                break;
            }
            published.extend(page_published);
            page += 1;
        }

        tracing::info!(products = published.len(), pages = page, "fetched published products");
        Ok(published)
    }
}
