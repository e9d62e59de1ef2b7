//! Catalog snapshot export: published storefront variants to the mapping CSV.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use zosync_core::{write_catalog, CatalogVariantRecord};

use crate::client::StorefrontClient;
use crate::error::StorefrontError;
use crate::types::StoreProduct;

/// One record per variant, in product then variant order. SKUs are trimmed;
/// variants without a SKU are kept with an empty SKU.
#[must_use]
pub fn catalog_records(products: &[StoreProduct]) -> Vec<CatalogVariantRecord> {
    products
        .iter()
        .flat_map(|product| {
            product.variants.iter().map(move |variant| {
                let prices = variant.prices();
                CatalogVariantRecord {
                    variant_id: variant.id,
                    sku: prices.sku.clone().unwrap_or_default(),
                    product_id: product.id,
                    title: product.title.clone(),
                    price: Some(prices.price).filter(|p| *p > 0),
                    compare_at_price: prices.compare_at_price,
                }
            })
        })
        .collect()
}

/// Exports every published variant to `path` and returns the row count.
///
/// # Errors
///
/// - [`StorefrontError::NoPublishedVariants`] when the storefront has none.
/// - [`StorefrontError::Io`] / [`StorefrontError::Catalog`] when the file
///   cannot be written.
/// - Any fetch error from the client.
pub async fn export_mapping(
    client: &StorefrontClient,
    path: &Path,
    inter_request_delay_ms: u64,
) -> Result<usize, StorefrontError> {
    let products = client
        .fetch_all_published_products(inter_request_delay_ms)
        .await?;
    let records = catalog_records(&products);
    if records.is_empty() {
        return Err(StorefrontError::NoPublishedVariants);
    }

    let file = File::create(path).map_err(|source| StorefrontError::Io {
        path: path.display().to_string(),
        source,
    })?;
    write_catalog(BufWriter::new(file), &records)?;

    tracing::info!(
        path = %path.display(),
        products = products.len(),
        variants = records.len(),
        "exported catalog snapshot"
    );
    Ok(records.len())
}
