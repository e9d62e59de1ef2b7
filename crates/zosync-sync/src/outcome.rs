//! Per-product results of sync and restore runs.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::error::SyncError;

/// One variant's price change during a discount sync.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VariantUpdate {
    pub variant_id: i64,
    pub sku: Option<String>,
    pub original_price: i64,
    pub discounted_price: i64,
    pub final_price: i64,
    pub markdown_applied: bool,
    /// `false` in dry-run mode.
    pub updated: bool,
}

/// Result of syncing one source product's discount to the storefront.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiscountSyncOutcome {
    pub url: String,
    pub matched_sku: String,
    pub product_id: i64,
    /// Variant the matched SKU points at.
    pub variant_id: i64,
    pub source_discount: i32,
    pub storefront_discount: i32,
    /// Regular price advertised on the source page.
    pub original_price: i64,
    /// Final price of the last planned variant.
    pub final_price: i64,
    /// Any variant's discounted price is above the markdown threshold.
    pub high_price: bool,
    pub markdown_applied: bool,
    pub discount_deadline: Option<String>,
    /// Stock advertised on the source page, summed over its stock rows.
    pub source_stock: u32,
    pub updates: Vec<VariantUpdate>,
}

/// One variant put back to its reference price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VariantRestore {
    pub variant_id: i64,
    pub sku: Option<String>,
    pub price: i64,
    pub updated: bool,
}

/// Result of restoring one product's original prices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RestoreOutcome {
    pub url: String,
    pub matched_sku: String,
    pub product_id: i64,
    pub restored: Vec<VariantRestore>,
    /// Variants without a positive reference price.
    pub skipped_variant_ids: Vec<i64>,
}

/// Pricing figures of a discount sync, flattened for reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PricingDetails {
    pub source_discount: i32,
    pub storefront_discount: i32,
    pub original_price: i64,
    pub final_price: i64,
    pub high_price: bool,
    pub markdown_applied: bool,
    pub discount_deadline: Option<String>,
    pub source_stock: u32,
}

/// Common view over sync and restore outcomes for summaries and reports.
pub trait RunOutcome {
    fn matched_sku(&self) -> &str;
    fn product_id(&self) -> i64;
    fn variant_count(&self) -> usize;

    /// Discount figures, for runs that compute them.
    fn pricing(&self) -> Option<PricingDetails> {
        None
    }
}

impl RunOutcome for DiscountSyncOutcome {
    fn matched_sku(&self) -> &str {
        &self.matched_sku
    }

    fn product_id(&self) -> i64 {
        self.product_id
    }

    fn variant_count(&self) -> usize {
        self.updates.len()
    }

    fn pricing(&self) -> Option<PricingDetails> {
        Some(PricingDetails {
            source_discount: self.source_discount,
            storefront_discount: self.storefront_discount,
            original_price: self.original_price,
            final_price: self.final_price,
            high_price: self.high_price,
            markdown_applied: self.markdown_applied,
            discount_deadline: self.discount_deadline.clone(),
            source_stock: self.source_stock,
        })
    }
}

impl RunOutcome for RestoreOutcome {
    fn matched_sku(&self) -> &str {
        &self.matched_sku
    }

    fn product_id(&self) -> i64 {
        self.product_id
    }

    fn variant_count(&self) -> usize {
        self.restored.len()
    }
}

/// Final state of one product after all retry rounds.
#[derive(Debug)]
pub struct ProductResult<T> {
    pub url: String,
    /// Number of times the product was attempted.
    pub attempts: u32,
    pub outcome: Result<T, SyncError>,
}

impl<T> ProductResult<T> {
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.outcome.is_ok()
    }
}

/// A complete batch run.
#[derive(Debug)]
pub struct SyncRun<T> {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub dry_run: bool,
    /// One entry per input URL, in input order.
    pub results: Vec<ProductResult<T>>,
}
