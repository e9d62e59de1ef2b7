//! Discount sync and restore orchestration.

use std::future::Future;
use std::time::Duration;

use chrono::Utc;
use uuid::Uuid;
use zosync_core::{
    plan_restore_price, plan_variant_price, to_storefront_discount, AppConfig, HighPriceMarkdown,
    MappingIndex, SkuMatch, VariantPrices,
};
use zosync_scraper::availability_quantity;

use crate::error::SyncError;
use crate::outcome::{
    DiscountSyncOutcome, ProductResult, RestoreOutcome, SyncRun, VariantRestore, VariantUpdate,
};
use crate::ports::{ProductSource, StorefrontApi};

/// Run-wide knobs for a [`DiscountSyncer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncOptions {
    pub markdown: HighPriceMarkdown,
    /// Plan prices without writing them to the storefront.
    pub dry_run: bool,
    /// Pause between consecutive products.
    pub inter_product_delay: Duration,
    /// Extra passes over failed products after the first pass.
    pub retry_rounds: u32,
    /// Pause before each retry attempt.
    pub retry_delay: Duration,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            markdown: HighPriceMarkdown::default(),
            dry_run: false,
            inter_product_delay: Duration::from_secs(1),
            retry_rounds: 3,
            retry_delay: Duration::from_secs(5),
        }
    }
}

impl SyncOptions {
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            markdown: config.high_price_markdown,
            dry_run: false,
            inter_product_delay: Duration::from_millis(config.inter_request_delay_ms),
            retry_rounds: config.retry_rounds,
            retry_delay: Duration::from_secs(config.retry_delay_secs),
        }
    }
}

/// Mirrors source-site discounts onto storefront variant prices.
///
/// Products are processed one at a time. A failing product never aborts a
/// batch; its error is kept in the run result and it is retried in later
/// rounds.
pub struct DiscountSyncer<S, A> {
    source: S,
    storefront: A,
    index: MappingIndex,
    options: SyncOptions,
}

impl<S, A> DiscountSyncer<S, A>
where
    S: ProductSource,
    A: StorefrontApi,
{
    #[must_use]
    pub fn new(source: S, storefront: A, index: MappingIndex, options: SyncOptions) -> Self {
        Self {
            source,
            storefront,
            index,
            options,
        }
    }

    /// Syncs one product: every variant of the matched storefront product
    /// gets the source discount less the storefront undercut.
    ///
    /// The undiscounted base price is written as the compare-at price along
    /// with the new price, so a refetch after a partial failure or a later
    /// run plans from the same base instead of discounting twice.
    ///
    /// # Errors
    ///
    /// - [`SyncError::Fetch`] when the source page cannot be fetched.
    /// - [`SyncError::Match`] when no derived SKU is in the catalog.
    /// - [`SyncError::NoVariants`] when the storefront product is empty.
    /// - [`SyncError::Storefront`] on any storefront API failure.
    pub async fn sync_discount(&self, url: &str) -> Result<DiscountSyncOutcome, SyncError> {
        let snapshot = self.source.fetch_snapshot(url).await?;
        let SkuMatch { sku, target } = self.index.resolve_snapshot(&snapshot)?;

        let source_discount = snapshot.discount_percentage;
        let storefront_discount = to_storefront_discount(source_discount);
        tracing::info!(
            url,
            sku = %sku,
            product_id = target.product_id,
            source_discount,
            storefront_discount,
            "matched product"
        );

        let variants = self.product_variants(target.product_id).await?;

        let mut updates = Vec::with_capacity(variants.len());
        for variant in &variants {
            let plan = plan_variant_price(variant, storefront_discount, &self.options.markdown);
            if !self.options.dry_run {
                let compare_at = (plan.original_price > 0).then_some(plan.original_price);
                self.storefront
                    .update_variant_price(
                        target.product_id,
                        plan.variant_id,
                        plan.final_price,
                        compare_at,
                    )
                    .await?;
            }
            updates.push(VariantUpdate {
                variant_id: plan.variant_id,
                sku: plan.sku,
                original_price: plan.original_price,
                discounted_price: plan.discounted_price,
                final_price: plan.final_price,
                markdown_applied: plan.markdown_applied,
                updated: !self.options.dry_run,
            });
        }

        let high_price = updates
            .iter()
            .any(|u| self.options.markdown.exceeds_threshold(u.discounted_price));
        let markdown_applied = updates.iter().any(|u| u.markdown_applied);
        let final_price = updates.last().map_or(0, |u| u.final_price);
        let source_stock: u32 = snapshot
            .stock_rows
            .iter()
            .map(|row| availability_quantity(&row.availability))
            .sum();

        tracing::info!(
            url,
            product_id = target.product_id,
            variants = updates.len(),
            final_price,
            markdown_applied,
            dry_run = self.options.dry_run,
            "synced product discount"
        );

        Ok(DiscountSyncOutcome {
            url: url.to_owned(),
            matched_sku: sku,
            product_id: target.product_id,
            variant_id: target.variant_id,
            source_discount,
            storefront_discount,
            original_price: snapshot.original_price,
            final_price,
            high_price,
            markdown_applied,
            discount_deadline: snapshot.discount_deadline,
            source_stock,
            updates,
        })
    }

    /// Puts every variant of the matched product back to its reference
    /// price (compare-at when positive, else price).
    ///
    /// # Errors
    ///
    /// Same as [`DiscountSyncer::sync_discount`].
    pub async fn restore_original_prices(&self, url: &str) -> Result<RestoreOutcome, SyncError> {
        let snapshot = self.source.fetch_snapshot(url).await?;
        let SkuMatch { sku, target } = self.index.resolve_snapshot(&snapshot)?;
        let variants = self.product_variants(target.product_id).await?;

        let mut restored = Vec::with_capacity(variants.len());
        let mut skipped_variant_ids = Vec::new();
        for variant in variants {
            let Some(price) = plan_restore_price(&variant) else {
                tracing::warn!(
                    product_id = target.product_id,
                    variant_id = variant.variant_id,
                    "variant has no positive reference price, skipping restore"
                );
                skipped_variant_ids.push(variant.variant_id);
                continue;
            };
            if !self.options.dry_run {
                self.storefront
                    .update_variant_price(target.product_id, variant.variant_id, price, None)
                    .await?;
            }
            restored.push(VariantRestore {
                variant_id: variant.variant_id,
                sku: variant.sku,
                price,
                updated: !self.options.dry_run,
            });
        }

        tracing::info!(
            url,
            product_id = target.product_id,
            restored = restored.len(),
            skipped = skipped_variant_ids.len(),
            dry_run = self.options.dry_run,
            "restored original prices"
        );

        Ok(RestoreOutcome {
            url: url.to_owned(),
            matched_sku: sku,
            product_id: target.product_id,
            restored,
            skipped_variant_ids,
        })
    }

    /// Syncs every URL in order, then retries failures.
    pub async fn sync_all(&self, urls: &[String]) -> SyncRun<DiscountSyncOutcome> {
        self.run_batch(urls, "sync", |url| self.sync_discount(url))
            .await
    }

    /// Restores every URL in order, then retries failures.
    pub async fn restore_all(&self, urls: &[String]) -> SyncRun<RestoreOutcome> {
        self.run_batch(urls, "restore", |url| self.restore_original_prices(url))
            .await
    }

    async fn product_variants(&self, product_id: i64) -> Result<Vec<VariantPrices>, SyncError> {
        let variants = self.storefront.fetch_variants(product_id).await?;
        if variants.is_empty() {
            return Err(SyncError::NoVariants { product_id });
        }
        Ok(variants)
    }

    /// First pass over all URLs with the inter-product delay, followed by up
    /// to `retry_rounds` passes over whatever still fails.
    async fn run_batch<'a, T, F, Fut>(&'a self, urls: &'a [String], kind: &str, op: F) -> SyncRun<T>
    where
        F: Fn(&'a str) -> Fut,
        Fut: Future<Output = Result<T, SyncError>>,
    {
        let run_id = Uuid::new_v4();
        let started_at = Utc::now();
        let total = urls.len();
        tracing::info!(%run_id, kind, total, dry_run = self.options.dry_run, "starting batch");

        let mut results: Vec<ProductResult<T>> = Vec::with_capacity(total);
        for (idx, url) in urls.iter().enumerate() {
            if idx > 0 && !self.options.inter_product_delay.is_zero() {
                tokio::time::sleep(self.options.inter_product_delay).await;
            }
            tracing::info!(%run_id, position = idx + 1, total, url = %url, "processing product");
            let outcome = op(url.as_str()).await;
            if let Err(err) = &outcome {
                tracing::warn!(%run_id, url = %url, error = %err, "product failed");
            }
            results.push(ProductResult {
                url: url.clone(),
                attempts: 1,
                outcome,
            });
        }

        for round in 1..=self.options.retry_rounds {
            let failed: Vec<usize> = results
                .iter()
                .enumerate()
                .filter(|(_, r)| !r.is_success())
                .map(|(i, _)| i)
                .collect();
            if failed.is_empty() {
                break;
            }
            tracing::info!(%run_id, round, failed = failed.len(), "retrying failed products");

            for idx in failed {
                if !self.options.retry_delay.is_zero() {
                    tokio::time::sleep(self.options.retry_delay).await;
                }
                let url: &'a str = &urls[idx];
                let outcome = op(url).await;
                let result = &mut results[idx];
                result.attempts += 1;
                match &outcome {
                    Ok(_) => tracing::info!(%run_id, round, url, "retry succeeded"),
                    Err(err) => tracing::warn!(%run_id, round, url, error = %err, "retry failed"),
                }
                result.outcome = outcome;
            }
        }

        let succeeded = results.iter().filter(|r| r.is_success()).count();
        tracing::info!(
            %run_id,
            kind,
            total,
            succeeded,
            failed = total - succeeded,
            "batch finished"
        );

        SyncRun {
            run_id,
            started_at,
            finished_at: Utc::now(),
            dry_run: self.options.dry_run,
            results,
        }
    }
}

#[cfg(test)]
#[path = "syncer_test.rs"]
mod tests;
