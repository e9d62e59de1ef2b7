use std::fmt;

use serde::Serialize;

use crate::outcome::{ProductResult, RunOutcome};

/// A product that still failed after every retry round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedProduct {
    pub url: String,
    pub error: String,
}

/// Aggregate counts for a batch run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SyncSummary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    /// Variants touched by successful products.
    pub total_variants: usize,
    /// Mean source discount over successful products with a positive one.
    pub average_discount: Option<f64>,
    pub errors: Vec<FailedProduct>,
}

impl SyncSummary {
    #[must_use]
    pub fn from_results<T: RunOutcome>(results: &[ProductResult<T>]) -> Self {
        let mut succeeded = 0usize;
        let mut total_variants = 0usize;
        let mut discounts: Vec<i32> = Vec::new();
        let mut errors = Vec::new();

        for result in results {
            match &result.outcome {
                Ok(outcome) => {
                    succeeded += 1;
                    total_variants += outcome.variant_count();
                    if let Some(pct) = outcome
                        .pricing()
                        .map(|p| p.source_discount)
                        .filter(|pct| *pct > 0)
                    {
                        discounts.push(pct);
                    }
                }
                Err(err) => errors.push(FailedProduct {
                    url: result.url.clone(),
                    error: err.to_string(),
                }),
            }
        }

        #[allow(clippy::cast_precision_loss)]
        let average_discount = (!discounts.is_empty()).then(|| {
            let sum: i64 = discounts.iter().map(|&d| i64::from(d)).sum();
            sum as f64 / discounts.len() as f64
        });

        Self {
            total: results.len(),
            succeeded,
            failed: errors.len(),
            total_variants,
            average_discount,
            errors,
        }
    }
}

impl fmt::Display for SyncSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "products: {} total, {} succeeded, {} failed",
            self.total, self.succeeded, self.failed
        )?;
        writeln!(f, "variants updated: {}", self.total_variants)?;
        if let Some(avg) = self.average_discount {
            writeln!(f, "average source discount: {avg:.1}%")?;
        }
        for failure in &self.errors {
            writeln!(f, "  FAILED {}: {}", failure.url, failure.error)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SyncError;
    use crate::outcome::{DiscountSyncOutcome, RestoreOutcome, VariantRestore, VariantUpdate};
    use zosync_core::MatchError;

    fn synced(url: &str, source_discount: i32, variants: usize) -> ProductResult<DiscountSyncOutcome> {
        let update = VariantUpdate {
            variant_id: 1,
            sku: None,
            original_price: 1000,
            discounted_price: 900,
            final_price: 900,
            markdown_applied: false,
            updated: true,
        };
        ProductResult {
            url: url.to_owned(),
            attempts: 1,
            outcome: Ok(DiscountSyncOutcome {
                url: url.to_owned(),
                matched_sku: "ZO-76D4-BLK-M".to_owned(),
                product_id: 1,
                variant_id: 1,
                source_discount,
                storefront_discount: source_discount - 5,
                original_price: 1000,
                final_price: 900,
                high_price: false,
                markdown_applied: false,
                discount_deadline: None,
                source_stock: 0,
                updates: vec![update; variants],
            }),
        }
    }

    fn failed<T>(url: &str) -> ProductResult<T> {
        ProductResult {
            url: url.to_owned(),
            attempts: 4,
            outcome: Err(SyncError::Match(MatchError::MatchNotFound {
                tried: vec!["ZO-0000-BLK-M".to_owned()],
            })),
        }
    }

    #[test]
    fn counts_successes_failures_and_variants() {
        let results = vec![synced("a", 30, 3), failed("b"), synced("c", 20, 2)];
        let summary = SyncSummary::from_results(&results);
        assert_eq!(summary.total, 3);
        assert_eq!(summary.succeeded, 2);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.total_variants, 5);
        assert_eq!(summary.errors[0].url, "b");
        assert!(summary.errors[0].error.contains("ZO-0000-BLK-M"));
    }

    #[test]
    fn average_ignores_zero_discounts() {
        let results = vec![synced("a", 30, 1), synced("b", 0, 1), synced("c", 21, 1)];
        let summary = SyncSummary::from_results(&results);
        assert_eq!(summary.average_discount, Some(25.5));
    }

    #[test]
    fn average_is_none_without_positive_discounts() {
        let results = vec![synced("a", 0, 1), failed("b")];
        assert_eq!(SyncSummary::from_results(&results).average_discount, None);
    }

    #[test]
    fn restore_runs_have_no_average() {
        let results = vec![ProductResult {
            url: "a".to_owned(),
            attempts: 1,
            outcome: Ok(RestoreOutcome {
                url: "a".to_owned(),
                matched_sku: "ZO-76D4-BLK-M".to_owned(),
                product_id: 1,
                restored: vec![VariantRestore {
                    variant_id: 1,
                    sku: None,
                    price: 2990,
                    updated: true,
                }],
                skipped_variant_ids: vec![],
            }),
        }];
        let summary = SyncSummary::from_results(&results);
        assert_eq!(summary.total_variants, 1);
        assert_eq!(summary.average_discount, None);
    }

    #[test]
    fn display_lists_failures() {
        let results: Vec<ProductResult<DiscountSyncOutcome>> = vec![failed("https://zozo.jp/x")];
        let text = SyncSummary::from_results(&results).to_string();
        assert!(text.contains("1 failed"));
        assert!(text.contains("FAILED https://zozo.jp/x"));
    }
}
