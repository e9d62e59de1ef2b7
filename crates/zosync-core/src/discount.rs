//! Storefront discount and per-variant price planning.
//!
//! The storefront always undercuts the source site's advertised discount by
//! [`STOREFRONT_UNDERCUT_PCT`] points, floored at zero. Optionally, items whose
//! discounted price is above a threshold get an extra flat markdown.

use serde::{Deserialize, Serialize};

use crate::price::apply_percent_off;

/// Percentage points subtracted from the source discount.
pub const STOREFRONT_UNDERCUT_PCT: i32 = 5;

pub const DEFAULT_HIGH_PRICE_THRESHOLD: i64 = 5000;
pub const DEFAULT_HIGH_PRICE_MARKDOWN_PCT: u32 = 15;

/// Maps the source site's discount percentage to the storefront's.
///
/// `pct - 5` when `pct > 5`, otherwise `max(pct, 0)`.
#[must_use]
pub fn to_storefront_discount(source_discount_pct: i32) -> i32 {
    if source_discount_pct > STOREFRONT_UNDERCUT_PCT {
        source_discount_pct - STOREFRONT_UNDERCUT_PCT
    } else {
        source_discount_pct.max(0)
    }
}

/// Secondary markdown for high-priced items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighPriceMarkdown {
    pub enabled: bool,
    /// Discounted prices strictly above this (yen) qualify.
    pub threshold: i64,
    /// Extra percent taken off qualifying prices.
    pub percent: u32,
}

impl Default for HighPriceMarkdown {
    fn default() -> Self {
        Self {
            enabled: false,
            threshold: DEFAULT_HIGH_PRICE_THRESHOLD,
            percent: DEFAULT_HIGH_PRICE_MARKDOWN_PCT,
        }
    }
}

impl HighPriceMarkdown {
    /// Returns a copy with the toggle set to `enabled`.
    #[must_use]
    pub fn with_enabled(self, enabled: bool) -> Self {
        Self { enabled, ..self }
    }

    #[must_use]
    pub fn exceeds_threshold(&self, discounted_price: i64) -> bool {
        discounted_price > self.threshold
    }

    /// Returns `(final_price, applied)`.
    #[must_use]
    pub fn apply(&self, discounted_price: i64) -> (i64, bool) {
        if self.enabled && self.exceeds_threshold(discounted_price) {
            (
                apply_percent_off(discounted_price, i64::from(self.percent)),
                true,
            )
        } else {
            (discounted_price, false)
        }
    }
}

/// Current prices of one storefront variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantPrices {
    pub variant_id: i64,
    pub sku: Option<String>,
    /// Current selling price; `0` when the storefront value was unusable.
    pub price: i64,
    pub compare_at_price: Option<i64>,
}

impl VariantPrices {
    /// The undiscounted reference price: compare-at when set and positive,
    /// otherwise the current price.
    #[must_use]
    pub fn base_price(&self) -> i64 {
        match self.compare_at_price {
            Some(compare) if compare > 0 => compare,
            _ => self.price,
        }
    }
}

/// New price for one variant and how it was reached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantPricePlan {
    pub variant_id: i64,
    pub sku: Option<String>,
    pub original_price: i64,
    pub discounted_price: i64,
    pub final_price: i64,
    /// Discounted price is above the markdown threshold, toggle or not.
    pub high_price: bool,
    pub markdown_applied: bool,
}

/// Plans the discounted price of a variant.
#[must_use]
pub fn plan_variant_price(
    variant: &VariantPrices,
    storefront_discount_pct: i32,
    markdown: &HighPriceMarkdown,
) -> VariantPricePlan {
    let original_price = variant.base_price();
    let discounted_price = apply_percent_off(original_price, i64::from(storefront_discount_pct));
    let (final_price, markdown_applied) = markdown.apply(discounted_price);

    VariantPricePlan {
        variant_id: variant.variant_id,
        sku: variant.sku.clone(),
        original_price,
        discounted_price,
        final_price,
        high_price: markdown.exceeds_threshold(discounted_price),
        markdown_applied,
    }
}

/// Price that undoes a discount, or `None` when the variant has no positive
/// reference price to go back to.
#[must_use]
pub fn plan_restore_price(variant: &VariantPrices) -> Option<i64> {
    let base = variant.base_price();
    (base > 0).then_some(base)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn variant(price: i64, compare_at_price: Option<i64>) -> VariantPrices {
        VariantPrices {
            variant_id: 42,
            sku: Some("ZO-76D4-BLK-M".to_owned()),
            price,
            compare_at_price,
        }
    }

    // -----------------------------------------------------------------------
    // to_storefront_discount
    // -----------------------------------------------------------------------

    #[test]
    fn storefront_discount_undercuts_by_five_points() {
        assert_eq!(to_storefront_discount(30), 25);
        assert_eq!(to_storefront_discount(6), 1);
        assert_eq!(to_storefront_discount(100), 95);
    }

    #[test]
    fn storefront_discount_at_or_below_five_is_kept() {
        assert_eq!(to_storefront_discount(5), 5);
        assert_eq!(to_storefront_discount(3), 3);
        assert_eq!(to_storefront_discount(0), 0);
    }

    #[test]
    fn storefront_discount_floors_negative_input() {
        assert_eq!(to_storefront_discount(-4), 0);
    }

    #[test]
    fn storefront_discount_is_never_negative_on_valid_range() {
        for pct in 0..=100 {
            let out = to_storefront_discount(pct);
            assert!(out >= 0, "{pct} -> {out}");
            assert!(out <= pct);
        }
    }

    // -----------------------------------------------------------------------
    // HighPriceMarkdown
    // -----------------------------------------------------------------------

    #[test]
    fn markdown_applies_above_threshold_when_enabled() {
        let markdown = HighPriceMarkdown::default().with_enabled(true);
        assert_eq!(markdown.apply(6000), (5100, true));
    }

    #[test]
    fn markdown_skipped_when_disabled() {
        let markdown = HighPriceMarkdown::default();
        assert_eq!(markdown.apply(6000), (6000, false));
    }

    #[test]
    fn markdown_threshold_is_exclusive() {
        let markdown = HighPriceMarkdown::default().with_enabled(true);
        assert_eq!(markdown.apply(5000), (5000, false));
        assert_eq!(markdown.apply(5001), (4251, true));
    }

    #[test]
    fn markdown_respects_custom_settings() {
        let markdown = HighPriceMarkdown {
            enabled: true,
            threshold: 10_000,
            percent: 10,
        };
        assert_eq!(markdown.apply(9000), (9000, false));
        assert_eq!(markdown.apply(12_345), (11_111, true));
    }

    // -----------------------------------------------------------------------
    // plan_variant_price
    // -----------------------------------------------------------------------

    #[test]
    fn plan_uses_compare_at_price_as_base() {
        let plan = plan_variant_price(&variant(7000, Some(8000)), 25, &HighPriceMarkdown::default());
        assert_eq!(plan.original_price, 8000);
        assert_eq!(plan.discounted_price, 6000);
        assert_eq!(plan.final_price, 6000);
        assert!(plan.high_price);
        assert!(!plan.markdown_applied);
    }

    #[test]
    fn plan_applies_markdown_on_top_of_discount() {
        let markdown = HighPriceMarkdown::default().with_enabled(true);
        let plan = plan_variant_price(&variant(7000, Some(8000)), 25, &markdown);
        assert_eq!(plan.discounted_price, 6000);
        assert_eq!(plan.final_price, 5100);
        assert!(plan.markdown_applied);
    }

    #[test]
    fn plan_falls_back_to_price_without_compare_at() {
        let plan = plan_variant_price(&variant(1990, None), 25, &HighPriceMarkdown::default());
        assert_eq!(plan.original_price, 1990);
        assert_eq!(plan.discounted_price, 1493);
    }

    #[test]
    fn plan_ignores_zero_compare_at() {
        let plan = plan_variant_price(&variant(3000, Some(0)), 10, &HighPriceMarkdown::default());
        assert_eq!(plan.original_price, 3000);
        assert_eq!(plan.final_price, 2700);
    }

    #[test]
    fn plan_with_zero_discount_keeps_base_price() {
        let plan = plan_variant_price(&variant(2500, Some(3000)), 0, &HighPriceMarkdown::default());
        assert_eq!(plan.final_price, 3000);
    }

    // -----------------------------------------------------------------------
    // plan_restore_price
    // -----------------------------------------------------------------------

    #[test]
    fn restore_prefers_compare_at() {
        assert_eq!(plan_restore_price(&variant(1500, Some(2000))), Some(2000));
    }

    #[test]
    fn restore_uses_price_when_no_compare_at() {
        assert_eq!(plan_restore_price(&variant(1500, None)), Some(1500));
    }

    #[test]
    fn restore_skips_variants_without_positive_price() {
        assert_eq!(plan_restore_price(&variant(0, None)), None);
    }
}
