use serde::{Deserialize, Serialize};

use crate::sku::{derive_sku, extract_product_id};

/// One selectable (size, color) combination advertised on a source page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockRow {
    pub size: String,
    /// Raw source-site color label, e.g. `"ブラック"`.
    pub color: String,
    /// Availability label as shown on the page, e.g. `"在庫あり"`.
    pub availability: String,
}

impl StockRow {
    #[must_use]
    pub fn new(size: &str, color: &str, availability: &str) -> Self {
        Self {
            size: size.to_owned(),
            color: color.to_owned(),
            availability: availability.to_owned(),
        }
    }
}

/// Pricing and variant data scraped from one source product page.
///
/// Built fresh per fetch and discarded after the sync attempt.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceProductSnapshot {
    pub url: String,
    pub name: String,
    pub brand: Option<String>,
    /// Regular price in yen.
    pub original_price: i64,
    /// Current (discounted) price in yen.
    pub discounted_price: i64,
    /// Advertised discount, 0 to 100.
    pub discount_percentage: i32,
    /// `YYYY-MM-DD HH:MM`, when the page advertises an end time.
    pub discount_deadline: Option<String>,
    /// Stock rows in markup order.
    pub stock_rows: Vec<StockRow>,
}

impl SourceProductSnapshot {
    /// Product id parsed from the snapshot URL (`"UNKNOWN"` if absent).
    #[must_use]
    pub fn product_id(&self) -> String {
        extract_product_id(&self.url)
    }

    /// One derived SKU per stock row, in stock-row order.
    #[must_use]
    pub fn derived_skus(&self) -> Vec<String> {
        let product_id = self.product_id();
        self.stock_rows
            .iter()
            .map(|row| derive_sku(&product_id, &row.color, &row.size))
            .collect()
    }

    /// SKU of the first stock row, the most likely catalog match.
    #[must_use]
    pub fn primary_sku(&self) -> Option<String> {
        self.stock_rows
            .first()
            .map(|row| derive_sku(&self.product_id(), &row.color, &row.size))
    }

    /// Candidate SKUs in resolution order: the primary SKU first, then every
    /// other stock-row SKU in discovery order, without duplicates. Each row
    /// is derived once.
    #[must_use]
    pub fn candidate_skus(&self) -> Vec<String> {
        let mut candidates: Vec<String> = Vec::with_capacity(self.stock_rows.len());
        for sku in self.derived_skus() {
            if !candidates.contains(&sku) {
                candidates.push(sku);
            }
        }
        candidates
    }
}

/// Pulls the first integer out of a discount label such as `"30%OFF"`.
///
/// Returns `0` when the label has no digits or the number is out of range.
#[must_use]
pub fn parse_discount_percentage(label: &str) -> i32 {
    let digits: String = label
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(char::is_ascii_digit)
        .collect();
    digits.parse().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(rows: Vec<StockRow>) -> SourceProductSnapshot {
        SourceProductSnapshot {
            url: "https://zozo.jp/shop/mono-mart/goods/74917621/?did=1".to_owned(),
            name: "ヘビーウェイトTシャツ".to_owned(),
            original_price: 2990,
            discounted_price: 2093,
            discount_percentage: 30,
            stock_rows: rows,
            ..SourceProductSnapshot::default()
        }
    }

    #[test]
    fn derived_skus_follow_stock_row_order() {
        let snap = snapshot(vec![
            StockRow::new("M", "ブラック", "在庫あり"),
            StockRow::new("S", "ホワイト", "在庫なし"),
        ]);
        assert_eq!(
            snap.derived_skus(),
            vec!["ZO-76D4-BLK-M".to_owned(), "ZO-C9C1-WHT-S".to_owned()]
        );
    }

    #[test]
    fn primary_sku_is_first_row() {
        let snap = snapshot(vec![
            StockRow::new("S", "ホワイト", "在庫なし"),
            StockRow::new("M", "ブラック", "在庫あり"),
        ]);
        assert_eq!(snap.primary_sku().as_deref(), Some("ZO-C9C1-WHT-S"));
    }

    #[test]
    fn primary_sku_absent_without_rows() {
        assert!(snapshot(vec![]).primary_sku().is_none());
        assert!(snapshot(vec![]).candidate_skus().is_empty());
    }

    #[test]
    fn candidate_skus_are_deduplicated() {
        let snap = snapshot(vec![
            StockRow::new("M", "ブラック", "在庫あり"),
            StockRow::new(" M", "ブラック", "残りわずか"),
            StockRow::new("S", "ホワイト", "在庫なし"),
        ]);
        assert_eq!(
            snap.candidate_skus(),
            vec!["ZO-76D4-BLK-M".to_owned(), "ZO-C9C1-WHT-S".to_owned()]
        );
    }

    #[test]
    fn candidate_skus_start_with_primary_for_unmapped_colors() {
        let snap = snapshot(vec![
            StockRow::new("M", "未知色", "在庫あり"),
            StockRow::new("L", "ブラック", "在庫あり"),
        ]);
        let candidates = snap.candidate_skus();
        assert_eq!(candidates.len(), 2);
        assert_eq!(Some(&candidates[0]), snap.primary_sku().as_ref());
        assert_eq!(candidates[0], "ZO-1882-UNK-M");
    }

    #[test]
    fn parse_discount_percentage_reads_first_number() {
        assert_eq!(parse_discount_percentage("30%"), 30);
        assert_eq!(parse_discount_percentage("最大45%OFF"), 45);
        assert_eq!(parse_discount_percentage(""), 0);
        assert_eq!(parse_discount_percentage("OFF"), 0);
    }
}
