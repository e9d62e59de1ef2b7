//! SKU → storefront variant index.
//!
//! Built once per run from the catalog snapshot and read-only afterwards, so
//! a shared reference can be used from any number of tasks.

use std::collections::HashMap;

use serde::Serialize;
use thiserror::Error;

use crate::catalog::CatalogVariantRecord;
use crate::snapshot::SourceProductSnapshot;

/// Storefront identifiers a SKU resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct VariantTarget {
    pub product_id: i64,
    pub variant_id: i64,
}

/// A successful resolution: the candidate SKU that hit and its target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkuMatch {
    pub sku: String,
    pub target: VariantTarget,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MatchError {
    #[error("no catalog SKU matches any of {} candidate(s): {}", .tried.len(), .tried.join(", "))]
    MatchNotFound { tried: Vec<String> },
}

#[derive(Debug, Clone, Default)]
pub struct MappingIndex {
    entries: HashMap<String, VariantTarget>,
}

impl MappingIndex {
    /// Builds the index keyed by trimmed SKU.
    ///
    /// Records with an empty SKU are skipped. When two records share a SKU the
    /// later one wins.
    #[must_use]
    pub fn build(records: &[CatalogVariantRecord]) -> Self {
        let mut entries = HashMap::with_capacity(records.len());
        for record in records {
            let sku = record.sku.trim();
            if sku.is_empty() {
                continue;
            }
            entries.insert(
                sku.to_owned(),
                VariantTarget {
                    product_id: record.product_id,
                    variant_id: record.variant_id,
                },
            );
        }
        Self { entries }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Exact, case-sensitive lookup of a whitespace-trimmed SKU.
    #[must_use]
    pub fn lookup(&self, sku: &str) -> Option<VariantTarget> {
        self.entries.get(sku.trim()).copied()
    }

    /// Tries `candidates` in order and returns the first hit.
    ///
    /// # Errors
    ///
    /// Returns [`MatchError::MatchNotFound`] listing every candidate tried.
    pub fn resolve<I, S>(&self, candidates: I) -> Result<SkuMatch, MatchError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut tried: Vec<String> = Vec::new();
        for candidate in candidates {
            let sku = candidate.as_ref().trim();
            if tried.iter().any(|t| t == sku) {
                continue;
            }
            if let Some(target) = self.lookup(sku) {
                tracing::debug!(sku, ?target, attempts = tried.len() + 1, "SKU matched");
                return Ok(SkuMatch {
                    sku: sku.to_owned(),
                    target,
                });
            }
            tried.push(sku.to_owned());
        }

        tracing::warn!(
            tried = tried.len(),
            sample = ?tried.iter().take(5).collect::<Vec<_>>(),
            "no catalog SKU matched"
        );
        Err(MatchError::MatchNotFound { tried })
    }

    /// Resolves a source snapshot: primary SKU first, then each stock-row SKU.
    ///
    /// # Errors
    ///
    /// Returns [`MatchError::MatchNotFound`] when no candidate is indexed.
    pub fn resolve_snapshot(&self, snapshot: &SourceProductSnapshot) -> Result<SkuMatch, MatchError> {
        self.resolve(snapshot.candidate_skus())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::StockRow;

    fn record(sku: &str, product_id: i64, variant_id: i64) -> CatalogVariantRecord {
        CatalogVariantRecord {
            variant_id,
            sku: sku.to_owned(),
            product_id,
            title: None,
            price: None,
            compare_at_price: None,
        }
    }

    fn snapshot(rows: Vec<StockRow>) -> SourceProductSnapshot {
        SourceProductSnapshot {
            url: "https://zozo.jp/shop/mono-mart/goods/74917621/".to_owned(),
            stock_rows: rows,
            ..SourceProductSnapshot::default()
        }
    }

    #[test]
    fn lookup_trims_query_and_keys() {
        let index = MappingIndex::build(&[record("  ZO-76D4-BLK-M ", 1, 10)]);
        let expected = VariantTarget {
            product_id: 1,
            variant_id: 10,
        };
        assert_eq!(index.lookup("ZO-76D4-BLK-M"), Some(expected));
        assert_eq!(index.lookup(" ZO-76D4-BLK-M\n"), Some(expected));
    }

    #[test]
    fn lookup_is_case_sensitive() {
        let index = MappingIndex::build(&[record("ZO-76D4-BLK-M", 1, 10)]);
        assert!(index.lookup("zo-76d4-blk-m").is_none());
    }

    #[test]
    fn build_skips_empty_skus() {
        let index = MappingIndex::build(&[record("", 1, 10), record("   ", 1, 11)]);
        assert!(index.is_empty());
    }

    #[test]
    fn duplicate_sku_last_write_wins() {
        let index = MappingIndex::build(&[
            record("ZO-76D4-BLK-M", 1, 10),
            record("ZO-76D4-BLK-M", 2, 20),
        ]);
        assert_eq!(index.len(), 1);
        assert_eq!(index.lookup("ZO-76D4-BLK-M").unwrap().variant_id, 20);
    }

    #[test]
    fn resolve_snapshot_prefers_primary_sku() {
        // Both the primary (first row) and a later row are indexed.
        let index = MappingIndex::build(&[
            record("ZO-C9C1-WHT-S", 2, 20),
            record("ZO-76D4-BLK-M", 1, 10),
        ]);
        let snap = snapshot(vec![
            StockRow::new("M", "ブラック", "在庫あり"),
            StockRow::new("S", "ホワイト", "在庫あり"),
        ]);
        let hit = index.resolve_snapshot(&snap).unwrap();
        assert_eq!(hit.sku, "ZO-76D4-BLK-M");
        assert_eq!(hit.target.variant_id, 10);
    }

    #[test]
    fn resolve_snapshot_falls_back_to_later_rows() {
        let index = MappingIndex::build(&[record("ZO-C9C1-WHT-S", 2, 20)]);
        let snap = snapshot(vec![
            StockRow::new("M", "ブラック", "在庫あり"),
            StockRow::new("S", "ホワイト", "在庫あり"),
        ]);
        let hit = index.resolve_snapshot(&snap).unwrap();
        assert_eq!(hit.sku, "ZO-C9C1-WHT-S");
        assert_eq!(hit.target.product_id, 2);
    }

    #[test]
    fn resolve_reports_all_tried_candidates() {
        let index = MappingIndex::build(&[record("ZO-0000-BLK-M", 1, 10)]);
        let snap = snapshot(vec![
            StockRow::new("M", "ブラック", "在庫あり"),
            StockRow::new("S", "ホワイト", "在庫あり"),
        ]);
        let err = index.resolve_snapshot(&snap).unwrap_err();
        assert_eq!(
            err,
            MatchError::MatchNotFound {
                tried: vec!["ZO-76D4-BLK-M".to_owned(), "ZO-C9C1-WHT-S".to_owned()],
            }
        );
    }

    #[test]
    fn resolve_with_no_candidates_is_not_found() {
        let index = MappingIndex::build(&[record("ZO-76D4-BLK-M", 1, 10)]);
        let err = index.resolve(Vec::<String>::new()).unwrap_err();
        assert!(matches!(err, MatchError::MatchNotFound { tried } if tried.is_empty()));
    }

    #[test]
    fn index_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<MappingIndex>();
    }
}
