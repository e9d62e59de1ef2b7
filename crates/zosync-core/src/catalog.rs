//! Catalog snapshot file: one row per storefront variant.
//!
//! CSV with a header row. Required columns are `Variant ID`, `SKU` and
//! `product_id`; `title`, `price` and `compare_at_price` are optional and
//! any other column is ignored. Price cells that do not parse are read as
//! absent. Rows whose ids do not parse are skipped with a warning.

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::price::coerce_amount;
use crate::CoreError;

/// One storefront variant as exported from the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogVariantRecord {
    #[serde(rename = "Variant ID")]
    pub variant_id: i64,
    #[serde(rename = "SKU")]
    pub sku: String,
    pub product_id: i64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub price: Option<i64>,
    #[serde(default)]
    pub compare_at_price: Option<i64>,
}

/// Row shape used for lenient parsing; every cell is read as text first.
#[derive(Debug, Deserialize)]
struct RawCatalogRow {
    #[serde(rename = "Variant ID", default)]
    variant_id: Option<String>,
    #[serde(rename = "SKU", default)]
    sku: Option<String>,
    #[serde(default)]
    product_id: Option<String>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    price: Option<String>,
    #[serde(default)]
    compare_at_price: Option<String>,
}

/// Reads catalog records from any CSV source.
///
/// # Errors
///
/// Returns [`CoreError::Csv`] if the input is not readable CSV (bad header,
/// I/O failure, invalid UTF-8). Individual rows with unusable ids are skipped.
pub fn read_catalog<R: Read>(reader: R) -> Result<Vec<CatalogVariantRecord>, CoreError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let mut records = Vec::new();
    for (idx, row) in csv_reader.deserialize::<RawCatalogRow>().enumerate() {
        let row = row?;
        // Header is line 1.
        let line = idx + 2;

        let ids = row
            .variant_id
            .as_deref()
            .and_then(coerce_amount)
            .zip(row.product_id.as_deref().and_then(coerce_amount));
        let Some((variant_id, product_id)) = ids else {
            tracing::warn!(line, sku = ?row.sku, "skipping catalog row with unusable ids");
            continue;
        };

        records.push(CatalogVariantRecord {
            variant_id,
            sku: row.sku.unwrap_or_default().trim().to_owned(),
            product_id,
            title: row.title.filter(|t| !t.is_empty()),
            price: row.price.as_deref().and_then(coerce_amount),
            compare_at_price: row.compare_at_price.as_deref().and_then(coerce_amount),
        });
    }

    Ok(records)
}

/// Loads the catalog snapshot file at `path`.
///
/// # Errors
///
/// Returns [`CoreError::Io`] if the file cannot be opened, or any error from
/// [`read_catalog`].
pub fn load_catalog_snapshot(path: &Path) -> Result<Vec<CatalogVariantRecord>, CoreError> {
    let file = File::open(path).map_err(|source| CoreError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let records = read_catalog(file)?;
    tracing::info!(path = %path.display(), records = records.len(), "loaded catalog snapshot");
    Ok(records)
}

/// Writes catalog records as CSV with a header row.
///
/// # Errors
///
/// Returns [`CoreError::Csv`] on serialization or I/O failure.
pub fn write_catalog<W: Write>(
    writer: W,
    records: &[CatalogVariantRecord],
) -> Result<(), CoreError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for record in records {
        csv_writer.serialize(record)?;
    }
    csv_writer.flush().map_err(csv::Error::from)?;
    Ok(())
}
