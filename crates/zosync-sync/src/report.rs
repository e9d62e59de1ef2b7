//! CSV run report: one row per product.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::Serialize;

use crate::error::SyncError;
use crate::outcome::{RunOutcome, SyncRun};

#[derive(Debug, Serialize)]
struct ReportRow<'a> {
    run_id: String,
    url: &'a str,
    status: &'static str,
    attempts: u32,
    matched_sku: Option<&'a str>,
    product_id: Option<i64>,
    variants: Option<usize>,
    source_discount: Option<i32>,
    storefront_discount: Option<i32>,
    original_price: Option<i64>,
    final_price: Option<i64>,
    high_price: Option<bool>,
    markdown_applied: Option<bool>,
    discount_deadline: Option<String>,
    source_stock: Option<u32>,
    dry_run: bool,
    error: Option<String>,
}

/// Writes `run` as CSV with a header row.
///
/// # Errors
///
/// Returns [`SyncError::Csv`] on serialization or I/O failure.
pub fn write_report<W: Write, T: RunOutcome>(writer: W, run: &SyncRun<T>) -> Result<(), SyncError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    let run_id = run.run_id.to_string();

    for result in &run.results {
        let mut row = ReportRow {
            run_id: run_id.clone(),
            url: &result.url,
            status: "failed",
            attempts: result.attempts,
            matched_sku: None,
            product_id: None,
            variants: None,
            source_discount: None,
            storefront_discount: None,
            original_price: None,
            final_price: None,
            high_price: None,
            markdown_applied: None,
            discount_deadline: None,
            source_stock: None,
            dry_run: run.dry_run,
            error: None,
        };

        match &result.outcome {
            Ok(outcome) => {
                row.status = "ok";
                row.matched_sku = Some(outcome.matched_sku());
                row.product_id = Some(outcome.product_id());
                row.variants = Some(outcome.variant_count());
                if let Some(pricing) = outcome.pricing() {
                    row.source_discount = Some(pricing.source_discount);
                    row.storefront_discount = Some(pricing.storefront_discount);
                    row.original_price = Some(pricing.original_price);
                    row.final_price = Some(pricing.final_price);
                    row.high_price = Some(pricing.high_price);
                    row.markdown_applied = Some(pricing.markdown_applied);
                    row.discount_deadline = pricing.discount_deadline;
                    row.source_stock = Some(pricing.source_stock);
                }
            }
            Err(err) => row.error = Some(err.to_string()),
        }

        csv_writer.serialize(&row)?;
    }

    csv_writer.flush().map_err(csv::Error::from)?;
    Ok(())
}

/// Writes the report for `run` to `path`.
///
/// # Errors
///
/// Returns [`SyncError::Io`] if the file cannot be created, or any error
/// from [`write_report`].
pub fn save_report<T: RunOutcome>(path: &Path, run: &SyncRun<T>) -> Result<(), SyncError> {
    let file = File::create(path).map_err(|source| SyncError::Io {
        path: path.display().to_string(),
        source,
    })?;
    write_report(BufWriter::new(file), run)?;
    tracing::info!(path = %path.display(), rows = run.results.len(), "wrote run report");
    Ok(())
}
