//! Catalog-side command handlers: mapping export, SKU lookup, URL checks.

use std::path::Path;

use anyhow::Context;
use zosync_core::{
    derive_sku_for_url, extract_product_id, load_catalog_snapshot, quick_sku, AppConfig,
    MappingIndex,
};
use zosync_scraper::is_valid_source_url;
use zosync_storefront::{export_mapping, StorefrontClient};
use zosync_sync::save_tracked_urls;

use crate::sync::gather_urls;

/// SKU for `url`, using the default variant unless both labels are given.
pub(crate) fn derive_cli_sku(url: &str, color: Option<&str>, size: Option<&str>) -> String {
    match (color, size) {
        (Some(color), Some(size)) => derive_sku_for_url(url, color, size),
        _ => quick_sku(url),
    }
}

pub(crate) fn build_storefront_client(config: &AppConfig) -> anyhow::Result<StorefrontClient> {
    StorefrontClient::new(
        &config.store_api_base,
        &config.store_access_token,
        config.request_timeout_secs,
        &config.user_agent,
        config.max_retries,
        config.retry_backoff_base_secs,
    )
    .context("failed to build storefront client")
}

/// Exports every published storefront variant to the mapping CSV.
///
/// # Errors
///
/// Returns an error if the catalog cannot be fetched or written, or has no
/// published variants.
pub(crate) async fn run_export_mapping(
    config: &AppConfig,
    output: Option<&Path>,
) -> anyhow::Result<()> {
    let path = output.unwrap_or(&config.mapping_path);
    let client = build_storefront_client(config)?;

    let count = export_mapping(&client, path, config.inter_request_delay_ms)
        .await
        .with_context(|| format!("failed to export mapping to {}", path.display()))?;

    println!("exported {count} variants to {}", path.display());
    Ok(())
}

/// Rewrites the URL file at `path` with the valid URLs of `urls`, in order.
/// Returns how many were kept.
pub(crate) fn prune_url_file(path: &Path, urls: &[String]) -> anyhow::Result<usize> {
    let kept: Vec<String> = urls
        .iter()
        .filter(|url| is_valid_source_url(url))
        .cloned()
        .collect();
    save_tracked_urls(path, &kept)
        .with_context(|| format!("failed to write tracked URLs to {}", path.display()))?;
    Ok(kept.len())
}

/// Reports which URLs are valid product URLs and whether their default SKU
/// is in the mapping. With `prune`, the URL file is rewritten without the
/// invalid ones.
///
/// # Errors
///
/// Returns an error only if the URL list file cannot be read or rewritten.
pub(crate) fn run_check_urls(
    config: &AppConfig,
    urls_file: Option<&Path>,
    urls: Vec<String>,
    prune: bool,
) -> anyhow::Result<()> {
    let urls = gather_urls(config, urls_file, urls)?;
    if urls.is_empty() {
        println!("no URLs to check");
        return Ok(());
    }

    let index = match load_catalog_snapshot(&config.mapping_path) {
        Ok(records) => Some(MappingIndex::build(&records)),
        Err(e) => {
            tracing::warn!(
                path = %config.mapping_path.display(),
                error = %e,
                "mapping unavailable, skipping SKU lookups"
            );
            None
        }
    };

    let mut invalid = 0usize;
    for url in &urls {
        if !is_valid_source_url(url) {
            invalid += 1;
            println!("INVALID  {url}");
            continue;
        }
        let sku = quick_sku(url);
        let mapped = match &index {
            Some(index) if index.lookup(&sku).is_some() => "mapped",
            Some(_) => "unmapped",
            None => "unknown",
        };
        println!(
            "OK       {url}  product={} sku={sku} {mapped}",
            extract_product_id(url)
        );
    }

    println!("{} URLs checked, {invalid} invalid", urls.len());

    if prune {
        let path = urls_file.unwrap_or(&config.urls_path);
        let kept = prune_url_file(path, &urls)?;
        println!("kept {kept} of {} URLs in {}", urls.len(), path.display());
    }
    Ok(())
}
