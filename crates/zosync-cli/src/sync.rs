//! Sync and restore command handlers.
//!
//! Per-product failures end up in the printed summary and the report; only
//! problems that stop the whole run (unreadable mapping or URL list, client
//! construction) are returned as errors.

use std::path::{Path, PathBuf};

use anyhow::Context;
use zosync_core::{load_catalog_snapshot, AppConfig, MappingIndex};
use zosync_scraper::{is_valid_source_url, SourceClient};
use zosync_storefront::StorefrontClient;
use zosync_sync::{
    load_tracked_urls, save_report, DiscountSyncer, RunOutcome, SyncOptions, SyncRun, SyncSummary,
};

use crate::catalog::build_storefront_client;

/// Arguments shared by `sync` and `restore`.
#[derive(Debug)]
pub(crate) struct RunRequest {
    pub urls_file: Option<PathBuf>,
    pub urls: Vec<String>,
    pub dry_run: bool,
    pub report: Option<PathBuf>,
}

/// URLs given on the command line, or else the tracked URL file.
pub(crate) fn gather_urls(
    config: &AppConfig,
    urls_file: Option<&Path>,
    urls: Vec<String>,
) -> anyhow::Result<Vec<String>> {
    if !urls.is_empty() {
        return Ok(urls);
    }
    let path = urls_file.unwrap_or(&config.urls_path);
    load_tracked_urls(path)
        .with_context(|| format!("failed to read tracked URLs from {}", path.display()))
}

/// Drops URLs that are not source product pages, logging each one.
pub(crate) fn valid_urls(urls: Vec<String>) -> Vec<String> {
    urls.into_iter()
        .filter(|url| {
            if is_valid_source_url(url) {
                true
            } else {
                tracing::warn!(url = %url, "skipping invalid product URL");
                false
            }
        })
        .collect()
}

fn load_index(config: &AppConfig) -> anyhow::Result<MappingIndex> {
    let records = load_catalog_snapshot(&config.mapping_path).with_context(|| {
        format!(
            "failed to load SKU mapping from {}",
            config.mapping_path.display()
        )
    })?;
    let index = MappingIndex::build(&records);
    if index.is_empty() {
        anyhow::bail!(
            "SKU mapping {} has no usable rows; run export-mapping first",
            config.mapping_path.display()
        );
    }
    tracing::info!(skus = index.len(), "loaded SKU mapping");
    Ok(index)
}

fn build_syncer(
    config: &AppConfig,
    options: SyncOptions,
) -> anyhow::Result<DiscountSyncer<SourceClient, StorefrontClient>> {
    let index = load_index(config)?;
    let source = SourceClient::new(
        config.request_timeout_secs,
        &config.user_agent,
        config.max_retries,
        config.retry_backoff_base_secs,
        config.min_page_bytes,
    )
    .context("failed to build source client")?;
    let storefront = build_storefront_client(config)?;
    Ok(DiscountSyncer::new(source, storefront, index, options))
}

fn finish_run<T: RunOutcome>(run: &SyncRun<T>, report: Option<&Path>) -> anyhow::Result<()> {
    let summary = SyncSummary::from_results(&run.results);
    if run.dry_run {
        println!("dry run: no prices were changed");
    }
    print!("{summary}");

    if let Some(path) = report {
        save_report(path, run)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        println!("report written to {}", path.display());
    }
    Ok(())
}

/// Syncs source discounts for every requested URL.
///
/// # Errors
///
/// Returns an error for run-level failures only.
pub(crate) async fn run_sync(
    config: &AppConfig,
    request: RunRequest,
    high_price_markdown: bool,
) -> anyhow::Result<()> {
    let urls = valid_urls(gather_urls(
        config,
        request.urls_file.as_deref(),
        request.urls,
    )?);
    if urls.is_empty() {
        println!("no valid product URLs to sync");
        return Ok(());
    }

    let mut options = SyncOptions::from_config(config);
    options.dry_run = request.dry_run;
    if high_price_markdown {
        options.markdown = options.markdown.with_enabled(true);
    }

    let syncer = build_syncer(config, options)?;
    let run = syncer.sync_all(&urls).await;
    finish_run(&run, request.report.as_deref())
}

/// Restores original prices for every requested URL.
///
/// # Errors
///
/// Returns an error for run-level failures only.
pub(crate) async fn run_restore(config: &AppConfig, request: RunRequest) -> anyhow::Result<()> {
    let urls = valid_urls(gather_urls(
        config,
        request.urls_file.as_deref(),
        request.urls,
    )?);
    if urls.is_empty() {
        println!("no valid product URLs to restore");
        return Ok(());
    }

    let mut options = SyncOptions::from_config(config);
    options.dry_run = request.dry_run;

    let syncer = build_syncer(config, options)?;
    let run = syncer.restore_all(&urls).await;
    finish_run(&run, request.report.as_deref())
}
