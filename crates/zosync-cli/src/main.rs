mod catalog;
mod sync;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use zosync_core::AppConfig;

#[derive(Debug, Parser)]
#[command(name = "zosync")]
#[command(about = "Mirror source-site discounts onto EasyStore variant prices")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Export the published storefront catalog as the SKU mapping CSV.
    ExportMapping {
        /// Output path; defaults to the configured mapping path.
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Print the catalog SKU derived for a product URL.
    Sku {
        #[arg(long)]
        url: String,
        /// Source color label; the default variant is used when omitted.
        #[arg(long, requires = "size")]
        color: Option<String>,
        #[arg(long, requires = "color")]
        size: Option<String>,
    },
    /// Validate product URLs and check their default SKU against the mapping.
    CheckUrls {
        #[arg(long)]
        urls_file: Option<PathBuf>,
        /// Rewrite the URL file keeping only valid, distinct URLs.
        #[arg(long, conflicts_with = "urls")]
        prune: bool,
        urls: Vec<String>,
    },
    /// Sync source discounts to the storefront.
    Sync {
        #[arg(long)]
        urls_file: Option<PathBuf>,
        /// Take an extra markdown off high-priced items.
        #[arg(long)]
        high_price_markdown: bool,
        #[arg(long)]
        dry_run: bool,
        /// Write a CSV run report to this path.
        #[arg(long)]
        report: Option<PathBuf>,
        urls: Vec<String>,
    },
    /// Put storefront variants back to their original prices.
    Restore {
        #[arg(long)]
        urls_file: Option<PathBuf>,
        #[arg(long)]
        dry_run: bool,
        #[arg(long)]
        report: Option<PathBuf>,
        urls: Vec<String>,
    },
}

fn init_tracing(log_level: &str) -> anyhow::Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(log_level))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();
    Ok(())
}

/// Loads configuration and starts logging at its level.
fn load_config() -> anyhow::Result<AppConfig> {
    let config = zosync_core::load_app_config().context("failed to load configuration")?;
    init_tracing(&config.log_level)?;
    tracing::debug!(?config, "configuration loaded");
    Ok(config)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Sku { url, color, size } => {
            init_tracing("warn")?;
            println!(
                "{}",
                catalog::derive_cli_sku(&url, color.as_deref(), size.as_deref())
            );
            Ok(())
        }
        Commands::ExportMapping { output } => {
            let config = load_config()?;
            catalog::run_export_mapping(&config, output.as_deref()).await
        }
        Commands::CheckUrls {
            urls_file,
            prune,
            urls,
        } => {
            let config = load_config()?;
            catalog::run_check_urls(&config, urls_file.as_deref(), urls, prune)
        }
        Commands::Sync {
            urls_file,
            high_price_markdown,
            dry_run,
            report,
            urls,
        } => {
            let config = load_config()?;
            let request = sync::RunRequest {
                urls_file,
                urls,
                dry_run,
                report,
            };
            sync::run_sync(&config, request, high_price_markdown).await
        }
        Commands::Restore {
            urls_file,
            dry_run,
            report,
            urls,
        } => {
            let config = load_config()?;
            let request = sync::RunRequest {
                urls_file,
                urls,
                dry_run,
                report,
            };
            sync::run_restore(&config, request).await
        }
    }
}
