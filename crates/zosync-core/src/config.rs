use std::path::PathBuf;
use std::str::FromStr;

use crate::app_config::AppConfig;
use crate::discount::HighPriceMarkdown;
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so it can be tested with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let store_api_base = require("EASYSTORE_API_BASE")?
        .trim_end_matches('/')
        .to_string();
    if !(store_api_base.starts_with("http://") || store_api_base.starts_with("https://")) {
        return Err(ConfigError::InvalidEnvVar {
            var: "EASYSTORE_API_BASE".to_string(),
            reason: format!("expected an http(s) URL, got \"{store_api_base}\""),
        });
    }
    let store_access_token = require("EASYSTORE_ACCESS_TOKEN")?;

    let log_level = or_default("ZOSYNC_LOG_LEVEL", "info");
    let mapping_path = PathBuf::from(or_default(
        "ZOSYNC_MAPPING_PATH",
        "./sku_variant_mapping.csv",
    ));
    let urls_path = PathBuf::from(or_default("ZOSYNC_URLS_PATH", "./zozo_tracked_urls.txt"));

    let request_timeout_secs: u64 =
        parse_var(&or_default("ZOSYNC_REQUEST_TIMEOUT_SECS", "30"), "ZOSYNC_REQUEST_TIMEOUT_SECS")?;
    let user_agent = or_default("ZOSYNC_USER_AGENT", "zosync/0.1 (discount-sync)");
    let max_retries: u32 = parse_var(&or_default("ZOSYNC_MAX_RETRIES", "3"), "ZOSYNC_MAX_RETRIES")?;
    let retry_backoff_base_secs: u64 = parse_var(
        &or_default("ZOSYNC_RETRY_BACKOFF_BASE_SECS", "5"),
        "ZOSYNC_RETRY_BACKOFF_BASE_SECS",
    )?;
    let inter_request_delay_ms: u64 = parse_var(
        &or_default("ZOSYNC_INTER_REQUEST_DELAY_MS", "1000"),
        "ZOSYNC_INTER_REQUEST_DELAY_MS",
    )?;
    let min_page_bytes: usize =
        parse_var(&or_default("ZOSYNC_MIN_PAGE_BYTES", "1000"), "ZOSYNC_MIN_PAGE_BYTES")?;

    let markdown_defaults = HighPriceMarkdown::default();
    let high_price_markdown = HighPriceMarkdown {
        enabled: parse_bool(
            &or_default("ZOSYNC_HIGH_PRICE_MARKDOWN", "false"),
            "ZOSYNC_HIGH_PRICE_MARKDOWN",
        )?,
        threshold: parse_var(
            &or_default(
                "ZOSYNC_HIGH_PRICE_THRESHOLD",
                &markdown_defaults.threshold.to_string(),
            ),
            "ZOSYNC_HIGH_PRICE_THRESHOLD",
        )?,
        percent: parse_percent(
            &or_default(
                "ZOSYNC_HIGH_PRICE_MARKDOWN_PCT",
                &markdown_defaults.percent.to_string(),
            ),
            "ZOSYNC_HIGH_PRICE_MARKDOWN_PCT",
        )?,
    };

    let retry_rounds: u32 = parse_var(&or_default("ZOSYNC_RETRY_ROUNDS", "3"), "ZOSYNC_RETRY_ROUNDS")?;
    let retry_delay_secs: u64 =
        parse_var(&or_default("ZOSYNC_RETRY_DELAY_SECS", "5"), "ZOSYNC_RETRY_DELAY_SECS")?;

    Ok(AppConfig {
        store_api_base,
        store_access_token,
        log_level,
        mapping_path,
        urls_path,
        request_timeout_secs,
        user_agent,
        max_retries,
        retry_backoff_base_secs,
        inter_request_delay_ms,
        min_page_bytes,
        high_price_markdown,
        retry_rounds,
        retry_delay_secs,
    })
}

fn parse_var<T>(raw: &str, var: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim().parse::<T>().map_err(|e| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason: e.to_string(),
    })
}

/// Accepts `1/0`, `true/false`, `yes/no`, `on/off` (case-insensitive).
fn parse_bool(raw: &str, var: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => Err(ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: format!("expected a boolean, got \"{other}\""),
        }),
    }
}

fn parse_percent(raw: &str, var: &str) -> Result<u32, ConfigError> {
    let value: u32 = parse_var(raw, var)?;
    if value > 100 {
        return Err(ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: format!("percentage must be between 0 and 100, got {value}"),
        });
    }
    Ok(value)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
