use std::path::PathBuf;

use crate::discount::HighPriceMarkdown;

#[derive(Clone)]
pub struct AppConfig {
    pub store_api_base: String,
    pub store_access_token: String,
    pub log_level: String,
    pub mapping_path: PathBuf,
    pub urls_path: PathBuf,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub max_retries: u32,
    pub retry_backoff_base_secs: u64,
    pub inter_request_delay_ms: u64,
    pub min_page_bytes: usize,
    pub high_price_markdown: HighPriceMarkdown,
    pub retry_rounds: u32,
    pub retry_delay_secs: u64,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("store_api_base", &self.store_api_base)
            .field("store_access_token", &"[redacted]")
            .field("log_level", &self.log_level)
            .field("mapping_path", &self.mapping_path)
            .field("urls_path", &self.urls_path)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("max_retries", &self.max_retries)
            .field("retry_backoff_base_secs", &self.retry_backoff_base_secs)
            .field("inter_request_delay_ms", &self.inter_request_delay_ms)
            .field("min_page_bytes", &self.min_page_bytes)
            .field("high_price_markdown", &self.high_price_markdown)
            .field("retry_rounds", &self.retry_rounds)
            .field("retry_delay_secs", &self.retry_delay_secs)
            .finish()
    }
}
