//! HTTP session for source product pages.

use std::time::Duration;

use chrono::Datelike;
use reqwest::Client;
use zosync_core::SourceProductSnapshot;

use crate::error::ScraperError;
use crate::extract::extract_snapshot;
use crate::rate_limit::retry_with_backoff;
use crate::url::host_of;

/// Default minimum body length; anything shorter is a block page or an
/// interrupted transfer rather than a product page.
pub const DEFAULT_MIN_PAGE_BYTES: usize = 1000;

/// Explicit HTTP session for source-site product pages.
///
/// One connection pool for the whole run, released when dropped. Transient
/// errors (429, network failures) are retried with exponential backoff.
pub struct SourceClient {
    client: Client,
    max_retries: u32,
    backoff_base_secs: u64,
    min_page_bytes: usize,
}

impl SourceClient {
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        timeout_secs: u64,
        user_agent: &str,
        max_retries: u32,
        backoff_base_secs: u64,
        min_page_bytes: usize,
    ) -> Result<Self, ScraperError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            client,
            max_retries,
            backoff_base_secs,
            min_page_bytes,
        })
    }

    /// Fetches the markup of one product page.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::RateLimited`]: HTTP 429 after all retries.
    /// - [`ScraperError::NotFound`]: HTTP 404 (not retried).
    /// - [`ScraperError::UnexpectedStatus`]: any other non-2xx status.
    /// - [`ScraperError::IncompletePage`]: body shorter than the minimum.
    /// - [`ScraperError::Http`]: network failure after all retries.
    pub async fn fetch_page(&self, url: &str) -> Result<String, ScraperError> {
        let min_page_bytes = self.min_page_bytes;

        retry_with_backoff(self.max_retries, self.backoff_base_secs, || async move {
            let response = self
                .client
                .get(url)
                .header(
                    reqwest::header::ACCEPT,
                    "text/html,application/xhtml+xml;q=0.9,*/*;q=0.8",
                )
                .header(reqwest::header::ACCEPT_LANGUAGE, "ja,en-US;q=0.8,en;q=0.6")
                .header(reqwest::header::CACHE_CONTROL, "no-cache")
                .send()
                .await?;
            let status = response.status();

            if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                let retry_after_secs = response
                    .headers()
                    .get(reqwest::header::RETRY_AFTER)
                    .and_then(|v| v.to_str().ok())
                    .and_then(|s| s.parse::<u64>().ok())
                    .unwrap_or(60);
                return Err(ScraperError::RateLimited {
                    domain: host_of(url),
                    retry_after_secs,
                });
            }

            if status == reqwest::StatusCode::NOT_FOUND {
                return Err(ScraperError::NotFound {
                    url: url.to_owned(),
                });
            }

            if !status.is_success() {
                return Err(ScraperError::UnexpectedStatus {
                    status: status.as_u16(),
                    url: url.to_owned(),
                });
            }

            let body = response.text().await?;
            if body.len() < min_page_bytes {
                return Err(ScraperError::IncompletePage {
                    url: url.to_owned(),
                    len: body.len(),
                    min: min_page_bytes,
                });
            }
            Ok(body)
        })
        .await
    }

    /// Fetches a product page and extracts its snapshot, completing the
    /// discount deadline with the current local year.
    ///
    /// # Errors
    ///
    /// Any error from [`SourceClient::fetch_page`].
    pub async fn fetch_snapshot(&self, url: &str) -> Result<SourceProductSnapshot, ScraperError> {
        tracing::info!(url, "fetching product page");
        let markup = self.fetch_page(url).await?;
        let year = chrono::Local::now().year();
        Ok(extract_snapshot(&markup, url, year))
    }
}
