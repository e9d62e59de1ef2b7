//! HTTP client for the EasyStore 3.0 REST API.

mod fetch_all;

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;

use crate::error::StorefrontError;
use crate::rate_limit::retry_with_backoff;
use crate::types::{ProductEnvelope, ProductsPage, StoreProduct, StoreVariant};

/// Maximum number of product pages fetched before giving up.
pub(super) const MAX_PAGES: usize = 200;

const ACCESS_TOKEN_HEADER: &str = "EasyStore-Access-Token";

/// Authenticated client for one storefront.
///
/// Every request carries the access token header. 429 responses and network
/// failures are retried with exponential backoff up to `max_retries` times.
pub struct StorefrontClient {
    client: Client,
    api_base: String,
    max_retries: u32,
    backoff_base_secs: u64,
}

impl std::fmt::Debug for StorefrontClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorefrontClient")
            .field("api_base", &self.api_base)
            .field("max_retries", &self.max_retries)
            .field("backoff_base_secs", &self.backoff_base_secs)
            .finish_non_exhaustive()
    }
}

impl StorefrontClient {
    /// # Errors
    ///
    /// - [`StorefrontError::InvalidAccessToken`] if the token cannot be sent
    ///   as a header value.
    /// - [`StorefrontError::Http`] if the `reqwest::Client` cannot be built.
    pub fn new(
        api_base: &str,
        access_token: &str,
        timeout_secs: u64,
        user_agent: &str,
        max_retries: u32,
        backoff_base_secs: u64,
    ) -> Result<Self, StorefrontError> {
        let mut token =
            HeaderValue::from_str(access_token).map_err(|_| StorefrontError::InvalidAccessToken)?;
        token.set_sensitive(true);
        let mut headers = HeaderMap::new();
        headers.insert(ACCESS_TOKEN_HEADER, token);
        headers.insert(
            reqwest::header::ACCEPT,
            HeaderValue::from_static("application/json"),
        );

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            api_base: api_base.trim_end_matches('/').to_owned(),
            max_retries,
            backoff_base_secs,
        })
    }

    /// Fetches one page (1-based) of products.
    ///
    /// # Errors
    ///
    /// Returns [`StorefrontError`] on HTTP failure or an unparseable body.
    pub async fn fetch_products_page(&self, page: u32) -> Result<Vec<StoreProduct>, StorefrontError> {
        let url = format!("{}/products.json?page={page}", self.api_base);
        let parsed: ProductsPage = self
            .request_json(Method::GET, &url, None, &format!("products page {page}"))
            .await?;
        Ok(parsed.products)
    }

    /// Fetches every variant of one product with its current prices.
    ///
    /// # Errors
    ///
    /// Returns [`StorefrontError::NotFound`] for an unknown product, or any
    /// other HTTP/parse failure.
    pub async fn fetch_product_variants(
        &self,
        product_id: i64,
    ) -> Result<Vec<StoreVariant>, StorefrontError> {
        let url = format!("{}/products/{product_id}.json", self.api_base);
        let parsed: ProductEnvelope = self
            .request_json(Method::GET, &url, None, &format!("product {product_id}"))
            .await?;
        tracing::info!(
            product_id,
            variants = parsed.product.variants.len(),
            "fetched product variants"
        );
        Ok(parsed.product.variants)
    }

    /// Sets the selling price of one variant, and its compare-at price when
    /// given. Without a compare-at price the stored one is left as is.
    ///
    /// # Errors
    ///
    /// Returns [`StorefrontError`] when the update is rejected or fails.
    pub async fn update_variant_price(
        &self,
        product_id: i64,
        variant_id: i64,
        price: i64,
        compare_at_price: Option<i64>,
    ) -> Result<(), StorefrontError> {
        let url = format!(
            "{}/products/{product_id}/variants/{variant_id}.json",
            self.api_base
        );
        let body = match compare_at_price {
            Some(compare) => serde_json::json!({
                "variant": { "price": price, "compare_at_price": compare }
            }),
            None => serde_json::json!({ "variant": { "price": price } }),
        };
        self.send(Method::PUT, &url, Some(&body)).await?;
        tracing::info!(
            product_id,
            variant_id,
            price,
            compare_at_price = ?compare_at_price,
            "updated variant price"
        );
        Ok(())
    }

    async fn request_json<T: DeserializeOwned>(
        &self,
        method: Method,
        url: &str,
        body: Option<&serde_json::Value>,
        context: &str,
    ) -> Result<T, StorefrontError> {
        let text = self.send(method, url, body).await?;
        serde_json::from_str(&text).map_err(|source| StorefrontError::Deserialize {
            context: context.to_owned(),
            source,
        })
    }

    /// Sends one request with retries and returns the response body.
    async fn send(
        &self,
        method: Method,
        url: &str,
        body: Option<&serde_json::Value>,
    ) -> Result<String, StorefrontError> {
        retry_with_backoff(self.max_retries, self.backoff_base_secs, || {
            let method = method.clone();
            async move {
                let mut request = self.client.request(method, url);
                if let Some(body) = body {
                    request = request.json(body);
                }
                let response = request.send().await?;
                let status = response.status();

                if status == StatusCode::TOO_MANY_REQUESTS {
                    let retry_after_secs = response
                        .headers()
                        .get(reqwest::header::RETRY_AFTER)
                        .and_then(|v| v.to_str().ok())
                        .and_then(|s| s.parse::<u64>().ok())
                        .unwrap_or(60);
                    return Err(StorefrontError::RateLimited { retry_after_secs });
                }

                if status == StatusCode::NOT_FOUND {
                    return Err(StorefrontError::NotFound {
                        url: url.to_owned(),
                    });
                }

                if !status.is_success() {
                    return Err(StorefrontError::UnexpectedStatus {
                        status: status.as_u16(),
                        url: url.to_owned(),
                    });
                }

                Ok(response.text().await?)
            }
        })
        .await
    }
}
