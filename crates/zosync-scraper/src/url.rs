use reqwest::Url;
use zosync_core::sku::UNKNOWN_PRODUCT_ID;

const SOURCE_HOST: &str = "zozo.jp";

/// Returns `true` for an http(s) product URL on the source site whose path
/// carries a product id (`/goods/<id>` or `/goods-sale/<id>`).
#[must_use]
pub fn is_valid_source_url(url: &str) -> bool {
    let Ok(parsed) = Url::parse(url.trim()) else {
        return false;
    };
    if !matches!(parsed.scheme(), "http" | "https") {
        return false;
    }
    if !parsed.host_str().is_some_and(|h| h.contains(SOURCE_HOST)) {
        return false;
    }
    zosync_core::extract_product_id(parsed.path()) != UNKNOWN_PRODUCT_ID
}

/// Host of `url`, or the raw input when it does not parse.
pub(crate) fn host_of(url: &str) -> String {
    Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_owned))
        .unwrap_or_else(|| url.to_owned())
}
