//! Derived SKU generation.
//!
//! A derived SKU has the shape `ZO-XXXX-CCC-SIZE`:
//!
//! - `XXXX`: first four uppercase hex characters of the MD5 digest of
//!   `{product_id}-{clean_color}-{clean_size}`, where cleaning drops every
//!   character that is not alphanumeric or `_`.
//! - `CCC`: the color code from [`crate::color::normalize_color`].
//! - `SIZE`: the raw size label.
//!
//! All whitespace is removed from the composed string. MD5 is used only as a
//! stable short-identifier generator; SKUs already stored in the storefront
//! were generated with it, so it cannot be swapped without a migration.
//!
//! The catalog-export path and the discount-sync path both go through
//! [`derive_sku`]; there is no second implementation to drift.

use std::fmt::Write as _;
use std::sync::LazyLock;

use md5::{Digest, Md5};
use regex::Regex;
use thiserror::Error;

use crate::color::normalize_color;

/// Literal tag identifying SKUs derived from the source site.
pub const SKU_PREFIX: &str = "ZO";

/// Product id used when a URL carries no recognizable product segment.
pub const UNKNOWN_PRODUCT_ID: &str = "UNKNOWN";

/// Color assumed for the product's default variant by [`quick_sku`].
pub const QUICK_SKU_COLOR: &str = "ブラック";

/// Size assumed for the product's default variant by [`quick_sku`].
pub const QUICK_SKU_SIZE: &str = "FREE";

const HASH_LEN: usize = 4;

static PRODUCT_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/goods(?:-sale)?[/-](\d+)").expect("valid regex"));

static NON_WORD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\p{L}\p{N}_]").expect("valid regex"));

#[derive(Debug, Error)]
enum SkuError {
    #[error("digest \"{0}\" shorter than {HASH_LEN} hex characters")]
    ShortDigest(String),
}

/// Extracts the source-site product id from a product URL.
///
/// Matches `/goods/<digits>` and `/goods-sale/<digits>`. Returns
/// [`UNKNOWN_PRODUCT_ID`] when the URL has no such segment.
#[must_use]
pub fn extract_product_id(url: &str) -> String {
    product_id_segment(url).map_or_else(|| UNKNOWN_PRODUCT_ID.to_string(), str::to_string)
}

pub(crate) fn product_id_segment(url: &str) -> Option<&str> {
    PRODUCT_ID_RE
        .captures(url)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Derives the catalog SKU for one (product, color, size) combination.
///
/// Never fails: if derivation breaks internally the degraded
/// `ZO-ERROR-{color[..3]}-{size}` form is returned instead.
#[must_use]
pub fn derive_sku(product_id: &str, color_label: &str, size_label: &str) -> String {
    match try_derive_sku(product_id, color_label, size_label) {
        Ok(sku) => sku,
        Err(e) => {
            tracing::error!(
                product_id,
                color = color_label,
                size = size_label,
                error = %e,
                "SKU derivation failed, using degraded SKU"
            );
            fallback_sku(color_label, size_label)
        }
    }
}

/// [`derive_sku`] with the product id taken from a source URL.
#[must_use]
pub fn derive_sku_for_url(url: &str, color_label: &str, size_label: &str) -> String {
    derive_sku(&extract_product_id(url), color_label, size_label)
}

/// SKU of the conventional default variant (black, one size) of the product
/// behind `url`, usable as a match guess before the page is fetched.
#[must_use]
pub fn quick_sku(url: &str) -> String {
    derive_sku_for_url(url, QUICK_SKU_COLOR, QUICK_SKU_SIZE)
}

/// Removes every whitespace character (not just leading/trailing).
#[must_use]
pub fn strip_whitespace(value: &str) -> String {
    value.chars().filter(|c| !c.is_whitespace()).collect()
}

fn try_derive_sku(product_id: &str, color_label: &str, size_label: &str) -> Result<String, SkuError> {
    let hash_input = format!(
        "{product_id}-{}-{}",
        clean_hash_component(color_label),
        clean_hash_component(size_label)
    );
    let hex = md5_hex_upper(&hash_input);
    let hash = hex
        .get(..HASH_LEN)
        .ok_or_else(|| SkuError::ShortDigest(hex.clone()))?;
    let color_code = normalize_color(color_label);

    let sku = strip_whitespace(&format!("{SKU_PREFIX}-{hash}-{color_code}-{size_label}"));
    tracing::debug!(product_id, hash_input, sku, "derived SKU");
    Ok(sku)
}

fn fallback_sku(color_label: &str, size_label: &str) -> String {
    let color_head: String = color_label.chars().take(3).collect();
    let color_head = if color_head.is_empty() {
        "UNK".to_string()
    } else {
        color_head
    };
    format!("{SKU_PREFIX}-ERROR-{color_head}-{size_label}")
}

/// Keeps word characters only: letters, numbers and `_`. Combining marks
/// and other non-letter alphabetics (e.g. `Ⓐ`) are dropped.
fn clean_hash_component(value: &str) -> String {
    NON_WORD_RE.replace_all(value, "").into_owned()
}

fn md5_hex_upper(input: &str) -> String {
    let digest = Md5::digest(input.as_bytes());
    digest.iter().fold(String::with_capacity(32), |mut acc, byte| {
        let _ = write!(acc, "{byte:02X}");
        acc
    })
}

#[cfg(test)]
#[path = "sku_test.rs"]
mod tests;
