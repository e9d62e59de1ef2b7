//! EasyStore 3.0 REST response types.
//!
//! Prices arrive either as JSON numbers or as decimal strings (`"1990.00"`),
//! and `compare_at_price` may be `null`, `""` or absent. Both are kept raw
//! here and coerced to whole yen by [`StoreVariant::prices`].

use serde::Deserialize;
use zosync_core::price::coerce_amount;
use zosync_core::VariantPrices;

/// Response of `GET /products.json?page=N`.
#[derive(Debug, Deserialize)]
pub struct ProductsPage {
    #[serde(default)]
    pub products: Vec<StoreProduct>,
}

/// Response of `GET /products/{id}.json`.
#[derive(Debug, Deserialize)]
pub struct ProductEnvelope {
    pub product: StoreProduct,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoreProduct {
    pub id: i64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub is_published: bool,
    #[serde(default)]
    pub variants: Vec<StoreVariant>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoreVariant {
    pub id: i64,
    #[serde(default)]
    pub sku: Option<String>,
    #[serde(default)]
    pub price: Option<RawAmount>,
    #[serde(default)]
    pub compare_at_price: Option<RawAmount>,
}

/// A price field as sent by the API.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawAmount {
    Number(serde_json::Number),
    Text(String),
}

impl RawAmount {
    /// Whole yen, or `None` when the value is empty or not numeric.
    #[must_use]
    pub fn to_yen(&self) -> Option<i64> {
        match self {
            Self::Number(n) => coerce_amount(&n.to_string()),
            Self::Text(s) => coerce_amount(s),
        }
    }
}

impl StoreVariant {
    /// Trimmed SKU, `None` when blank.
    #[must_use]
    pub fn trimmed_sku(&self) -> Option<String> {
        self.sku
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_owned)
    }

    /// Coerced prices: an unusable `price` becomes `0`, an unusable
    /// `compare_at_price` becomes absent.
    #[must_use]
    pub fn prices(&self) -> VariantPrices {
        VariantPrices {
            variant_id: self.id,
            sku: self.trimmed_sku(),
            price: self.price.as_ref().and_then(RawAmount::to_yen).unwrap_or(0),
            compare_at_price: self.compare_at_price.as_ref().and_then(RawAmount::to_yen),
        }
    }
}
