//! Product-page field extraction.
//!
//! Turns raw page markup into a [`SourceProductSnapshot`]. Missing fields are
//! left empty or zero rather than treated as errors; the sync step decides
//! whether a snapshot is usable.

use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::Decimal;
use scraper::{ElementRef, Html};
use zosync_core::price::round_half_up;
use zosync_core::snapshot::parse_discount_percentage;
use zosync_core::{SourceProductSnapshot, StockRow};

/// Availability recorded when a size row has no stock label.
pub const AVAILABILITY_UNKNOWN: &str = "尚未擷取到資料";

mod selectors {
    use std::sync::LazyLock;

    use scraper::Selector;

    fn parse(css: &str) -> Selector {
        Selector::parse(css).expect("valid selector")
    }

    pub static NAME: LazyLock<Selector> =
        LazyLock::new(|| parse(".p-goods-information__heading"));
    pub static BRAND: LazyLock<Selector> =
        LazyLock::new(|| parse(".p-goods-information-brand-link__label"));
    /// Current price, most specific first.
    pub static PRICES: LazyLock<[Selector; 3]> = LazyLock::new(|| {
        [
            parse(".p-goods-information__price--discount"),
            parse(".p-goods-information__price"),
            parse(".price-value"),
        ]
    });
    pub static PROPER_PRICE: LazyLock<Selector> =
        LazyLock::new(|| parse(".p-goods-information__proper span"));
    pub static PRICEDOWN_RATE: LazyLock<Selector> =
        LazyLock::new(|| parse(".p-goods-information-pricedown__rate"));
    pub static DEADLINE: LazyLock<Selector> =
        LazyLock::new(|| parse(".p-goods-information-price-detail-type__text"));
    pub static ACTION_BLOCK: LazyLock<Selector> =
        LazyLock::new(|| parse("dl.p-goods-information-action"));
    pub static COLOR: LazyLock<Selector> = LazyLock::new(|| parse("span.p-goods-add-cart__color"));
    pub static SIZE_ITEM: LazyLock<Selector> =
        LazyLock::new(|| parse("li.p-goods-add-cart-list__item"));
    pub static STOCK_SPAN: LazyLock<Selector> =
        LazyLock::new(|| parse(".p-goods-add-cart-stock span"));
}

static PRICE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"¥?(\d{3,5})").expect("valid price regex"));

static DEADLINE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d{1,2})月(\d{1,2})日\s*(\d{1,2}:\d{2})").expect("valid deadline regex")
});

/// Extracts a snapshot from product-page markup.
///
/// `year` is used to complete the month/day discount deadline shown on the
/// page.
#[must_use]
pub fn extract_snapshot(markup: &str, url: &str, year: i32) -> SourceProductSnapshot {
    let document = Html::parse_document(markup);
    let first_text = |selector: &scraper::Selector| document.select(selector).next().map(text_of);

    let name = first_text(&selectors::NAME).unwrap_or_default();
    let brand = first_text(&selectors::BRAND).filter(|b| !b.is_empty());

    let discounted = selectors::PRICES
        .iter()
        .find_map(&first_text)
        .and_then(|text| parse_price_text(&text));
    let original = first_text(&selectors::PROPER_PRICE).and_then(|text| parse_price_text(&text));

    let discount_percentage = match (discounted, original) {
        (Some(price), Some(orig)) if price != orig => computed_discount(price, orig),
        _ => first_text(&selectors::PRICEDOWN_RATE)
            .map_or(0, |label| parse_discount_percentage(&label)),
    };

    let discount_deadline =
        first_text(&selectors::DEADLINE).and_then(|text| parse_deadline(&text, year));

    let discounted_price = discounted.unwrap_or(0);
    let snapshot = SourceProductSnapshot {
        url: url.to_owned(),
        name,
        brand,
        original_price: original.unwrap_or(discounted_price),
        discounted_price,
        discount_percentage,
        discount_deadline,
        stock_rows: extract_stock_rows(&document),
    };

    tracing::debug!(
        url,
        name = %snapshot.name,
        discounted_price = snapshot.discounted_price,
        original_price = snapshot.original_price,
        discount_percentage = snapshot.discount_percentage,
        stock_rows = snapshot.stock_rows.len(),
        "extracted product snapshot"
    );
    snapshot
}

/// First 3 to 5 digit run in `text` once thousands separators are removed.
#[must_use]
pub fn parse_price_text(text: &str) -> Option<i64> {
    let without_commas = text.replace(',', "");
    PRICE_RE
        .captures(&without_commas)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// Parses `M月D日 HH:MM` into `{year}-MM-DD HH:MM`.
#[must_use]
pub fn parse_deadline(text: &str, year: i32) -> Option<String> {
    let caps = DEADLINE_RE.captures(text)?;
    let month: u32 = caps.get(1)?.as_str().parse().ok()?;
    let day: u32 = caps.get(2)?.as_str().parse().ok()?;
    let time = caps.get(3)?.as_str();
    Some(format!("{year}-{month:02}-{day:02} {time}"))
}

/// Element text with whitespace runs collapsed to single spaces.
fn text_of(element: ElementRef<'_>) -> String {
    let raw: String = element.text().collect();
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// `round((1 - price / original) * 100)`, clamped to `0..=100`.
fn computed_discount(price: i64, original: i64) -> i32 {
    if original <= 0 {
        return 0;
    }
    let ratio = Decimal::ONE - Decimal::from(price) / Decimal::from(original);
    let pct = round_half_up(ratio * Decimal::ONE_HUNDRED).clamp(0, 100);
    i32::try_from(pct).unwrap_or(0)
}

fn extract_stock_rows(document: &Html) -> Vec<StockRow> {
    let mut rows = Vec::new();
    for block in document.select(&selectors::ACTION_BLOCK) {
        let Some(color) = block.select(&selectors::COLOR).next().map(text_of) else {
            continue;
        };
        for item in block.select(&selectors::SIZE_ITEM) {
            let size = item.value().attr("data-size").unwrap_or_default().trim();
            if size.is_empty() {
                continue;
            }
            let availability = item
                .select(&selectors::STOCK_SPAN)
                .last()
                .map_or_else(|| AVAILABILITY_UNKNOWN.to_owned(), text_of);
            rows.push(StockRow::new(size, &color, &availability));
        }
    }
    rows
}

#[cfg(test)]
#[path = "extract_test.rs"]
mod tests;
