//! Source-site product page fetching and field extraction.

pub mod availability;
pub mod client;
pub mod error;
pub mod extract;
mod rate_limit;
pub mod url;

pub use availability::availability_quantity;
pub use client::{SourceClient, DEFAULT_MIN_PAGE_BYTES};
pub use error::ScraperError;
pub use extract::{extract_snapshot, parse_deadline, parse_price_text, AVAILABILITY_UNKNOWN};
pub use url::is_valid_source_url;
