//! EasyStore REST client and catalog snapshot export.

pub mod client;
pub mod error;
pub mod export;
mod rate_limit;
pub mod types;

pub use client::StorefrontClient;
pub use error::StorefrontError;
pub use export::{catalog_records, export_mapping};
pub use types::{RawAmount, StoreProduct, StoreVariant};
