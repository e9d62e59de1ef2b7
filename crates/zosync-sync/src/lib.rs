//! Discount sync orchestration between the source site and the storefront.

pub mod error;
pub mod outcome;
pub mod ports;
pub mod report;
pub mod summary;
pub mod syncer;
pub mod tracked_urls;

pub use error::SyncError;
pub use outcome::{
    DiscountSyncOutcome, PricingDetails, ProductResult, RestoreOutcome, RunOutcome, SyncRun,
    VariantRestore, VariantUpdate,
};
pub use ports::{ProductSource, StorefrontApi};
pub use report::{save_report, write_report};
pub use summary::{FailedProduct, SyncSummary};
pub use syncer::{DiscountSyncer, SyncOptions};
pub use tracked_urls::{load_tracked_urls, parse_tracked_urls, save_tracked_urls};
