//! Workflow services orchestrating stores, cache, and enrichment.

pub mod orders;
pub mod records;

pub use orders::OrderService;
pub use records::{listing_cache_key, RecordService, DEFAULT_LIMIT, DEFAULT_PAGE, LISTING_TTL};
