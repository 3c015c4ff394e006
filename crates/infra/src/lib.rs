//! `spindle-infra` — infrastructure: persistence backends, the listing
//! cache, the enrichment client, and the catalog/order workflow services.

pub mod cache;
pub mod enrichment;
pub mod order_store;
pub mod record_store;
pub mod services;
