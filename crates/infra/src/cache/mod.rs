//! Listing cache: a lossy, best-effort accelerator for catalog queries.
//!
//! Callers absorb every cache failure (logged, never surfaced); absence or
//! breakage of the cache affects performance only, never correctness.

pub mod in_memory;
#[cfg(feature = "redis")]
pub mod redis;

pub use in_memory::InMemoryListingCache;
#[cfg(feature = "redis")]
pub use redis::RedisListingCache;

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

/// Cache operation error.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache backend unavailable: {0}")]
    Backend(String),
}

/// Key/value cache with per-entry expiry.
#[async_trait]
pub trait ListingCache: Send + Sync {
    /// Fetch a live entry; expired entries read as absent.
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    /// Store an entry that expires after `ttl`.
    async fn set(&self, key: &str, value: String, ttl: Duration) -> Result<(), CacheError>;

    /// Drop an entry if present.
    async fn delete(&self, key: &str) -> Result<(), CacheError>;
}
