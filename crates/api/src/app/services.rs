use std::sync::Arc;

use spindle_infra::{
    cache::{InMemoryListingCache, ListingCache},
    enrichment::{MusicBrainzClient, TrackListSource},
    order_store::{InMemoryOrderStore, OrderStore, PostgresOrderStore},
    record_store::{InMemoryRecordStore, PostgresRecordStore, RecordStore},
    services::{OrderService, RecordService},
};

#[cfg(feature = "redis")]
use spindle_infra::cache::RedisListingCache;

/// Fully wired application services.
pub struct AppServices {
    pub records: RecordService,
    pub orders: OrderService,
}

/// Select backends from the environment and wire the services.
///
/// `DATABASE_URL` switches persistence to Postgres; `REDIS_URL` (with the
/// `redis` feature) switches the listing cache to Redis. Everything else
/// runs in memory.
pub async fn build_services() -> AppServices {
    let (record_store, order_store): (Arc<dyn RecordStore>, Arc<dyn OrderStore>) =
        match std::env::var("DATABASE_URL") {
            Ok(url) => {
                let pool = sqlx::PgPool::connect(&url)
                    .await
                    .expect("failed to connect to DATABASE_URL");

                let records = PostgresRecordStore::new(pool.clone());
                records
                    .ensure_schema()
                    .await
                    .expect("failed to prepare records schema");

                let orders = PostgresOrderStore::new(pool);
                orders
                    .ensure_schema()
                    .await
                    .expect("failed to prepare orders schema");

                tracing::info!("using postgres persistence");
                (Arc::new(records), Arc::new(orders))
            }
            Err(_) => {
                tracing::info!("DATABASE_URL not set; using in-memory persistence");
                (
                    Arc::new(InMemoryRecordStore::new()),
                    Arc::new(InMemoryOrderStore::new()),
                )
            }
        };

    build_with(
        record_store,
        order_store,
        build_cache(),
        Arc::new(MusicBrainzClient::new()),
    )
}

/// Wire services over explicit backends (used by tests).
pub fn build_with(
    record_store: Arc<dyn RecordStore>,
    order_store: Arc<dyn OrderStore>,
    cache: Arc<dyn ListingCache>,
    tracks: Arc<dyn TrackListSource>,
) -> AppServices {
    AppServices {
        records: RecordService::new(record_store.clone(), cache, tracks),
        orders: OrderService::new(order_store, record_store),
    }
}

#[cfg(feature = "redis")]
fn build_cache() -> Arc<dyn ListingCache> {
    if let Ok(url) = std::env::var("REDIS_URL") {
        match RedisListingCache::new(&url) {
            Ok(cache) => {
                tracing::info!("using redis listing cache");
                return Arc::new(cache);
            }
            Err(e) => {
                tracing::warn!(error = %e, "redis cache unavailable; falling back to in-memory")
            }
        }
    }
    Arc::new(InMemoryListingCache::new())
}

#[cfg(not(feature = "redis"))]
fn build_cache() -> Arc<dyn ListingCache> {
    Arc::new(InMemoryListingCache::new())
}
