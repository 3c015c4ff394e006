use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;

use spindle_catalog::{NewRecord, Pagination, Record, RecordFilter, RecordPage, RecordPatch};
use spindle_core::{DomainError, DomainResult, RecordId};

use crate::cache::ListingCache;
use crate::enrichment::TrackListSource;
use crate::record_store::RecordStore;

/// How long a cached listing page stays valid.
pub const LISTING_TTL: Duration = Duration::from_secs(60);

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_LIMIT: u32 = 20;

/// Catalog workflows: record CRUD with enrichment, and the cached listing
/// query.
pub struct RecordService {
    store: Arc<dyn RecordStore>,
    cache: Arc<dyn ListingCache>,
    tracks: Arc<dyn TrackListSource>,
}

impl RecordService {
    pub fn new(
        store: Arc<dyn RecordStore>,
        cache: Arc<dyn ListingCache>,
        tracks: Arc<dyn TrackListSource>,
    ) -> Self {
        Self {
            store,
            cache,
            tracks,
        }
    }

    /// Create a record, enriching the tracklist when an mbid is supplied.
    pub async fn create_record(&self, input: NewRecord) -> DomainResult<Record> {
        let tracklist = match &input.mbid {
            Some(mbid) => self.tracks.fetch_track_list(mbid).await,
            None => Vec::new(),
        };

        let record = Record::new(input, tracklist, Utc::now())?;
        normalize(self.store.insert(record).await, "failed to create record")
    }

    /// Patch a record's fields.
    ///
    /// The tracklist is re-fetched only when the patch changes the mbid to a
    /// new value; an unchanged mbid skips the lookup. The fetched list
    /// unconditionally replaces the stored one.
    pub async fn update_record(&self, id: RecordId, mut patch: RecordPatch) -> DomainResult<Record> {
        let existing = normalize(self.store.get(id).await, "failed to update record")?;

        if let Some(mbid) = &patch.mbid {
            if existing.mbid.as_deref() != Some(mbid.as_str()) {
                patch.tracklist = Some(self.tracks.fetch_track_list(mbid).await);
            }
        }

        normalize(self.store.update(id, patch).await, "failed to update record")
    }

    pub async fn get_record(&self, id: RecordId) -> DomainResult<Record> {
        normalize(self.store.get(id).await, "failed to fetch record")
    }

    pub async fn delete_record(&self, id: RecordId) -> DomainResult<Record> {
        normalize(self.store.delete(id).await, "failed to delete record")
    }

    /// Serve a filtered, paginated catalog listing through the cache.
    ///
    /// Cache-aside: a hit returns the cached envelope without touching the
    /// store (count query included); a miss runs count + fetch, then
    /// repopulates the cache with a fixed TTL. Every cache failure is logged
    /// and treated as a miss.
    pub async fn list_records(
        &self,
        filter: RecordFilter,
        page: u32,
        limit: u32,
    ) -> DomainResult<RecordPage> {
        let page = page.max(1);
        let limit = limit.max(1);
        let key = listing_cache_key(&filter, page, limit);

        match self.cache.get(&key).await {
            Ok(Some(raw)) => match serde_json::from_str::<RecordPage>(&raw) {
                Ok(cached) => return Ok(cached),
                Err(e) => {
                    tracing::warn!(key = %key, error = %e, "cached listing did not decode; treating as miss");
                }
            },
            Ok(None) => {}
            Err(e) => tracing::warn!(key = %key, error = %e, "cache retrieval failed"),
        }

        let total = mask_fetch_error(self.store.count(&filter).await)?;
        let records = mask_fetch_error(self.store.find(&filter, page, limit).await)?;

        let result = RecordPage {
            records,
            pagination: Pagination::new(page, limit, total),
        };

        match serde_json::to_string(&result) {
            Ok(raw) => {
                if let Err(e) = self.cache.set(&key, raw, LISTING_TTL).await {
                    tracing::warn!(key = %key, error = %e, "cache write failed");
                }
            }
            Err(e) => tracing::warn!(error = %e, "listing page did not serialize for caching"),
        }

        Ok(result)
    }
}

/// Deterministic composite of every filter value plus pagination. Absent
/// filters keep an empty-string placeholder so distinct filter combinations
/// never collide and identical ones always hit the same key.
pub fn listing_cache_key(filter: &RecordFilter, page: u32, limit: u32) -> String {
    format!(
        "records:{}:{}:{}:{}:{}:{page}:{limit}",
        filter.q.as_deref().unwrap_or(""),
        filter.artist.as_deref().unwrap_or(""),
        filter.album.as_deref().unwrap_or(""),
        filter.format.map(|f| f.as_str()).unwrap_or(""),
        filter.category.map(|c| c.as_str()).unwrap_or(""),
    )
}

/// Pass business-rule and caller-input failures through verbatim; log and
/// mask anything unexpected behind a fixed message.
fn normalize<T>(result: DomainResult<T>, masked: &'static str) -> DomainResult<T> {
    result.map_err(|e| {
        if e.is_business_rule() || matches!(e, DomainError::Validation(_) | DomainError::InvalidId(_)) {
            e
        } else {
            tracing::error!(error = %e, "{masked}");
            DomainError::internal(masked)
        }
    })
}

/// Listing variant of [`normalize`]: store-level query failures surface as a
/// fixed internal message.
fn mask_fetch_error<T>(result: DomainResult<T>) -> DomainResult<T> {
    result.map_err(|e| {
        tracing::error!(error = %e, "failed to fetch records");
        DomainError::internal("failed to fetch records")
    })
}
