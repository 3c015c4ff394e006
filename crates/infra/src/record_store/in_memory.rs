use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::Utc;

use spindle_catalog::{apply_stock_delta, Record, RecordFilter, RecordPatch};
use spindle_core::{DomainError, DomainResult, Entity, RecordId};

use super::r#trait::RecordStore;

/// In-memory catalog store.
///
/// Intended for tests/dev. Not optimized for performance.
#[derive(Debug, Default)]
pub struct InMemoryRecordStore {
    records: RwLock<HashMap<RecordId, Record>>,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock_poisoned() -> DomainError {
        DomainError::internal("record store lock poisoned")
    }

    fn missing(id: RecordId) -> DomainError {
        DomainError::not_found(format!("record with id {id} not found"))
    }
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn insert(&self, record: Record) -> DomainResult<Record> {
        let mut map = self.records.write().map_err(|_| Self::lock_poisoned())?;

        let key = record.key();
        if map.values().any(|existing| existing.key() == key) {
            return Err(DomainError::DuplicateRecord);
        }

        map.insert(*record.id(), record.clone());
        Ok(record)
    }

    async fn get(&self, id: RecordId) -> DomainResult<Record> {
        let map = self.records.read().map_err(|_| Self::lock_poisoned())?;
        map.get(&id).cloned().ok_or_else(|| Self::missing(id))
    }

    async fn update(&self, id: RecordId, patch: RecordPatch) -> DomainResult<Record> {
        let mut map = self.records.write().map_err(|_| Self::lock_poisoned())?;

        if patch.touches_key() {
            let current = map.get(&id).ok_or_else(|| Self::missing(id))?;
            let mut prospective = current.key();
            if let Some(artist) = &patch.artist {
                prospective.artist = artist.clone();
            }
            if let Some(album) = &patch.album {
                prospective.album = album.clone();
            }
            if let Some(format) = patch.format {
                prospective.format = format;
            }
            if map
                .values()
                .any(|other| other.id != id && other.key() == prospective)
            {
                return Err(DomainError::DuplicateRecord);
            }
        }

        let record = map.get_mut(&id).ok_or_else(|| Self::missing(id))?;
        patch.apply(record, Utc::now())?;
        Ok(record.clone())
    }

    async fn delete(&self, id: RecordId) -> DomainResult<Record> {
        let mut map = self.records.write().map_err(|_| Self::lock_poisoned())?;
        map.remove(&id).ok_or_else(|| Self::missing(id))
    }

    async fn adjust_stock(&self, id: RecordId, delta: i64) -> DomainResult<Record> {
        // Check and write under one lock: the atomic conditional update.
        let mut map = self.records.write().map_err(|_| Self::lock_poisoned())?;
        let record = map.get_mut(&id).ok_or_else(|| Self::missing(id))?;

        record.qty = apply_stock_delta(record.qty, delta)?;
        record.last_modified = Utc::now();
        Ok(record.clone())
    }

    async fn count(&self, filter: &RecordFilter) -> DomainResult<u64> {
        let map = self.records.read().map_err(|_| Self::lock_poisoned())?;
        Ok(map.values().filter(|r| filter.matches(r)).count() as u64)
    }

    async fn find(&self, filter: &RecordFilter, page: u32, limit: u32) -> DomainResult<Vec<Record>> {
        let map = self.records.read().map_err(|_| Self::lock_poisoned())?;

        let mut matched: Vec<Record> = map.values().filter(|r| filter.matches(r)).cloned().collect();
        matched.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });

        let page = page.max(1);
        let offset = (page as usize - 1) * limit as usize;
        Ok(matched.into_iter().skip(offset).take(limit as usize).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spindle_catalog::{NewRecord, RecordCategory, RecordFormat};

    fn input(artist: &str, album: &str, format: RecordFormat) -> NewRecord {
        NewRecord {
            artist: artist.to_string(),
            album: album.to_string(),
            price_cents: 2_499,
            qty: 10,
            format,
            category: RecordCategory::Rock,
            mbid: None,
        }
    }

    fn record(artist: &str, album: &str, format: RecordFormat) -> Record {
        Record::new(input(artist, album, format), Vec::new(), Utc::now()).unwrap()
    }

    #[tokio::test]
    async fn insert_rejects_a_duplicate_triple() {
        let store = InMemoryRecordStore::new();
        store
            .insert(record("The Beatles", "Abbey Road", RecordFormat::Vinyl))
            .await
            .unwrap();

        let err = store
            .insert(record("The Beatles", "Abbey Road", RecordFormat::Vinyl))
            .await
            .unwrap_err();
        assert_eq!(err, DomainError::DuplicateRecord);

        // Varying any one part of the triple succeeds.
        store
            .insert(record("The Beatles", "Abbey Road", RecordFormat::Cd))
            .await
            .unwrap();
        store
            .insert(record("The Beatles", "Let It Be", RecordFormat::Vinyl))
            .await
            .unwrap();
        store
            .insert(record("The Rolling Stones", "Abbey Road", RecordFormat::Vinyl))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn adjust_stock_applies_delta_and_bumps_last_modified() {
        let store = InMemoryRecordStore::new();
        let created = store
            .insert(record("The Beatles", "Abbey Road", RecordFormat::Vinyl))
            .await
            .unwrap();

        let updated = store.adjust_stock(created.id, -2).await.unwrap();
        assert_eq!(updated.qty, 8);
        assert!(updated.last_modified >= created.last_modified);

        let restocked = store.adjust_stock(created.id, 4).await.unwrap();
        assert_eq!(restocked.qty, 12);
    }

    #[tokio::test]
    async fn adjust_stock_fails_without_mutation_when_stock_is_short() {
        let store = InMemoryRecordStore::new();
        let created = store
            .insert(record("The Beatles", "Abbey Road", RecordFormat::Vinyl))
            .await
            .unwrap();

        let err = store.adjust_stock(created.id, -20).await.unwrap_err();
        assert_eq!(err, DomainError::insufficient_stock(10));

        let unchanged = store.get(created.id).await.unwrap();
        assert_eq!(unchanged.qty, 10);
    }

    #[tokio::test]
    async fn adjust_stock_on_a_missing_record_is_not_found() {
        let store = InMemoryRecordStore::new();
        let err = store.adjust_stock(RecordId::new(), -1).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));
    }

    #[tokio::test]
    async fn update_enforces_uniqueness_when_the_triple_changes() {
        let store = InMemoryRecordStore::new();
        store
            .insert(record("The Beatles", "Abbey Road", RecordFormat::Vinyl))
            .await
            .unwrap();
        let other = store
            .insert(record("The Beatles", "Let It Be", RecordFormat::Vinyl))
            .await
            .unwrap();

        let patch = RecordPatch {
            album: Some("Abbey Road".to_string()),
            ..Default::default()
        };
        let err = store.update(other.id, patch).await.unwrap_err();
        assert_eq!(err, DomainError::DuplicateRecord);

        // A patch that keeps its own triple is fine.
        let patch = RecordPatch {
            price_cents: Some(3_999),
            ..Default::default()
        };
        let updated = store.update(other.id, patch).await.unwrap();
        assert_eq!(updated.price_cents, 3_999);
    }

    #[tokio::test]
    async fn delete_returns_the_removed_record() {
        let store = InMemoryRecordStore::new();
        let created = store
            .insert(record("The Beatles", "Abbey Road", RecordFormat::Vinyl))
            .await
            .unwrap();

        let removed = store.delete(created.id).await.unwrap();
        assert_eq!(removed.id, created.id);
        assert!(matches!(
            store.get(created.id).await.unwrap_err(),
            DomainError::NotFound(_)
        ));
    }

    #[tokio::test]
    async fn find_orders_newest_first_and_paginates() {
        let store = InMemoryRecordStore::new();
        for i in 0..5 {
            store
                .insert(record("The Beatles", &format!("Album {i}"), RecordFormat::Vinyl))
                .await
                .unwrap();
        }

        let filter = RecordFilter::default();
        assert_eq!(store.count(&filter).await.unwrap(), 5);

        let first_page = store.find(&filter, 1, 2).await.unwrap();
        assert_eq!(first_page.len(), 2);
        assert_eq!(first_page[0].album, "Album 4");

        let last_page = store.find(&filter, 3, 2).await.unwrap();
        assert_eq!(last_page.len(), 1);
        assert_eq!(last_page[0].album, "Album 0");

        assert!(store.find(&filter, 4, 2).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn find_applies_search_precedence_over_exact_filters() {
        let store = InMemoryRecordStore::new();
        store
            .insert(record("The Beatles", "Abbey Road", RecordFormat::Vinyl))
            .await
            .unwrap();
        store
            .insert(record("Pink Floyd", "The Wall", RecordFormat::Vinyl))
            .await
            .unwrap();

        let filter = RecordFilter {
            q: Some("beatles".to_string()),
            artist: Some("Pink Floyd".to_string()),
            ..Default::default()
        };
        let found = store.find(&filter, 1, 20).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].artist, "The Beatles");
    }
}
