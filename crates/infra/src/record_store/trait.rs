use async_trait::async_trait;

use spindle_catalog::{Record, RecordFilter, RecordPatch};
use spindle_core::{DomainResult, RecordId};

/// Catalog persistence.
///
/// `adjust_stock` is the single choke point for stock changes: no other
/// operation writes the quantity field. Implementations apply the delta as
/// one atomic conditional update so concurrent orders cannot oversell.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Insert a new record, enforcing the (artist, album, format)
    /// uniqueness constraint.
    async fn insert(&self, record: Record) -> DomainResult<Record>;

    async fn get(&self, id: RecordId) -> DomainResult<Record>;

    /// Patch non-stock fields. The uniqueness constraint is re-checked when
    /// the patch touches artist, album, or format.
    async fn update(&self, id: RecordId, patch: RecordPatch) -> DomainResult<Record>;

    async fn delete(&self, id: RecordId) -> DomainResult<Record>;

    /// Apply a signed stock delta (negative = deduction, positive =
    /// restock). Fails with `InsufficientStock`, carrying the available
    /// quantity, when the result would go negative; the record is left
    /// untouched in that case.
    async fn adjust_stock(&self, id: RecordId, delta: i64) -> DomainResult<Record>;

    /// Number of records matching `filter`.
    async fn count(&self, filter: &RecordFilter) -> DomainResult<u64>;

    /// One page of matching records, newest first. `page` is 1-indexed.
    async fn find(&self, filter: &RecordFilter, page: u32, limit: u32) -> DomainResult<Vec<Record>>;
}
