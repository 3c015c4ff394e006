//! Postgres-backed catalog store.
//!
//! Stock deduction is a single conditional `UPDATE ... WHERE qty + delta >= 0`,
//! so concurrent orders cannot drive the quantity negative: whichever
//! statement loses the race affects zero rows and maps to `InsufficientStock`.
//!
//! SQLx errors are mapped to `DomainError`: SQLSTATE 23505 (unique
//! violation on the artist/album/format index) becomes `DuplicateRecord`,
//! everything else becomes `Internal` carrying the cause's message.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row};
use tracing::instrument;

use spindle_catalog::{Record, RecordFilter, RecordPatch};
use spindle_core::{DomainError, DomainResult, RecordId};

use super::r#trait::RecordStore;

const RECORD_COLUMNS: &str =
    "id, artist, album, price_cents, qty, format, category, mbid, tracklist, created_at, last_modified";

/// Postgres-backed catalog store.
///
/// Uses the SQLx connection pool (thread-safe, `Send + Sync`). The
/// uniqueness constraint and the non-negative stock check are enforced at
/// the database level.
#[derive(Debug, Clone)]
pub struct PostgresRecordStore {
    pool: Arc<PgPool>,
}

impl PostgresRecordStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }

    /// Create the records table and its indexes if they do not exist yet.
    pub async fn ensure_schema(&self) -> DomainResult<()> {
        let statements = [
            r#"
            CREATE TABLE IF NOT EXISTS records (
                id UUID PRIMARY KEY,
                artist TEXT NOT NULL,
                album TEXT NOT NULL,
                price_cents BIGINT NOT NULL,
                qty BIGINT NOT NULL CHECK (qty >= 0),
                format TEXT NOT NULL,
                category TEXT NOT NULL,
                mbid TEXT,
                tracklist JSONB NOT NULL DEFAULT '[]'::jsonb,
                created_at TIMESTAMPTZ NOT NULL,
                last_modified TIMESTAMPTZ NOT NULL
            )
            "#,
            r#"
            CREATE UNIQUE INDEX IF NOT EXISTS records_artist_album_format_key
                ON records (artist, album, format)
            "#,
            r#"
            CREATE INDEX IF NOT EXISTS records_search_idx
                ON records USING GIN (
                    to_tsvector('simple', artist || ' ' || album || ' ' || category || ' ' || format)
                )
            "#,
        ];

        for statement in statements {
            sqlx::query(statement)
                .execute(&*self.pool)
                .await
                .map_err(|e| map_sqlx_error("ensure_schema", e))?;
        }
        Ok(())
    }

    fn missing(id: RecordId) -> DomainError {
        DomainError::not_found(format!("record with id {id} not found"))
    }
}

#[async_trait::async_trait]
impl RecordStore for PostgresRecordStore {
    #[instrument(skip(self, record), fields(record_id = %record.id), err)]
    async fn insert(&self, record: Record) -> DomainResult<Record> {
        sqlx::query(
            r#"
            INSERT INTO records
                (id, artist, album, price_cents, qty, format, category, mbid, tracklist, created_at, last_modified)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(record.id.as_uuid())
        .bind(&record.artist)
        .bind(&record.album)
        .bind(record.price_cents as i64)
        .bind(record.qty)
        .bind(record.format.as_str())
        .bind(record.category.as_str())
        .bind(&record.mbid)
        .bind(sqlx::types::Json(&record.tracklist))
        .bind(record.created_at)
        .bind(record.last_modified)
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("insert_record", e))?;

        Ok(record)
    }

    #[instrument(skip(self), fields(record_id = %id), err)]
    async fn get(&self, id: RecordId) -> DomainResult<Record> {
        let row = sqlx::query(&format!(
            "SELECT {RECORD_COLUMNS} FROM records WHERE id = $1"
        ))
        .bind(id.as_uuid())
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("get_record", e))?;

        match row {
            Some(row) => row_to_record(&row),
            None => Err(Self::missing(id)),
        }
    }

    #[instrument(skip(self, patch), fields(record_id = %id), err)]
    async fn update(&self, id: RecordId, patch: RecordPatch) -> DomainResult<Record> {
        if patch.artist.as_deref().is_some_and(|a| a.trim().is_empty()) {
            return Err(DomainError::validation("artist cannot be empty"));
        }
        if patch.album.as_deref().is_some_and(|a| a.trim().is_empty()) {
            return Err(DomainError::validation("album cannot be empty"));
        }

        // COALESCE keeps unset fields; the unique index re-checks the triple.
        let row = sqlx::query(&format!(
            r#"
            UPDATE records SET
                artist = COALESCE($2, artist),
                album = COALESCE($3, album),
                price_cents = COALESCE($4, price_cents),
                format = COALESCE($5, format),
                category = COALESCE($6, category),
                mbid = COALESCE($7, mbid),
                tracklist = COALESCE($8, tracklist),
                last_modified = NOW()
            WHERE id = $1
            RETURNING {RECORD_COLUMNS}
            "#
        ))
        .bind(id.as_uuid())
        .bind(&patch.artist)
        .bind(&patch.album)
        .bind(patch.price_cents.map(|p| p as i64))
        .bind(patch.format.map(|f| f.as_str()))
        .bind(patch.category.map(|c| c.as_str()))
        .bind(&patch.mbid)
        .bind(patch.tracklist.as_ref().map(sqlx::types::Json))
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("update_record", e))?;

        match row {
            Some(row) => row_to_record(&row),
            None => Err(Self::missing(id)),
        }
    }

    #[instrument(skip(self), fields(record_id = %id), err)]
    async fn delete(&self, id: RecordId) -> DomainResult<Record> {
        let row = sqlx::query(&format!(
            "DELETE FROM records WHERE id = $1 RETURNING {RECORD_COLUMNS}"
        ))
        .bind(id.as_uuid())
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("delete_record", e))?;

        match row {
            Some(row) => row_to_record(&row),
            None => Err(Self::missing(id)),
        }
    }

    #[instrument(skip(self), fields(record_id = %id), err)]
    async fn adjust_stock(&self, id: RecordId, delta: i64) -> DomainResult<Record> {
        // One conditional statement; zero affected rows means either the
        // record is missing or the stock would go negative.
        let row = sqlx::query(&format!(
            r#"
            UPDATE records
            SET qty = qty + $2, last_modified = NOW()
            WHERE id = $1 AND qty + $2 >= 0
            RETURNING {RECORD_COLUMNS}
            "#
        ))
        .bind(id.as_uuid())
        .bind(delta)
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("adjust_stock", e))?;

        if let Some(row) = row {
            return row_to_record(&row);
        }

        let available = sqlx::query("SELECT qty FROM records WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("adjust_stock_available", e))?;

        match available {
            Some(row) => {
                let qty: i64 = row
                    .try_get("qty")
                    .map_err(|e| map_sqlx_error("adjust_stock_available", e))?;
                Err(DomainError::insufficient_stock(qty))
            }
            None => Err(Self::missing(id)),
        }
    }

    #[instrument(skip(self, filter), err)]
    async fn count(&self, filter: &RecordFilter) -> DomainResult<u64> {
        let row = sqlx::query(&format!(
            "SELECT COUNT(*) AS total FROM records WHERE {FILTER_CONDITIONS}"
        ))
        .bind(filter.q.as_deref())
        .bind(filter.artist.as_deref())
        .bind(filter.album.as_deref())
        .bind(filter.format.map(|f| f.as_str()))
        .bind(filter.category.map(|c| c.as_str()))
        .fetch_one(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("count_records", e))?;

        let total: i64 = row
            .try_get("total")
            .map_err(|e| map_sqlx_error("count_records", e))?;
        Ok(total as u64)
    }

    #[instrument(skip(self, filter), err)]
    async fn find(&self, filter: &RecordFilter, page: u32, limit: u32) -> DomainResult<Vec<Record>> {
        let page = page.max(1);
        let offset = (page as i64 - 1) * limit as i64;

        let rows = sqlx::query(&format!(
            r#"
            SELECT {RECORD_COLUMNS} FROM records
            WHERE {FILTER_CONDITIONS}
            ORDER BY created_at DESC, id DESC
            LIMIT $6 OFFSET $7
            "#
        ))
        .bind(filter.q.as_deref())
        .bind(filter.artist.as_deref())
        .bind(filter.album.as_deref())
        .bind(filter.format.map(|f| f.as_str()))
        .bind(filter.category.map(|c| c.as_str()))
        .bind(limit as i64)
        .bind(offset)
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("find_records", e))?;

        rows.iter().map(row_to_record).collect()
    }
}

/// Shared WHERE clause for count/find.
///
/// `$1` is the search term, `$2`/`$3` the exact artist/album filters (only
/// applied when no search term is present), `$4`/`$5` format and category.
const FILTER_CONDITIONS: &str = r#"
    ($1::text IS NULL OR
        to_tsvector('simple', artist || ' ' || album || ' ' || category || ' ' || format)
            @@ plainto_tsquery('simple', $1))
    AND ($1::text IS NOT NULL OR $2::text IS NULL OR lower(artist) = lower($2))
    AND ($1::text IS NOT NULL OR $3::text IS NULL OR lower(album) = lower($3))
    AND ($4::text IS NULL OR format = $4)
    AND ($5::text IS NULL OR category = $5)
"#;

fn row_to_record(row: &sqlx::postgres::PgRow) -> DomainResult<Record> {
    let read = |e: sqlx::Error| map_sqlx_error("read_record_row", e);

    let id: uuid::Uuid = row.try_get("id").map_err(read)?;
    let price_cents: i64 = row.try_get("price_cents").map_err(read)?;
    let format: String = row.try_get("format").map_err(read)?;
    let category: String = row.try_get("category").map_err(read)?;
    let tracklist: sqlx::types::Json<Vec<String>> = row.try_get("tracklist").map_err(read)?;
    let created_at: DateTime<Utc> = row.try_get("created_at").map_err(read)?;
    let last_modified: DateTime<Utc> = row.try_get("last_modified").map_err(read)?;

    Ok(Record {
        id: RecordId::from_uuid(id),
        artist: row.try_get("artist").map_err(read)?,
        album: row.try_get("album").map_err(read)?,
        price_cents: price_cents as u64,
        qty: row.try_get("qty").map_err(read)?,
        format: format
            .parse()
            .map_err(|_| DomainError::internal(format!("corrupt format value '{format}'")))?,
        category: category
            .parse()
            .map_err(|_| DomainError::internal(format!("corrupt category value '{category}'")))?,
        mbid: row.try_get("mbid").map_err(read)?,
        tracklist: tracklist.0,
        created_at,
        last_modified,
    })
}

/// Map SQLx errors to the domain taxonomy.
pub(crate) fn map_sqlx_error(operation: &str, err: sqlx::Error) -> DomainError {
    match err {
        sqlx::Error::Database(db_err) => {
            // 23505: unique constraint violation.
            if db_err.code().as_deref() == Some("23505") {
                return DomainError::DuplicateRecord;
            }
            DomainError::internal(format!("database error in {operation}: {}", db_err.message()))
        }
        sqlx::Error::PoolClosed => {
            DomainError::internal(format!("connection pool closed in {operation}"))
        }
        other => DomainError::internal(format!("sqlx error in {operation}: {other}")),
    }
}
