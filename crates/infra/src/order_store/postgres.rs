//! Postgres-backed order store.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row};
use tracing::instrument;

use spindle_core::{DomainError, DomainResult, OrderId, RecordId};
use spindle_orders::Order;

use super::OrderStore;
use crate::record_store::postgres::map_sqlx_error;

const ORDER_COLUMNS: &str = "id, record_id, quantity, status, created_at";

/// Postgres-backed order store.
///
/// The record reference is a plain column, not a foreign key: records may be
/// deleted while orders referencing them remain (source behavior).
#[derive(Debug, Clone)]
pub struct PostgresOrderStore {
    pool: Arc<PgPool>,
}

impl PostgresOrderStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }

    /// Create the orders table if it does not exist yet.
    pub async fn ensure_schema(&self) -> DomainResult<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS orders (
                id UUID PRIMARY KEY,
                record_id UUID NOT NULL,
                quantity BIGINT NOT NULL CHECK (quantity > 0),
                status TEXT NOT NULL,
                created_at TIMESTAMPTZ NOT NULL
            )
            "#,
        )
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("ensure_orders_schema", e))?;
        Ok(())
    }

    fn missing(id: OrderId) -> DomainError {
        DomainError::not_found(format!("order with id {id} not found"))
    }
}

#[async_trait::async_trait]
impl OrderStore for PostgresOrderStore {
    #[instrument(skip(self, order), fields(order_id = %order.id), err)]
    async fn insert(&self, order: Order) -> DomainResult<Order> {
        sqlx::query(
            r#"
            INSERT INTO orders (id, record_id, quantity, status, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(order.id.as_uuid())
        .bind(order.record_id.as_uuid())
        .bind(order.quantity)
        .bind(order.status.as_str())
        .bind(order.created_at)
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("insert_order", e))?;

        Ok(order)
    }

    #[instrument(skip(self), fields(order_id = %id), err)]
    async fn get(&self, id: OrderId) -> DomainResult<Order> {
        let row = sqlx::query(&format!("SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1"))
            .bind(id.as_uuid())
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("get_order", e))?;

        match row {
            Some(row) => row_to_order(&row),
            None => Err(Self::missing(id)),
        }
    }

    #[instrument(skip(self), err)]
    async fn list(&self) -> DomainResult<Vec<Order>> {
        let rows = sqlx::query(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders ORDER BY created_at DESC, id DESC"
        ))
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("list_orders", e))?;

        rows.iter().map(row_to_order).collect()
    }

    #[instrument(skip(self), fields(order_id = %id), err)]
    async fn delete(&self, id: OrderId) -> DomainResult<Order> {
        let row = sqlx::query(&format!(
            "DELETE FROM orders WHERE id = $1 RETURNING {ORDER_COLUMNS}"
        ))
        .bind(id.as_uuid())
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("delete_order", e))?;

        match row {
            Some(row) => row_to_order(&row),
            None => Err(Self::missing(id)),
        }
    }
}

fn row_to_order(row: &sqlx::postgres::PgRow) -> DomainResult<Order> {
    let read = |e: sqlx::Error| map_sqlx_error("read_order_row", e);

    let id: uuid::Uuid = row.try_get("id").map_err(read)?;
    let record_id: uuid::Uuid = row.try_get("record_id").map_err(read)?;
    let status: String = row.try_get("status").map_err(read)?;
    let created_at: DateTime<Utc> = row.try_get("created_at").map_err(read)?;

    Ok(Order {
        id: OrderId::from_uuid(id),
        record_id: RecordId::from_uuid(record_id),
        quantity: row.try_get("quantity").map_err(read)?,
        status: status
            .parse()
            .map_err(|_| DomainError::internal(format!("corrupt order status '{status}'")))?,
        created_at,
    })
}
