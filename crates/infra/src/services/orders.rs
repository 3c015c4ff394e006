use std::sync::Arc;

use chrono::Utc;

use spindle_core::{DomainError, DomainResult, OrderId, RecordId};
use spindle_orders::Order;

use crate::order_store::OrderStore;
use crate::record_store::RecordStore;

/// Order placement and retrieval workflows.
pub struct OrderService {
    orders: Arc<dyn OrderStore>,
    records: Arc<dyn RecordStore>,
}

impl OrderService {
    pub fn new(orders: Arc<dyn OrderStore>, records: Arc<dyn RecordStore>) -> Self {
        Self { orders, records }
    }

    /// Place an order: verify stock, deduct it, persist the order.
    ///
    /// `NotFound` and `InsufficientStock` reach the caller verbatim; any
    /// unexpected fault is normalized to `Internal` carrying the cause's
    /// message. The stock check here is advisory (it produces the precise
    /// error message); the authoritative gate is the store's atomic
    /// `adjust_stock`, whose failures propagate un-retried.
    ///
    /// There is no compensating action if the order insert fails after the
    /// deduction: the stock stays deducted (accepted inconsistency window,
    /// see DESIGN.md).
    pub async fn place_order(&self, record_id: RecordId, quantity: i64) -> DomainResult<Order> {
        self.place_order_inner(record_id, quantity)
            .await
            .map_err(|e| {
                if e.is_business_rule() || matches!(e, DomainError::Validation(_)) {
                    e
                } else {
                    tracing::error!(%record_id, quantity, error = %e, "order placement failed");
                    DomainError::internal(e.to_string())
                }
            })
    }

    async fn place_order_inner(&self, record_id: RecordId, quantity: i64) -> DomainResult<Order> {
        let record = self.records.get(record_id).await?;

        if quantity > record.qty {
            return Err(DomainError::insufficient_stock(record.qty));
        }

        // Validates quantity > 0 before any stock is touched.
        let order = Order::new(record_id, quantity, Utc::now())?;

        self.records.adjust_stock(record_id, -quantity).await?;
        self.orders.insert(order).await
    }

    pub async fn get_order(&self, id: OrderId) -> DomainResult<Order> {
        self.orders.get(id).await
    }

    pub async fn list_orders(&self) -> DomainResult<Vec<Order>> {
        self.orders.list().await
    }

    pub async fn delete_order(&self, id: OrderId) -> DomainResult<Order> {
        self.orders.delete(id).await
    }
}
