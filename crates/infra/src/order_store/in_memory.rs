use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use spindle_core::{DomainError, DomainResult, Entity, OrderId};
use spindle_orders::Order;

use super::OrderStore;

/// In-memory order store. Intended for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryOrderStore {
    orders: RwLock<HashMap<OrderId, Order>>,
}

impl InMemoryOrderStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock_poisoned() -> DomainError {
        DomainError::internal("order store lock poisoned")
    }

    fn missing(id: OrderId) -> DomainError {
        DomainError::not_found(format!("order with id {id} not found"))
    }
}

#[async_trait]
impl OrderStore for InMemoryOrderStore {
    async fn insert(&self, order: Order) -> DomainResult<Order> {
        let mut map = self.orders.write().map_err(|_| Self::lock_poisoned())?;
        map.insert(*order.id(), order.clone());
        Ok(order)
    }

    async fn get(&self, id: OrderId) -> DomainResult<Order> {
        let map = self.orders.read().map_err(|_| Self::lock_poisoned())?;
        map.get(&id).cloned().ok_or_else(|| Self::missing(id))
    }

    async fn list(&self) -> DomainResult<Vec<Order>> {
        let map = self.orders.read().map_err(|_| Self::lock_poisoned())?;
        let mut orders: Vec<Order> = map.values().cloned().collect();
        orders.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(orders)
    }

    async fn delete(&self, id: OrderId) -> DomainResult<Order> {
        let mut map = self.orders.write().map_err(|_| Self::lock_poisoned())?;
        map.remove(&id).ok_or_else(|| Self::missing(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use spindle_core::RecordId;

    #[tokio::test]
    async fn insert_then_get_round_trips() {
        let store = InMemoryOrderStore::new();
        let order = Order::new(RecordId::new(), 2, Utc::now()).unwrap();

        store.insert(order.clone()).await.unwrap();
        let fetched = store.get(order.id).await.unwrap();
        assert_eq!(fetched, order);
    }

    #[tokio::test]
    async fn get_on_a_missing_order_is_not_found() {
        let store = InMemoryOrderStore::new();
        let err = store.get(OrderId::new()).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));
    }

    #[tokio::test]
    async fn list_returns_newest_first() {
        let store = InMemoryOrderStore::new();
        let record_id = RecordId::new();
        for qty in 1..=3 {
            let order = Order::new(record_id, qty, Utc::now()).unwrap();
            store.insert(order).await.unwrap();
        }

        let orders = store.list().await.unwrap();
        assert_eq!(orders.len(), 3);
        assert!(orders.windows(2).all(|w| w[0].created_at >= w[1].created_at));
    }

    #[tokio::test]
    async fn delete_removes_the_order() {
        let store = InMemoryOrderStore::new();
        let order = Order::new(RecordId::new(), 1, Utc::now()).unwrap();
        store.insert(order.clone()).await.unwrap();

        store.delete(order.id).await.unwrap();
        assert!(store.get(order.id).await.is_err());
        assert!(store.delete(order.id).await.is_err());
    }
}
