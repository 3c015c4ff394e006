//! Purchase order persistence.

pub mod in_memory;
pub mod postgres;

pub use in_memory::InMemoryOrderStore;
pub use postgres::PostgresOrderStore;

use async_trait::async_trait;

use spindle_core::{DomainResult, OrderId};
use spindle_orders::Order;

/// Order persistence. Orders are immutable once inserted; there is no
/// update operation.
#[async_trait]
pub trait OrderStore: Send + Sync {
    async fn insert(&self, order: Order) -> DomainResult<Order>;

    async fn get(&self, id: OrderId) -> DomainResult<Order>;

    /// All orders, newest first.
    async fn list(&self) -> DomainResult<Vec<Order>>;

    async fn delete(&self, id: OrderId) -> DomainResult<Order>;
}
