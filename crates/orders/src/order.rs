use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use spindle_core::{DomainError, DomainResult, Entity, OrderId, RecordId};

/// Order status lifecycle. This core only ever produces `Pending`;
/// fulfilment transitions live outside the catalog backend.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderStatus {
    Pending,
    Shipped,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "PENDING",
            OrderStatus::Shipped => "SHIPPED",
            OrderStatus::Cancelled => "CANCELLED",
        }
    }
}

impl core::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl core::str::FromStr for OrderStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(OrderStatus::Pending),
            "SHIPPED" => Ok(OrderStatus::Shipped),
            "CANCELLED" => Ok(OrderStatus::Cancelled),
            other => Err(DomainError::validation(format!(
                "unknown order status '{other}'"
            ))),
        }
    }
}

/// A purchase order against a catalog record.
///
/// References the record by id (foreign relation, not ownership) and is
/// immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub record_id: RecordId,
    pub quantity: i64,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// Build a new pending order. Quantity must be positive.
    pub fn new(record_id: RecordId, quantity: i64, now: DateTime<Utc>) -> DomainResult<Self> {
        if quantity <= 0 {
            return Err(DomainError::validation("quantity must be positive"));
        }

        Ok(Self {
            id: OrderId::new(),
            record_id,
            quantity,
            status: OrderStatus::Pending,
            created_at: now,
        })
    }
}

impl Entity for Order {
    type Id = OrderId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_order_defaults_to_pending() {
        let order = Order::new(RecordId::new(), 2, Utc::now()).unwrap();
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.quantity, 2);
    }

    #[test]
    fn zero_or_negative_quantity_is_rejected() {
        let record_id = RecordId::new();
        assert!(matches!(
            Order::new(record_id, 0, Utc::now()).unwrap_err(),
            DomainError::Validation(_)
        ));
        assert!(matches!(
            Order::new(record_id, -3, Utc::now()).unwrap_err(),
            DomainError::Validation(_)
        ));
    }

    #[test]
    fn status_round_trips_through_strings() {
        for status in [OrderStatus::Pending, OrderStatus::Shipped, OrderStatus::Cancelled] {
            assert_eq!(status.as_str().parse::<OrderStatus>().unwrap(), status);
        }
        assert!("RETURNED".parse::<OrderStatus>().is_err());
    }
}
