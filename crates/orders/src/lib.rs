//! `spindle-orders` — the purchase order domain.

pub mod order;

pub use order::{Order, OrderStatus};
