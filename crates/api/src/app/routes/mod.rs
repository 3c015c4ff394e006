use axum::Router;

pub mod orders;
pub mod records;
pub mod system;

/// Router for all catalog/order endpoints.
pub fn router() -> Router {
    Router::new().merge(records::router()).merge(orders::router())
}
