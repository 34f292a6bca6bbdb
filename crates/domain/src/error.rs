//! Domain error types.

use common::{OrderId, ProductId};
use storage::StorageError;
use thiserror::Error;

use crate::order::OrderError;

/// Errors that can occur during domain operations.
#[derive(Debug, Error)]
pub enum DomainError {
    /// Referenced order does not exist.
    #[error("Order not found: {0}")]
    OrderNotFound(OrderId),

    /// A line item referenced a product that does not exist.
    #[error("Product not found: {0}")]
    ProductNotFound(ProductId),

    /// An error occurred in the order rules (validation or lifecycle guard).
    #[error("Order error: {0}")]
    Order(#[from] OrderError),

    /// The underlying transaction could not commit. Always rolled back in
    /// full; never silently retried.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}
