//! Order lifecycle types and the service that drives them.

mod service;
mod status;
mod types;

pub use service::OrderService;
pub use status::OrderStatus;
pub use types::{Order, OrderDraft, OrderItem, OrderLine};

use rust_decimal::Decimal;
use thiserror::Error;

/// Errors that can occur during order operations.
#[derive(Debug, Error)]
pub enum OrderError {
    /// Mutation attempted on a cancelled order. Cancelled is terminal.
    #[error("this order is cancelled and cannot be altered")]
    OrderCancelled,

    /// The requested status change is not in the transition table.
    #[error("Invalid status transition: {from} -> {to}")]
    InvalidTransition { from: OrderStatus, to: OrderStatus },

    /// Line item quantity must be strictly positive.
    #[error("Invalid quantity: {quantity} (must be greater than 0)")]
    InvalidQuantity { quantity: Decimal },

    /// Unit prices may be zero (giveaways) but never negative.
    #[error("Invalid unit price: {price} (must not be negative)")]
    InvalidUnitPrice { price: Decimal },

    /// Shipping fee must not be negative.
    #[error("Invalid shipping fee: {fee} (must not be negative)")]
    InvalidShippingFee { fee: Decimal },

    /// Status string did not parse.
    #[error("Unknown order status: {value:?}")]
    UnknownStatus { value: String },

    /// Create and full update cannot carry status Cancelled; cancellation
    /// goes through the status operation so stock is released exactly once.
    #[error("an order cannot be written with status Cancelled; use the status operation")]
    CancelledStatusInPayload,
}
