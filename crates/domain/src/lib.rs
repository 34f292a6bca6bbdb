//! Order lifecycle and inventory-consistency engine.
//!
//! The invariant this crate preserves across every operation: for any product,
//!
//! ```text
//! stock == baseline − Σ(quantity of line items in non-Cancelled orders)
//! ```
//!
//! enforced procedurally by pairing every line-item write with a signed stock
//! delta inside one transaction, and by guarding every mutation on the
//! order's current status.

mod error;
pub mod order;

pub use error::DomainError;
pub use order::{Order, OrderDraft, OrderError, OrderItem, OrderLine, OrderService, OrderStatus};
