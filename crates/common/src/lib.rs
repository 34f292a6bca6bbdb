//! Shared types used across the bakery order system.

mod types;

pub use types::{ClientId, OrderId, ProductId};
