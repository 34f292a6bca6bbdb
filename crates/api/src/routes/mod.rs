//! HTTP route handlers.

pub mod clients;
pub mod health;
pub mod metrics;
pub mod orders;
pub mod products;
