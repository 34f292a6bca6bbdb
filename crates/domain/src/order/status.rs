//! Order state machine.

use serde::{Deserialize, Serialize};

use super::OrderError;

/// The status of an order in its lifecycle.
///
/// Permitted transitions:
/// ```text
/// New ──┬──► Completed ──► Cancelled
///       │
///       └──────────────► Cancelled
/// ```
///
/// `Cancelled` is terminal: no field, item, or status mutation is permitted
/// once reached, and there is no way back to `New` or `Completed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum OrderStatus {
    /// Freshly created, stock committed, awaiting fulfilment.
    #[default]
    New,

    /// Delivered/paid. Stock stays committed; the order can still be
    /// cancelled.
    Completed,

    /// Cancelled (terminal). Stock was released at the moment of
    /// cancellation, exactly once.
    Cancelled,
}

impl OrderStatus {
    /// Returns true if header and items can still be edited.
    pub fn can_modify(&self) -> bool {
        !matches!(self, OrderStatus::Cancelled)
    }

    /// Returns true if the transition `self -> to` is in the table.
    pub fn can_transition_to(&self, to: OrderStatus) -> bool {
        matches!(
            (self, to),
            (OrderStatus::New, OrderStatus::Completed)
                | (OrderStatus::New, OrderStatus::Cancelled)
                | (OrderStatus::Completed, OrderStatus::Cancelled)
        )
    }

    /// Returns true if this is a terminal status.
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Cancelled)
    }

    /// Returns the status name as stored in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::New => "New",
            OrderStatus::Completed => "Completed",
            OrderStatus::Cancelled => "Cancelled",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = OrderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "New" => Ok(OrderStatus::New),
            "Completed" => Ok(OrderStatus::Completed),
            "Cancelled" => Ok(OrderStatus::Cancelled),
            other => Err(OrderError::UnknownStatus {
                value: other.to_string(),
            }),
        }
    }
}
