//! Order value types: line items, write drafts, and the read model.

use chrono::{DateTime, Utc};
use common::{ClientId, OrderId, ProductId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use storage::orders::{LineItemRow, OrderHeader, OrderRow};

use super::{OrderError, OrderStatus};

/// One line of an order: a product commitment at a captured unit price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLine {
    pub product_id: ProductId,
    /// Strictly positive. Fractional quantities are legitimate (goods sold
    /// by weight).
    pub quantity: Decimal,
    /// Captured from the catalog at order time; zero is allowed, negative is
    /// not.
    pub unit_price: Decimal,
}

impl OrderLine {
    pub fn new(product_id: ProductId, quantity: Decimal, unit_price: Decimal) -> Self {
        Self {
            product_id,
            quantity,
            unit_price,
        }
    }

    /// `quantity × unit_price`.
    pub fn line_total(&self) -> Decimal {
        self.quantity * self.unit_price
    }
}

/// Full write payload for create and full update.
///
/// Carries everything except the id and the derived total, which is always
/// recomputed here rather than trusted from the caller.
#[derive(Debug, Clone)]
pub struct OrderDraft {
    pub client_id: Option<ClientId>,
    pub order_date: DateTime<Utc>,
    pub payment_method: Option<String>,
    pub notes: Option<String>,
    pub shipping_fee: Decimal,
    /// Initial/replacement status. Never `Cancelled`: cancellation must go
    /// through the status operation so stock release happens exactly once.
    pub status: OrderStatus,
    pub items: Vec<OrderLine>,
}

impl OrderDraft {
    /// Checks every field-level rule before any row is touched.
    pub fn validate(&self) -> Result<(), OrderError> {
        if self.shipping_fee < Decimal::ZERO {
            return Err(OrderError::InvalidShippingFee {
                fee: self.shipping_fee,
            });
        }
        if self.status == OrderStatus::Cancelled {
            return Err(OrderError::CancelledStatusInPayload);
        }
        for line in &self.items {
            if line.quantity <= Decimal::ZERO {
                return Err(OrderError::InvalidQuantity {
                    quantity: line.quantity,
                });
            }
            if line.unit_price < Decimal::ZERO {
                return Err(OrderError::InvalidUnitPrice {
                    price: line.unit_price,
                });
            }
        }
        Ok(())
    }

    /// Σ(line totals) + shipping fee.
    pub fn total_value(&self) -> Decimal {
        let items: Decimal = self.items.iter().map(OrderLine::line_total).sum();
        items + self.shipping_fee
    }

    pub(crate) fn to_header(&self) -> OrderHeader {
        OrderHeader {
            client_id: self.client_id.map(|id| id.as_uuid()),
            order_date: self.order_date,
            payment_method: self.payment_method.clone(),
            notes: self.notes.clone(),
            shipping_fee: self.shipping_fee,
            total_value: self.total_value(),
            status: self.status.as_str().to_string(),
        }
    }
}

/// A persisted line item as read back from storage.
#[derive(Debug, Clone, Serialize)]
pub struct OrderItem {
    pub product_id: ProductId,
    pub quantity: Decimal,
    pub unit_price: Decimal,
    pub line_total: Decimal,
}

impl From<LineItemRow> for OrderItem {
    fn from(row: LineItemRow) -> Self {
        Self {
            product_id: ProductId::from_uuid(row.product_id),
            quantity: row.quantity,
            unit_price: row.unit_price,
            line_total: row.line_total,
        }
    }
}

/// A persisted order with its line items (read model).
#[derive(Debug, Clone, Serialize)]
pub struct Order {
    pub id: OrderId,
    pub client_id: Option<ClientId>,
    pub order_date: DateTime<Utc>,
    pub payment_method: Option<String>,
    pub notes: Option<String>,
    pub shipping_fee: Decimal,
    pub total_value: Decimal,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub items: Vec<OrderItem>,
}

impl Order {
    pub(crate) fn from_rows(header: OrderRow, items: Vec<LineItemRow>) -> Result<Self, OrderError> {
        Ok(Self {
            id: OrderId::from_uuid(header.id),
            client_id: header.client_id.map(ClientId::from_uuid),
            order_date: header.order_date,
            payment_method: header.payment_method,
            notes: header.notes,
            shipping_fee: header.shipping_fee,
            total_value: header.total_value,
            status: header.status.parse()?,
            created_at: header.created_at,
            items: items.into_iter().map(OrderItem::from).collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn draft(items: Vec<OrderLine>, shipping: Decimal) -> OrderDraft {
        OrderDraft {
            client_id: None,
            order_date: Utc::now(),
            payment_method: Some("cash".to_string()),
            notes: None,
            shipping_fee: shipping,
            status: OrderStatus::New,
            items,
        }
    }

    #[test]
    fn test_line_total() {
        let line = OrderLine::new(ProductId::new(), dec!(2), dec!(5.00));
        assert_eq!(line.line_total(), dec!(10.00));
    }

    #[test]
    fn test_total_is_items_plus_shipping() {
        let d = draft(
            vec![
                OrderLine::new(ProductId::new(), dec!(2), dec!(5.00)),
                OrderLine::new(ProductId::new(), dec!(1.5), dec!(4.00)),
            ],
            dec!(1.00),
        );
        assert_eq!(d.total_value(), dec!(17.00));
    }

    #[test]
    fn test_empty_items_total_is_shipping() {
        let d = draft(vec![], dec!(3.50));
        assert_eq!(d.total_value(), dec!(3.50));
        assert!(d.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_non_positive_quantity() {
        let d = draft(vec![OrderLine::new(ProductId::new(), dec!(0), dec!(5))], dec!(0));
        assert!(matches!(
            d.validate(),
            Err(OrderError::InvalidQuantity { .. })
        ));

        let d = draft(vec![OrderLine::new(ProductId::new(), dec!(-1), dec!(5))], dec!(0));
        assert!(matches!(
            d.validate(),
            Err(OrderError::InvalidQuantity { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_negative_price() {
        let d = draft(
            vec![OrderLine::new(ProductId::new(), dec!(1), dec!(-0.01))],
            dec!(0),
        );
        assert!(matches!(
            d.validate(),
            Err(OrderError::InvalidUnitPrice { .. })
        ));
    }

    #[test]
    fn test_validate_allows_zero_price() {
        let d = draft(vec![OrderLine::new(ProductId::new(), dec!(1), dec!(0))], dec!(0));
        assert!(d.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_negative_shipping() {
        let d = draft(vec![], dec!(-1));
        assert!(matches!(
            d.validate(),
            Err(OrderError::InvalidShippingFee { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_cancelled_payload() {
        let mut d = draft(vec![], dec!(0));
        d.status = OrderStatus::Cancelled;
        assert!(matches!(
            d.validate(),
            Err(OrderError::CancelledStatusInPayload)
        ));
    }
}
