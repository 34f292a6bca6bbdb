//! Order service: create, full update, status change, and delete.
//!
//! Every mutating operation runs inside one transaction that covers the
//! status guard, the row writes, and the stock deltas together. An error at
//! any step returns early, dropping the transaction and rolling back every
//! effect, so no partial order and no partial stock adjustment can survive.
//!
//! Status-sensitive operations start by locking the order header
//! (`SELECT ... FOR UPDATE`), which serializes concurrent mutations of the
//! same order. Concurrent orders touching the same product are already safe
//! because each stock delta is a single atomic UPDATE.

use std::str::FromStr;

use common::{OrderId, ProductId};
use storage::{PgStore, orders, stock};
use uuid::Uuid;

use crate::error::DomainError;

use super::{Order, OrderDraft, OrderError, OrderStatus};

/// Service for managing orders against the store.
#[derive(Clone)]
pub struct OrderService {
    store: PgStore,
}

impl OrderService {
    /// Creates a new order service backed by the given store.
    pub fn new(store: PgStore) -> Self {
        Self { store }
    }

    /// Creates an order with its line items, committing stock for each line.
    ///
    /// Inserts the header (status `New` unless the draft says otherwise),
    /// then one row plus one negative stock delta per line item. All of it
    /// commits or none of it does. Returns the new order id.
    #[tracing::instrument(skip(self, draft))]
    pub async fn create(&self, draft: OrderDraft) -> Result<OrderId, DomainError> {
        draft.validate()?;

        let id = OrderId::new();
        let mut tx = self.store.begin().await?;

        orders::insert(&mut tx, id.as_uuid(), &draft.to_header()).await?;

        for line in &draft.items {
            orders::insert_line_item(
                &mut tx,
                Uuid::new_v4(),
                id.as_uuid(),
                line.product_id.as_uuid(),
                line.quantity,
                line.unit_price,
                line.line_total(),
            )
            .await?;

            let matched = stock::adjust(&mut tx, line.product_id, -line.quantity).await?;
            if matched == 0 {
                return Err(DomainError::ProductNotFound(line.product_id));
            }
        }

        tx.commit().await.map_err(storage::StorageError::from)?;

        metrics::counter!("orders_created_total").increment(1);
        tracing::info!(order_id = %id, "order created");
        Ok(id)
    }

    /// Replaces the order's header and entire item set.
    ///
    /// Releases the stock of every existing line, deletes them, then inserts
    /// and commits the new lines. Release-all-then-recommit-all is
    /// intentional: the net stock effect is correct whether or not the new
    /// item set repeats the same products, at the cost of two extra writes
    /// per unchanged line.
    #[tracing::instrument(skip(self, draft))]
    pub async fn update(&self, id: OrderId, draft: OrderDraft) -> Result<(), DomainError> {
        draft.validate()?;

        let mut tx = self.store.begin().await?;

        let current = orders::lock_status(&mut tx, id.as_uuid())
            .await?
            .ok_or(DomainError::OrderNotFound(id))?;
        let current = OrderStatus::from_str(&current).map_err(DomainError::Order)?;
        if !current.can_modify() {
            return Err(OrderError::OrderCancelled.into());
        }

        orders::update_header(&mut tx, id.as_uuid(), &draft.to_header()).await?;

        // Release previously committed stock unconditionally before the item
        // set is replaced.
        for item in orders::line_items(&mut tx, id.as_uuid()).await? {
            stock::adjust(&mut tx, ProductId::from_uuid(item.product_id), item.quantity).await?;
        }
        orders::delete_line_items(&mut tx, id.as_uuid()).await?;

        for line in &draft.items {
            orders::insert_line_item(
                &mut tx,
                Uuid::new_v4(),
                id.as_uuid(),
                line.product_id.as_uuid(),
                line.quantity,
                line.unit_price,
                line.line_total(),
            )
            .await?;

            let matched = stock::adjust(&mut tx, line.product_id, -line.quantity).await?;
            if matched == 0 {
                return Err(DomainError::ProductNotFound(line.product_id));
            }
        }

        tx.commit().await.map_err(storage::StorageError::from)?;

        metrics::counter!("orders_updated_total").increment(1);
        tracing::info!(order_id = %id, "order updated");
        Ok(())
    }

    /// Transitions the order to a new status.
    ///
    /// Cancellation releases the stock of every current line exactly once,
    /// at the moment of the transition; the guard on the current status
    /// makes a retried cancellation fail instead of double-releasing.
    /// Transitions to `Completed` never touch stock.
    #[tracing::instrument(skip(self))]
    pub async fn change_status(
        &self,
        id: OrderId,
        new_status: OrderStatus,
    ) -> Result<(), DomainError> {
        let mut tx = self.store.begin().await?;

        let current = orders::lock_status(&mut tx, id.as_uuid())
            .await?
            .ok_or(DomainError::OrderNotFound(id))?;
        let current = OrderStatus::from_str(&current).map_err(DomainError::Order)?;

        if current == OrderStatus::Cancelled {
            return Err(OrderError::OrderCancelled.into());
        }
        if !current.can_transition_to(new_status) {
            return Err(OrderError::InvalidTransition {
                from: current,
                to: new_status,
            }
            .into());
        }

        if new_status == OrderStatus::Cancelled {
            for item in orders::line_items(&mut tx, id.as_uuid()).await? {
                stock::adjust(&mut tx, ProductId::from_uuid(item.product_id), item.quantity)
                    .await?;
            }
        }

        orders::set_status(&mut tx, id.as_uuid(), new_status.as_str()).await?;
        tx.commit().await.map_err(storage::StorageError::from)?;

        metrics::counter!("orders_status_changes_total").increment(1);
        tracing::info!(order_id = %id, from = %current, to = %new_status, "order status changed");
        Ok(())
    }

    /// Deletes the order and its line items.
    ///
    /// Deleting a still-active order behaves like an implicit cancellation
    /// for stock accounting: every line is released first. Deleting a
    /// cancelled order releases nothing, since that already happened at
    /// cancellation time.
    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, id: OrderId) -> Result<(), DomainError> {
        let mut tx = self.store.begin().await?;

        let current = orders::lock_status(&mut tx, id.as_uuid())
            .await?
            .ok_or(DomainError::OrderNotFound(id))?;
        let current = OrderStatus::from_str(&current).map_err(DomainError::Order)?;

        if current != OrderStatus::Cancelled {
            for item in orders::line_items(&mut tx, id.as_uuid()).await? {
                stock::adjust(&mut tx, ProductId::from_uuid(item.product_id), item.quantity)
                    .await?;
            }
        }

        orders::delete_line_items(&mut tx, id.as_uuid()).await?;
        orders::delete(&mut tx, id.as_uuid()).await?;
        tx.commit().await.map_err(storage::StorageError::from)?;

        metrics::counter!("orders_deleted_total").increment(1);
        tracing::info!(order_id = %id, "order deleted");
        Ok(())
    }

    /// Loads an order with its line items.
    #[tracing::instrument(skip(self))]
    pub async fn get(&self, id: OrderId) -> Result<Order, DomainError> {
        let (header, items) = orders::fetch(self.store.pool(), id.as_uuid())
            .await?
            .ok_or(DomainError::OrderNotFound(id))?;

        Ok(Order::from_rows(header, items)?)
    }

    /// Lists all orders (headers only), newest first.
    #[tracing::instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<Order>, DomainError> {
        let rows = orders::list(self.store.pool()).await?;
        rows.into_iter()
            .map(|row| Order::from_rows(row, Vec::new()).map_err(DomainError::from))
            .collect()
    }
}
