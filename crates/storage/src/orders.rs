//! Transaction-scoped statements for order headers and line items.
//!
//! These functions are deliberately dumb: each one issues a single statement
//! against the caller's transaction. Sequencing them into a consistent order
//! operation (status guard first, stock deltas and row writes in the same
//! transaction) is the domain layer's job.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::prelude::FromRow;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::Result;

/// A persisted order header.
#[derive(Debug, Clone, FromRow)]
pub struct OrderRow {
    pub id: Uuid,
    pub client_id: Option<Uuid>,
    pub order_date: DateTime<Utc>,
    pub payment_method: Option<String>,
    pub notes: Option<String>,
    pub shipping_fee: Decimal,
    pub total_value: Decimal,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

/// A persisted line item, exclusively owned by one order.
#[derive(Debug, Clone, FromRow)]
pub struct LineItemRow {
    pub id: Uuid,
    pub order_id: Uuid,
    pub product_id: Uuid,
    pub quantity: Decimal,
    pub unit_price: Decimal,
    pub line_total: Decimal,
}

/// Header fields written on insert and full update.
///
/// `total_value` is always recomputed by the caller from the line items; it
/// is never taken verbatim from client input.
#[derive(Debug, Clone)]
pub struct OrderHeader {
    pub client_id: Option<Uuid>,
    pub order_date: DateTime<Utc>,
    pub payment_method: Option<String>,
    pub notes: Option<String>,
    pub shipping_fee: Decimal,
    pub total_value: Decimal,
    pub status: String,
}

/// Inserts a new order header.
pub async fn insert(
    tx: &mut Transaction<'_, Postgres>,
    id: Uuid,
    header: &OrderHeader,
) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO orders (id, client_id, order_date, payment_method, notes, shipping_fee, total_value, status)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        "#,
    )
    .bind(id)
    .bind(header.client_id)
    .bind(header.order_date)
    .bind(&header.payment_method)
    .bind(&header.notes)
    .bind(header.shipping_fee)
    .bind(header.total_value)
    .bind(&header.status)
    .execute(&mut **tx)
    .await?;

    Ok(())
}

/// Replaces every header field of an existing order.
pub async fn update_header(
    tx: &mut Transaction<'_, Postgres>,
    id: Uuid,
    header: &OrderHeader,
) -> Result<u64> {
    let result = sqlx::query(
        r#"
        UPDATE orders
        SET client_id = $1, order_date = $2, payment_method = $3, notes = $4,
            shipping_fee = $5, total_value = $6, status = $7
        WHERE id = $8
        "#,
    )
    .bind(header.client_id)
    .bind(header.order_date)
    .bind(&header.payment_method)
    .bind(&header.notes)
    .bind(header.shipping_fee)
    .bind(header.total_value)
    .bind(&header.status)
    .bind(id)
    .execute(&mut **tx)
    .await?;

    Ok(result.rows_affected())
}

/// Reads the order's current status while taking a row lock on the header.
///
/// Every status-sensitive operation starts here so that a concurrent
/// cancel/delete race on the same order serializes instead of double-releasing
/// stock. Returns `None` when the order does not exist.
pub async fn lock_status(
    tx: &mut Transaction<'_, Postgres>,
    id: Uuid,
) -> Result<Option<String>> {
    let status: Option<String> =
        sqlx::query_scalar("SELECT status FROM orders WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut **tx)
            .await?;

    Ok(status)
}

/// Persists a new status on the order header.
pub async fn set_status(
    tx: &mut Transaction<'_, Postgres>,
    id: Uuid,
    status: &str,
) -> Result<u64> {
    let result = sqlx::query("UPDATE orders SET status = $1 WHERE id = $2")
        .bind(status)
        .bind(id)
        .execute(&mut **tx)
        .await?;

    Ok(result.rows_affected())
}

/// Reads every line item currently attached to the order, inside `tx`.
pub async fn line_items(
    tx: &mut Transaction<'_, Postgres>,
    order_id: Uuid,
) -> Result<Vec<LineItemRow>> {
    let rows = sqlx::query_as::<_, LineItemRow>(
        r#"
        SELECT id, order_id, product_id, quantity, unit_price, line_total
        FROM order_items
        WHERE order_id = $1
        "#,
    )
    .bind(order_id)
    .fetch_all(&mut **tx)
    .await?;

    Ok(rows)
}

/// Inserts one line item for the order.
pub async fn insert_line_item(
    tx: &mut Transaction<'_, Postgres>,
    id: Uuid,
    order_id: Uuid,
    product_id: Uuid,
    quantity: Decimal,
    unit_price: Decimal,
    line_total: Decimal,
) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO order_items (id, order_id, product_id, quantity, unit_price, line_total)
        VALUES ($1, $2, $3, $4, $5, $6)
        "#,
    )
    .bind(id)
    .bind(order_id)
    .bind(product_id)
    .bind(quantity)
    .bind(unit_price)
    .bind(line_total)
    .execute(&mut **tx)
    .await?;

    Ok(())
}

/// Deletes every line item attached to the order.
pub async fn delete_line_items(tx: &mut Transaction<'_, Postgres>, order_id: Uuid) -> Result<u64> {
    let result = sqlx::query("DELETE FROM order_items WHERE order_id = $1")
        .bind(order_id)
        .execute(&mut **tx)
        .await?;

    Ok(result.rows_affected())
}

/// Deletes the order header row.
pub async fn delete(tx: &mut Transaction<'_, Postgres>, id: Uuid) -> Result<u64> {
    let result = sqlx::query("DELETE FROM orders WHERE id = $1")
        .bind(id)
        .execute(&mut **tx)
        .await?;

    Ok(result.rows_affected())
}

/// Fetches one order header with its line items, outside any transaction.
pub async fn fetch(pool: &PgPool, id: Uuid) -> Result<Option<(OrderRow, Vec<LineItemRow>)>> {
    let header = sqlx::query_as::<_, OrderRow>(
        r#"
        SELECT id, client_id, order_date, payment_method, notes,
               shipping_fee, total_value, status, created_at
        FROM orders
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    let Some(header) = header else {
        return Ok(None);
    };

    let items = sqlx::query_as::<_, LineItemRow>(
        r#"
        SELECT id, order_id, product_id, quantity, unit_price, line_total
        FROM order_items
        WHERE order_id = $1
        "#,
    )
    .bind(id)
    .fetch_all(pool)
    .await?;

    Ok(Some((header, items)))
}

/// Lists all order headers, newest first.
pub async fn list(pool: &PgPool) -> Result<Vec<OrderRow>> {
    let rows = sqlx::query_as::<_, OrderRow>(
        r#"
        SELECT id, client_id, order_date, payment_method, notes,
               shipping_fee, total_value, status, created_at
        FROM orders
        ORDER BY created_at DESC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
