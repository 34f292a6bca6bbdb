//! Product catalog repository.
//!
//! Absolute `stock` writes happen only here, as baseline maintenance by the
//! catalog owner. The order path never assigns stock directly; it goes
//! through [`crate::stock::adjust`].

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use sqlx::prelude::FromRow;
use uuid::Uuid;

use crate::Result;

/// A catalog product row.
#[derive(Debug, Clone, FromRow)]
pub struct ProductRow {
    pub id: Uuid,
    pub name: String,
    pub sell_price: Decimal,
    pub stock: Decimal,
    pub created_at: DateTime<Utc>,
}

/// Inserts a product with an initial stock baseline.
pub async fn insert(
    pool: &PgPool,
    id: Uuid,
    name: &str,
    sell_price: Decimal,
    stock: Decimal,
) -> Result<()> {
    sqlx::query("INSERT INTO products (id, name, sell_price, stock) VALUES ($1, $2, $3, $4)")
        .bind(id)
        .bind(name)
        .bind(sell_price)
        .bind(stock)
        .execute(pool)
        .await?;

    Ok(())
}

/// Fetches one product.
pub async fn fetch(pool: &PgPool, id: Uuid) -> Result<Option<ProductRow>> {
    let row = sqlx::query_as::<_, ProductRow>(
        "SELECT id, name, sell_price, stock, created_at FROM products WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Lists the catalog, newest first.
pub async fn list(pool: &PgPool) -> Result<Vec<ProductRow>> {
    let rows = sqlx::query_as::<_, ProductRow>(
        "SELECT id, name, sell_price, stock, created_at FROM products ORDER BY created_at DESC",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Replaces a product's name, price, and stock baseline.
pub async fn update(
    pool: &PgPool,
    id: Uuid,
    name: &str,
    sell_price: Decimal,
    stock: Decimal,
) -> Result<u64> {
    let result =
        sqlx::query("UPDATE products SET name = $1, sell_price = $2, stock = $3 WHERE id = $4")
            .bind(name)
            .bind(sell_price)
            .bind(stock)
            .bind(id)
            .execute(pool)
            .await?;

    Ok(result.rows_affected())
}

/// Deletes a product.
pub async fn delete(pool: &PgPool, id: Uuid) -> Result<u64> {
    let result = sqlx::query("DELETE FROM products WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}
