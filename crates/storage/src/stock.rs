//! Stock ledger: the authoritative on-hand quantity per product.
//!
//! The count is mutated only through signed deltas applied as a single
//! arithmetic UPDATE at the database, never by read-modify-write in
//! application memory. Two concurrent adjustments to the same product
//! therefore serialize correctly without any caller-held lock. The balance
//! is deliberately not clamped at zero: overselling drives it negative and
//! the rest of the system tolerates that.

use common::ProductId;
use rust_decimal::Decimal;
use sqlx::{PgExecutor, Postgres, Transaction};

use crate::Result;

/// Applies `stock += delta` for the given product inside `tx`.
///
/// Negative deltas commit quantity against an order, positive deltas release
/// it. Returns the number of rows matched; zero means the product does not
/// exist, and the caller decides what that amounts to.
pub async fn adjust(
    tx: &mut Transaction<'_, Postgres>,
    product_id: ProductId,
    delta: Decimal,
) -> Result<u64> {
    let result = sqlx::query("UPDATE products SET stock = stock + $1 WHERE id = $2")
        .bind(delta)
        .bind(product_id.as_uuid())
        .execute(&mut **tx)
        .await?;

    Ok(result.rows_affected())
}

/// Reads the current on-hand balance for a product.
pub async fn balance<'e, E>(executor: E, product_id: ProductId) -> Result<Option<Decimal>>
where
    E: PgExecutor<'e>,
{
    let balance: Option<Decimal> =
        sqlx::query_scalar("SELECT stock FROM products WHERE id = $1")
            .bind(product_id.as_uuid())
            .fetch_optional(executor)
            .await?;

    Ok(balance)
}
