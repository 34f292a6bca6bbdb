//! Client repository. Plain CRUD; orders reference clients by id only.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use sqlx::prelude::FromRow;
use uuid::Uuid;

use crate::Result;

/// A client row.
#[derive(Debug, Clone, FromRow)]
pub struct ClientRow {
    pub id: Uuid,
    pub name: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Inserts a client.
pub async fn insert(
    pool: &PgPool,
    id: Uuid,
    name: &str,
    phone: Option<&str>,
    address: Option<&str>,
) -> Result<()> {
    sqlx::query("INSERT INTO clients (id, name, phone, address) VALUES ($1, $2, $3, $4)")
        .bind(id)
        .bind(name)
        .bind(phone)
        .bind(address)
        .execute(pool)
        .await?;

    Ok(())
}

/// Fetches one client.
pub async fn fetch(pool: &PgPool, id: Uuid) -> Result<Option<ClientRow>> {
    let row = sqlx::query_as::<_, ClientRow>(
        "SELECT id, name, phone, address, created_at FROM clients WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Lists clients alphabetically.
pub async fn list(pool: &PgPool) -> Result<Vec<ClientRow>> {
    let rows = sqlx::query_as::<_, ClientRow>(
        "SELECT id, name, phone, address, created_at FROM clients ORDER BY name ASC",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Replaces a client's contact fields.
pub async fn update(
    pool: &PgPool,
    id: Uuid,
    name: &str,
    phone: Option<&str>,
    address: Option<&str>,
) -> Result<u64> {
    let result =
        sqlx::query("UPDATE clients SET name = $1, phone = $2, address = $3 WHERE id = $4")
            .bind(name)
            .bind(phone)
            .bind(address)
            .bind(id)
            .execute(pool)
            .await?;

    Ok(result.rows_affected())
}

/// Deletes a client.
pub async fn delete(pool: &PgPool, id: Uuid) -> Result<u64> {
    let result = sqlx::query("DELETE FROM clients WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}
