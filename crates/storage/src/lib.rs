//! PostgreSQL persistence layer for the bakery order system.
//!
//! Exposes a thin pool wrapper ([`PgStore`]), the stock ledger (atomic
//! signed-delta updates against a product's on-hand count), transaction-scoped
//! order statements, and plain CRUD repositories for products and clients.
//!
//! Everything that participates in the stock invariant runs inside a
//! caller-supplied [`sqlx::Transaction`]; dropping the transaction without
//! committing rolls back every statement issued through it.

mod error;

pub mod clients;
pub mod orders;
pub mod products;
pub mod stock;

pub use error::StorageError;

use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Postgres, Transaction};

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// Wrapper around a PostgreSQL connection pool.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Creates a store from an existing pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connects to the given database URL.
    pub async fn connect(url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(url)
            .await?;
        Ok(Self { pool })
    }

    /// Gets a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Begins a transaction that rolls back unless committed.
    pub async fn begin(&self) -> Result<Transaction<'static, Postgres>> {
        Ok(self.pool.begin().await?)
    }

    /// Cheap connectivity probe for health checks.
    pub async fn ping(&self) -> Result<()> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await?;
        Ok(())
    }

    /// Runs the database migrations.
    pub async fn run_migrations(&self) -> std::result::Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("../../migrations").run(&self.pool).await
    }
}
