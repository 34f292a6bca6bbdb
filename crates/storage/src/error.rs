use thiserror::Error;

/// Errors that can occur in the persistence layer.
///
/// Anything surfacing here means the enclosing transaction did not commit;
/// partial writes never survive.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Underlying database failure (deadlock, connection loss, constraint
    /// violation). Never retried at this layer.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}
