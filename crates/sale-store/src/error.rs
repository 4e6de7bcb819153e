use thiserror::Error;

use crate::{SaleId, Version};

/// Errors that can occur when interacting with the sale store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The sale was not found.
    #[error("Sale not found: {0}")]
    NotFound(SaleId),

    /// A sale with this id has already been stored.
    #[error("Sale already exists: {0}")]
    AlreadyExists(SaleId),

    /// The stored version did not match the version the caller read.
    #[error("Concurrency conflict for sale {sale_id}: expected version {expected}, found {actual}")]
    ConcurrencyConflict {
        sale_id: SaleId,
        expected: Version,
        actual: Version,
    },

    /// A database error occurred.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A database migration error occurred.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// A serialization/deserialization error occurred.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for sale store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
