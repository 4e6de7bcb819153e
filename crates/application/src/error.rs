//! Application error types.

use common::{SaleId, SaleItemId};
use domain::{SaleError, ValidationResult};
use sale_store::StoreError;
use thiserror::Error;

/// Errors that can occur while running a sale use case.
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// The command or the resulting sale failed validation.
    #[error("Validation failed: {0}")]
    Validation(ValidationResult),

    #[error("Sale not found: {0}")]
    SaleNotFound(SaleId),

    #[error("Item {item_id} not found in sale {sale_id}")]
    ItemNotFound {
        sale_id: SaleId,
        item_id: SaleItemId,
    },

    /// The aggregate rejected the operation.
    #[error(transparent)]
    Domain(#[from] SaleError),

    /// The repository failed.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

impl From<ValidationResult> for ApplicationError {
    fn from(result: ValidationResult) -> Self {
        ApplicationError::Validation(result)
    }
}

/// Convenience type alias for application results.
pub type Result<T> = std::result::Result<T, ApplicationError>;
