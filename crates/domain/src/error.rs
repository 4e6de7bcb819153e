//! Domain error types.

use thiserror::Error;

use crate::sale::SaleStatus;

/// Contract violations raised by the sale aggregate.
///
/// These indicate misuse of the aggregate API rather than bad user input;
/// user input problems are reported through [`crate::ValidationResult`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SaleError {
    /// A line item exceeds the per-product quantity ceiling.
    #[error("Invalid quantity {quantity}: cannot sell more than 20 identical items")]
    InvalidQuantity { quantity: u32 },

    /// The sale is not in a state that allows the requested action.
    #[error("Invalid state transition: cannot {action} a sale in {current} state")]
    InvalidStateTransition {
        current: SaleStatus,
        action: &'static str,
    },
}
