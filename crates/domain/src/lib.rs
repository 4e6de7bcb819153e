//! Domain layer for the sales backend.
//!
//! This crate holds the pure core of the system:
//! - [`Sale`] aggregate root and its owned [`SaleItem`] lines
//! - Quantity-tier [`Discount`] policy and [`Money`] arithmetic
//! - Structured [`ValidationResult`] reporting
//! - [`SaleEvent`] domain events published after persistence
//!
//! Nothing here performs I/O.

pub mod error;
pub mod event;
pub mod money;
pub mod sale;
pub mod validation;

pub use common::{SaleId, SaleItemId, Version};
pub use error::SaleError;
pub use event::DomainEvent;
pub use money::Money;
pub use sale::{
    BranchId, CustomerId, Discount, ItemCancelledData, MAX_IDENTICAL_ITEMS, MAX_UNIT_PRICE,
    ProductId, Sale, SaleCancelledData, SaleCreatedData, SaleDeletedData, SaleEvent, SaleItem,
    SaleStatus, SaleUpdatedData, UnknownStatus,
};
pub use validation::{ValidationErrorDetail, ValidationResult};
