//! Sale use cases.
//!
//! [`SaleService`] validates incoming commands, applies them to the
//! [`Sale`](domain::Sale) aggregate, persists the result through a
//! [`SaleRepository`](sale_store::SaleRepository) and announces the change
//! through a [`MessageBroker`](message_broker::MessageBroker).

pub mod commands;
pub mod error;
pub mod service;

pub use commands::{
    CancelItem, CancelSale, CreateSale, CreateSaleItem, DeleteSale, GetSales, UpdateSale,
    UpdateSaleItem,
};
pub use error::{ApplicationError, Result};
pub use service::SaleService;
