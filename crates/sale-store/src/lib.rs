//! Persistence for [`Sale`](domain::Sale) aggregates.
//!
//! [`SaleRepository`] is the storage contract; [`InMemorySaleRepository`]
//! backs tests and local runs, [`PostgresSaleRepository`] backs deployments.

pub mod error;
pub mod memory;
pub mod page;
pub mod postgres;
pub mod query;
pub mod store;

pub use common::{SaleId, Version};
pub use error::{Result, StoreError};
pub use memory::InMemorySaleRepository;
pub use page::Page;
pub use postgres::PostgresSaleRepository;
pub use query::{OrderDirection, OrderField, SaleOrdering, SaleQuery, UnknownOrdering};
pub use store::{SaleRepository, SaleRepositoryExt};
