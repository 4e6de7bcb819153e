//! Sale aggregate and related types.

mod aggregate;
mod events;
mod item;
mod status;
mod value_objects;

pub use aggregate::Sale;
pub use events::{
    ItemCancelledData, SaleCancelledData, SaleCreatedData, SaleDeletedData, SaleEvent,
    SaleUpdatedData,
};
pub use item::{Discount, MAX_IDENTICAL_ITEMS, MAX_UNIT_PRICE, SaleItem};
pub use status::{SaleStatus, UnknownStatus};
pub use value_objects::{BranchId, CustomerId, ProductId};
