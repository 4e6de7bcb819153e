//! Shared types used across the sales workspace.

mod types;
mod version;

pub use types::{SaleId, SaleItemId};
pub use version::Version;

#[doc(hidden)]
pub use uuid;
pub use uuid::Uuid;
