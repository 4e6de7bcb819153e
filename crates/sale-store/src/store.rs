use async_trait::async_trait;
use domain::Sale;

use crate::{Page, Result, SaleId, SaleQuery, StoreError, Version};

/// Core trait for sale repositories.
///
/// Writes are atomic per sale and guarded by the sale's [`Version`].
/// All implementations must be thread-safe (Send + Sync).
#[async_trait]
pub trait SaleRepository: Send + Sync {
    /// Stores a new sale.
    ///
    /// The stored copy, returned here, is at [`Version::first`]. Fails with
    /// `AlreadyExists` if a sale with the same id is present.
    async fn create(&self, sale: Sale) -> Result<Sale>;

    /// Retrieves a sale by id.
    async fn get_by_id(&self, id: SaleId) -> Result<Option<Sale>>;

    /// Replaces a stored sale.
    ///
    /// The stored version must equal `sale.version()`, otherwise the write
    /// fails with `ConcurrencyConflict`. Returns the new version.
    async fn update(&self, sale: &Sale) -> Result<Version>;

    /// Removes a sale. Returns false if it did not exist.
    async fn delete(&self, id: SaleId) -> Result<bool>;

    /// Lists sales matching a query, one page at a time.
    async fn list(&self, query: &SaleQuery) -> Result<Page<Sale>>;
}

/// Extension trait providing convenience methods for sale repositories.
#[async_trait]
pub trait SaleRepositoryExt: SaleRepository {
    /// Retrieves a sale, failing with `NotFound` if absent.
    async fn load(&self, id: SaleId) -> Result<Sale> {
        self.get_by_id(id).await?.ok_or(StoreError::NotFound(id))
    }

    /// Checks if a sale exists.
    async fn exists(&self, id: SaleId) -> Result<bool> {
        Ok(self.get_by_id(id).await?.is_some())
    }

    /// Updates a sale and writes the new version back into it.
    async fn save(&self, sale: &mut Sale) -> Result<Version> {
        let version = self.update(sale).await?;
        sale.set_version(version);
        Ok(version)
    }
}

// Blanket implementation for all SaleRepository implementations
impl<T: SaleRepository + ?Sized> SaleRepositoryExt for T {}
