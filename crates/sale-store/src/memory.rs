use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use domain::Sale;
use tokio::sync::RwLock;

use crate::{Page, Result, SaleId, SaleQuery, StoreError, Version, store::SaleRepository};

/// In-memory sale repository.
///
/// Provides the same semantics as the PostgreSQL implementation, including
/// version checks. Clones share the same storage.
#[derive(Clone, Default)]
pub struct InMemorySaleRepository {
    sales: Arc<RwLock<HashMap<SaleId, Sale>>>,
}

impl InMemorySaleRepository {
    /// Creates a new empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored sales.
    pub async fn len(&self) -> usize {
        self.sales.read().await.len()
    }

    /// Returns true if no sales are stored.
    pub async fn is_empty(&self) -> bool {
        self.sales.read().await.is_empty()
    }

    /// Removes every sale.
    pub async fn clear(&self) {
        self.sales.write().await.clear();
    }
}

#[async_trait]
impl SaleRepository for InMemorySaleRepository {
    async fn create(&self, mut sale: Sale) -> Result<Sale> {
        let mut store = self.sales.write().await;

        if store.contains_key(&sale.id()) {
            return Err(StoreError::AlreadyExists(sale.id()));
        }

        sale.set_version(Version::first());
        store.insert(sale.id(), sale.clone());
        metrics::counter!("sale_store_writes_total", "op" => "create").increment(1);
        Ok(sale)
    }

    async fn get_by_id(&self, id: SaleId) -> Result<Option<Sale>> {
        Ok(self.sales.read().await.get(&id).cloned())
    }

    async fn update(&self, sale: &Sale) -> Result<Version> {
        let mut store = self.sales.write().await;

        let stored = store
            .get_mut(&sale.id())
            .ok_or(StoreError::NotFound(sale.id()))?;

        if stored.version() != sale.version() {
            return Err(StoreError::ConcurrencyConflict {
                sale_id: sale.id(),
                expected: sale.version(),
                actual: stored.version(),
            });
        }

        let next = sale.version().next();
        *stored = sale.clone();
        stored.set_version(next);
        metrics::counter!("sale_store_writes_total", "op" => "update").increment(1);
        Ok(next)
    }

    async fn delete(&self, id: SaleId) -> Result<bool> {
        let removed = self.sales.write().await.remove(&id).is_some();
        if removed {
            metrics::counter!("sale_store_writes_total", "op" => "delete").increment(1);
        }
        Ok(removed)
    }

    async fn list(&self, query: &SaleQuery) -> Result<Page<Sale>> {
        let store = self.sales.read().await;

        let mut matching: Vec<&Sale> = store.values().filter(|s| query.matches(s)).collect();
        matching.sort_by(|a, b| query.ordering.compare(a, b));

        let total_items = matching.len();
        let data = matching
            .into_iter()
            .skip(query.offset())
            .take(query.size)
            .cloned()
            .collect();

        Ok(Page::new(data, query.page, query.size, total_items))
    }
}
