//! Sale domain events.

use chrono::{DateTime, Utc};
use common::{SaleId, SaleItemId};
use serde::{Deserialize, Serialize};

use crate::{DomainEvent, Money};

use super::{BranchId, CustomerId, ProductId, Sale, SaleItem};

/// Notifications emitted after a sale change has been persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum SaleEvent {
    /// Sale was created.
    SaleCreated(SaleCreatedData),

    /// Sale header or lines were modified.
    SaleUpdated(SaleUpdatedData),

    /// Sale was cancelled.
    SaleCancelled(SaleCancelledData),

    /// Sale was deleted.
    SaleDeleted(SaleDeletedData),

    /// A single line of a sale was cancelled.
    ItemCancelled(ItemCancelledData),
}

impl DomainEvent for SaleEvent {
    fn event_type(&self) -> &'static str {
        match self {
            SaleEvent::SaleCreated(_) => "SaleCreated",
            SaleEvent::SaleUpdated(_) => "SaleUpdated",
            SaleEvent::SaleCancelled(_) => "SaleCancelled",
            SaleEvent::SaleDeleted(_) => "SaleDeleted",
            SaleEvent::ItemCancelled(_) => "ItemCancelled",
        }
    }
}

impl SaleEvent {
    /// Returns the sale this event is about.
    pub fn sale_id(&self) -> SaleId {
        match self {
            SaleEvent::SaleCreated(data) => data.sale_id,
            SaleEvent::SaleUpdated(data) => data.sale_id,
            SaleEvent::SaleCancelled(data) => data.sale_id,
            SaleEvent::SaleDeleted(data) => data.sale_id,
            SaleEvent::ItemCancelled(data) => data.sale_id,
        }
    }
}

/// Data for SaleCreated event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleCreatedData {
    pub sale_id: SaleId,
    pub sale_number: String,
    pub sale_date: DateTime<Utc>,
    pub customer_id: CustomerId,
    pub customer_name: String,
    pub branch_id: BranchId,
    pub branch_name: String,
    pub total_amount: Money,
    pub item_count: usize,
    pub created_at: DateTime<Utc>,
}

/// Data for SaleUpdated event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleUpdatedData {
    pub sale_id: SaleId,
    pub sale_number: String,
    pub customer_id: CustomerId,
    pub branch_id: BranchId,
    pub total_amount: Money,
    pub item_count: usize,
    pub updated_at: DateTime<Utc>,
}

/// Data for SaleCancelled event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleCancelledData {
    pub sale_id: SaleId,
    pub sale_number: String,
    pub customer_id: CustomerId,
    pub total_amount: Money,
    pub cancelled_at: DateTime<Utc>,
}

/// Data for SaleDeleted event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleDeletedData {
    pub sale_id: SaleId,
    pub sale_number: String,
    pub customer_id: CustomerId,
    pub deleted_at: DateTime<Utc>,
}

/// Data for ItemCancelled event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemCancelledData {
    pub sale_id: SaleId,
    pub item_id: SaleItemId,
    pub sale_number: String,
    pub product_id: ProductId,
    pub quantity: u32,

    /// Amount of the cancelled line.
    pub item_amount: Money,

    /// Sale total after the cancellation.
    pub sale_total: Money,

    /// Why the line was cancelled, if given.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,

    pub cancelled_at: DateTime<Utc>,
}

// Event constructors
impl SaleEvent {
    pub fn sale_created(sale: &Sale) -> Self {
        SaleEvent::SaleCreated(SaleCreatedData {
            sale_id: sale.id(),
            sale_number: sale.sale_number().to_string(),
            sale_date: sale.sale_date(),
            customer_id: sale.customer_id().clone(),
            customer_name: sale.customer_name().to_string(),
            branch_id: sale.branch_id().clone(),
            branch_name: sale.branch_name().to_string(),
            total_amount: sale.total_amount(),
            item_count: sale.item_count(),
            created_at: sale.created_at(),
        })
    }

    pub fn sale_updated(sale: &Sale) -> Self {
        SaleEvent::SaleUpdated(SaleUpdatedData {
            sale_id: sale.id(),
            sale_number: sale.sale_number().to_string(),
            customer_id: sale.customer_id().clone(),
            branch_id: sale.branch_id().clone(),
            total_amount: sale.total_amount(),
            item_count: sale.item_count(),
            updated_at: sale.updated_at().unwrap_or_else(Utc::now),
        })
    }

    pub fn sale_cancelled(sale: &Sale) -> Self {
        SaleEvent::SaleCancelled(SaleCancelledData {
            sale_id: sale.id(),
            sale_number: sale.sale_number().to_string(),
            customer_id: sale.customer_id().clone(),
            total_amount: sale.total_amount(),
            cancelled_at: sale.updated_at().unwrap_or_else(Utc::now),
        })
    }

    pub fn sale_deleted(sale: &Sale) -> Self {
        SaleEvent::SaleDeleted(SaleDeletedData {
            sale_id: sale.id(),
            sale_number: sale.sale_number().to_string(),
            customer_id: sale.customer_id().clone(),
            deleted_at: Utc::now(),
        })
    }

    pub fn item_cancelled(sale: &Sale, item: &SaleItem, reason: Option<String>) -> Self {
        SaleEvent::ItemCancelled(ItemCancelledData {
            sale_id: sale.id(),
            item_id: item.id(),
            sale_number: sale.sale_number().to_string(),
            product_id: item.product_id().clone(),
            quantity: item.quantity(),
            item_amount: item.total_amount(),
            sale_total: sale.total_amount(),
            reason,
            cancelled_at: sale.updated_at().unwrap_or_else(Utc::now),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sale() -> Sale {
        let mut sale = Sale::new("S-1", "C1", "Jane", "B1", "Main", Utc::now());
        sale.add_item(SaleItem::new("P1", "Widget", 5, Money::from_cents(2000)))
            .unwrap();
        sale
    }

    #[test]
    fn test_event_types_and_topics() {
        let sale = sale();
        let created = SaleEvent::sale_created(&sale);
        assert_eq!(created.event_type(), "SaleCreated");
        assert_eq!(created.topic(), "sales-salecreated");

        let item = &sale.items()[0];
        let cancelled = SaleEvent::item_cancelled(&sale, item, None);
        assert_eq!(cancelled.event_type(), "ItemCancelled");
        assert_eq!(cancelled.topic(), "sales-itemcancelled");
        assert_eq!(cancelled.sale_id(), sale.id());
    }

    #[test]
    fn test_created_event_carries_denormalized_fields() {
        let sale = sale();
        let SaleEvent::SaleCreated(data) = SaleEvent::sale_created(&sale) else {
            panic!("expected SaleCreated");
        };
        assert_eq!(data.sale_number, "S-1");
        assert_eq!(data.customer_name, "Jane");
        assert_eq!(data.total_amount.cents(), 9000);
        assert_eq!(data.item_count, 1);
    }

    #[test]
    fn test_serialized_shape_is_tagged() {
        let event = SaleEvent::sale_deleted(&sale());
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "SaleDeleted");
        assert_eq!(json["data"]["sale_number"], "S-1");

        let restored: SaleEvent = serde_json::from_value(json).unwrap();
        assert_eq!(restored, event);
    }

    #[test]
    fn test_reason_is_omitted_when_absent() {
        let sale = sale();
        let event = SaleEvent::item_cancelled(&sale, &sale.items()[0], None);
        let json = serde_json::to_value(&event).unwrap();
        assert!(json["data"].get("reason").is_none());
    }
}
