//! Sale aggregate implementation.

use chrono::{DateTime, Utc};
use common::{SaleId, SaleItemId, Version};
use serde::{Deserialize, Serialize};

use crate::{Money, SaleError, ValidationResult};

use super::{BranchId, CustomerId, SaleItem, SaleStatus};

/// Sale aggregate root.
///
/// Owns its line items; all changes to the item collection go through the
/// methods here so that every line is priced exactly once, when attached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sale {
    id: SaleId,

    /// Row token maintained by the repository for optimistic concurrency.
    #[serde(default)]
    version: Version,

    sale_number: String,
    sale_date: DateTime<Utc>,
    customer_id: CustomerId,
    customer_name: String,
    branch_id: BranchId,
    branch_name: String,
    status: SaleStatus,
    items: Vec<SaleItem>,
    created_at: DateTime<Utc>,
    updated_at: Option<DateTime<Utc>>,
}

impl Sale {
    /// Creates a new active sale with no items.
    pub fn new(
        sale_number: impl Into<String>,
        customer_id: impl Into<CustomerId>,
        customer_name: impl Into<String>,
        branch_id: impl Into<BranchId>,
        branch_name: impl Into<String>,
        sale_date: DateTime<Utc>,
    ) -> Self {
        Self {
            id: SaleId::new(),
            version: Version::initial(),
            sale_number: sale_number.into(),
            sale_date,
            customer_id: customer_id.into(),
            customer_name: customer_name.into(),
            branch_id: branch_id.into(),
            branch_name: branch_name.into(),
            status: SaleStatus::Active,
            items: Vec::new(),
            created_at: Utc::now(),
            updated_at: None,
        }
    }
}

// Query methods
impl Sale {
    pub fn id(&self) -> SaleId {
        self.id
    }

    pub fn version(&self) -> Version {
        self.version
    }

    pub fn sale_number(&self) -> &str {
        &self.sale_number
    }

    pub fn sale_date(&self) -> DateTime<Utc> {
        self.sale_date
    }

    pub fn customer_id(&self) -> &CustomerId {
        &self.customer_id
    }

    pub fn customer_name(&self) -> &str {
        &self.customer_name
    }

    pub fn branch_id(&self) -> &BranchId {
        &self.branch_id
    }

    pub fn branch_name(&self) -> &str {
        &self.branch_name
    }

    pub fn status(&self) -> SaleStatus {
        self.status
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns when the sale was last changed, if ever.
    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }

    /// Returns all items, cancelled ones included, in insertion order.
    pub fn items(&self) -> &[SaleItem] {
        &self.items
    }

    /// Returns the items that have not been cancelled.
    pub fn active_items(&self) -> impl Iterator<Item = &SaleItem> {
        self.items.iter().filter(|item| !item.is_cancelled())
    }

    /// Returns an item by its identifier.
    pub fn get_item(&self, item_id: SaleItemId) -> Option<&SaleItem> {
        self.items.iter().find(|item| item.id() == item_id)
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Returns the sum of every item's total.
    ///
    /// Cancelled items are included.
    pub fn total_amount(&self) -> Money {
        self.items.iter().map(SaleItem::total_amount).sum()
    }

    pub fn is_cancelled(&self) -> bool {
        self.status.is_terminal()
    }
}

// Mutation methods
impl Sale {
    /// Attaches an item to this sale and prices it.
    ///
    /// No merging takes place: the same product added twice yields two lines.
    pub fn add_item(&mut self, mut item: SaleItem) -> Result<(), SaleError> {
        item.apply_discount()?;
        item.attach_to(self.id);

        tracing::trace!(
            sale_id = %self.id,
            item_id = %item.id(),
            quantity = item.quantity(),
            discount = %item.discount(),
            "item added to sale"
        );

        self.items.push(item);
        self.touch();
        Ok(())
    }

    /// Attaches several items. Either all of them are added or none.
    pub fn add_items(&mut self, items: impl IntoIterator<Item = SaleItem>) -> Result<(), SaleError> {
        let priced = self.price_all(items)?;
        if !priced.is_empty() {
            self.items.extend(priced);
            self.touch();
        }
        Ok(())
    }

    /// Replaces the item collection. On failure the current items are kept.
    pub fn replace_items(
        &mut self,
        items: impl IntoIterator<Item = SaleItem>,
    ) -> Result<(), SaleError> {
        self.items = self.price_all(items)?;
        self.touch();
        Ok(())
    }

    /// Removes an item.
    ///
    /// Returns false, leaving the sale untouched, if no such item exists.
    pub fn remove_item(&mut self, item_id: SaleItemId) -> bool {
        let Some(index) = self.items.iter().position(|item| item.id() == item_id) else {
            return false;
        };
        self.items.remove(index);
        self.touch();
        true
    }

    /// Cancels an item.
    ///
    /// Returns false, leaving the sale untouched, if no such item exists.
    /// Cancelling an already cancelled item succeeds without effect on it.
    pub fn cancel_item(&mut self, item_id: SaleItemId) -> bool {
        let Some(item) = self.items.iter_mut().find(|item| item.id() == item_id) else {
            return false;
        };
        item.cancel();
        self.touch();
        true
    }

    /// Moves the sale to [`SaleStatus::Cancelled`].
    ///
    /// Item cancellation flags are left as they are. Returns false if the
    /// sale was already cancelled.
    pub fn cancel(&mut self) -> bool {
        if !self.status.can_cancel() {
            return false;
        }
        self.status = SaleStatus::Cancelled;
        self.touch();
        true
    }

    /// Reassigns the customer and branch of an active sale.
    pub fn update_details(
        &mut self,
        customer_id: impl Into<CustomerId>,
        customer_name: impl Into<String>,
        branch_id: impl Into<BranchId>,
        branch_name: impl Into<String>,
    ) -> Result<(), SaleError> {
        if !self.status.can_modify() {
            return Err(SaleError::InvalidStateTransition {
                current: self.status,
                action: "update",
            });
        }

        self.customer_id = customer_id.into();
        self.customer_name = customer_name.into();
        self.branch_id = branch_id.into();
        self.branch_name = branch_name.into();
        self.touch();
        Ok(())
    }

    /// Sets the version. Used by repositories after persisting.
    pub fn set_version(&mut self, version: Version) {
        self.version = version;
    }

    fn price_all(
        &self,
        items: impl IntoIterator<Item = SaleItem>,
    ) -> Result<Vec<SaleItem>, SaleError> {
        items
            .into_iter()
            .map(|mut item| {
                item.apply_discount()?;
                item.attach_to(self.id);
                Ok(item)
            })
            .collect()
    }

    fn touch(&mut self) {
        self.updated_at = Some(Utc::now());
    }
}

// Validation
impl Sale {
    /// Checks that the sale is complete enough to persist.
    ///
    /// Every item is validated as well; its errors are reported under
    /// `items[<index>]`.
    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::new();

        result.require("sale_number", &self.sale_number, "Sale number is required");
        result.ensure(
            !self.customer_id.is_blank(),
            "customer_id",
            "Customer ID is required",
        );
        result.require(
            "customer_name",
            &self.customer_name,
            "Customer name is required",
        );
        result.ensure(
            !self.branch_id.is_blank(),
            "branch_id",
            "Branch ID is required",
        );
        result.require("branch_name", &self.branch_name, "Branch name is required");
        result.ensure(
            self.sale_date != DateTime::<Utc>::default(),
            "sale_date",
            "Sale date is required",
        );
        result.ensure(
            !self.items.is_empty(),
            "items",
            "Sale must contain at least one item",
        );

        for (index, item) in self.items.iter().enumerate() {
            result.extend_prefixed(&format!("items[{index}]"), item.validate());
        }

        result
    }
}
