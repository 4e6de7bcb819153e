//! Sale line items and the quantity-tier discount policy.

use common::{SaleId, SaleItemId};
use serde::{Deserialize, Serialize};

use crate::{Money, SaleError, ValidationResult};

use super::ProductId;

/// The most units of a single product a line item may carry.
pub const MAX_IDENTICAL_ITEMS: u32 = 20;

/// Highest accepted unit price: 1,000,000.00.
pub const MAX_UNIT_PRICE: Money = Money::from_cents(100_000_000);

/// A discount percentage between 0 and 100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Discount(u8);

impl Discount {
    /// No discount.
    pub const NONE: Discount = Discount(0);

    /// Returns the discount tier for a quantity.
    ///
    /// | quantity | discount |
    /// |----------|----------|
    /// | below 4  | 0%       |
    /// | 4 to 9   | 10%      |
    /// | 10 to 20 | 20%      |
    ///
    /// Quantities above [`MAX_IDENTICAL_ITEMS`] are rejected.
    pub fn for_quantity(quantity: u32) -> Result<Self, SaleError> {
        match quantity {
            0..4 => Ok(Discount(0)),
            4..10 => Ok(Discount(10)),
            10..=MAX_IDENTICAL_ITEMS => Ok(Discount(20)),
            _ => Err(SaleError::InvalidQuantity { quantity }),
        }
    }

    /// Returns the percentage value.
    pub fn percent(&self) -> u8 {
        self.0
    }
}

impl std::fmt::Display for Discount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}%", self.0)
    }
}

/// A product line within a sale.
///
/// Quantity and unit price are fixed at construction. The discount is
/// assigned when the line is attached to a sale and, because the quantity
/// cannot change afterwards, always matches the quantity tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleItem {
    id: SaleItemId,
    sale_id: Option<SaleId>,
    product_id: ProductId,
    product_name: String,
    quantity: u32,
    unit_price: Money,
    discount: Discount,
    cancelled: bool,
}

impl SaleItem {
    /// Creates a new, not yet priced line item.
    pub fn new(
        product_id: impl Into<ProductId>,
        product_name: impl Into<String>,
        quantity: u32,
        unit_price: Money,
    ) -> Self {
        Self {
            id: SaleItemId::new(),
            sale_id: None,
            product_id: product_id.into(),
            product_name: product_name.into(),
            quantity,
            unit_price,
            discount: Discount::NONE,
            cancelled: false,
        }
    }

    /// Returns the line identifier.
    pub fn id(&self) -> SaleItemId {
        self.id
    }

    /// Returns the owning sale, once attached.
    pub fn sale_id(&self) -> Option<SaleId> {
        self.sale_id
    }

    pub fn product_id(&self) -> &ProductId {
        &self.product_id
    }

    pub fn product_name(&self) -> &str {
        &self.product_name
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub fn unit_price(&self) -> Money {
        self.unit_price
    }

    /// Returns the applied discount.
    pub fn discount(&self) -> Discount {
        self.discount
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    /// Computes the discount tier for this line's quantity without storing it.
    pub fn calculate_discount_percentage(&self) -> Result<Discount, SaleError> {
        Discount::for_quantity(self.quantity)
    }

    /// Stores the discount tier for this line's quantity.
    pub fn apply_discount(&mut self) -> Result<(), SaleError> {
        self.discount = self.calculate_discount_percentage()?;
        Ok(())
    }

    /// Returns `quantity × unit price` less the applied discount.
    ///
    /// Cancelled lines keep their amount.
    pub fn total_amount(&self) -> Money {
        self.unit_price
            .multiply(self.quantity)
            .apply_discount(self.discount.percent())
    }

    /// Marks the line as cancelled.
    ///
    /// Returns false if it was already cancelled.
    pub fn cancel(&mut self) -> bool {
        let changed = !self.cancelled;
        self.cancelled = true;
        changed
    }

    /// Checks the structural rules for a line item.
    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::new();

        result.ensure(
            !self.product_id.is_blank(),
            "product_id",
            "Product ID is required",
        );
        result.require("product_name", &self.product_name, "Product name is required");
        result.ensure(
            self.quantity > 0,
            "quantity",
            "Quantity must be greater than 0",
        );
        result.ensure(
            self.quantity <= MAX_IDENTICAL_ITEMS,
            "quantity",
            "Cannot sell more than 20 identical items",
        );
        result.ensure(
            self.unit_price.is_positive(),
            "unit_price",
            "Unit price must be greater than 0",
        );
        result.ensure(
            self.unit_price <= MAX_UNIT_PRICE,
            "unit_price",
            "Unit price must not exceed $1000000.00",
        );
        result.ensure(
            self.discount.percent() <= 100,
            "discount",
            "Discount must be between 0 and 100",
        );

        result
    }

    pub(crate) fn attach_to(&mut self, sale_id: SaleId) {
        self.sale_id = Some(sale_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(quantity: u32, price_cents: i64) -> SaleItem {
        SaleItem::new("P1", "Widget", quantity, Money::from_cents(price_cents))
    }

    #[test]
    fn test_discount_tiers() {
        for q in 0..=3 {
            assert_eq!(Discount::for_quantity(q).unwrap().percent(), 0);
        }
        for q in 4..=9 {
            assert_eq!(Discount::for_quantity(q).unwrap().percent(), 10);
        }
        for q in 10..=20 {
            assert_eq!(Discount::for_quantity(q).unwrap().percent(), 20);
        }
    }

    #[test]
    fn test_discount_rejects_more_than_twenty() {
        assert_eq!(
            Discount::for_quantity(21),
            Err(SaleError::InvalidQuantity { quantity: 21 })
        );
    }

    #[test]
    fn test_new_item_is_unpriced_and_active() {
        let item = item(12, 1000);
        assert_eq!(item.discount(), Discount::NONE);
        assert!(!item.is_cancelled());
        assert!(item.sale_id().is_none());
        assert_eq!(item.calculate_discount_percentage().unwrap().percent(), 20);
        // computing the tier does not store it
        assert_eq!(item.discount(), Discount::NONE);
    }

    #[test]
    fn test_total_amount_examples() {
        let mut one = item(1, 1000);
        one.apply_discount().unwrap();
        assert_eq!(one.total_amount().cents(), 1000);

        let mut five = item(5, 2000);
        five.apply_discount().unwrap();
        assert_eq!(five.discount().percent(), 10);
        assert_eq!(five.total_amount().cents(), 9000);

        let mut fifteen = item(15, 1000);
        fifteen.apply_discount().unwrap();
        assert_eq!(fifteen.discount().percent(), 20);
        assert_eq!(fifteen.total_amount().cents(), 12000);
    }

    #[test]
    fn test_validate_rejects_unit_price_above_ceiling() {
        let at_ceiling = item(20, MAX_UNIT_PRICE.cents());
        assert!(at_ceiling.validate().is_valid());

        let result = item(12, i64::MAX / 10).validate();
        assert!(result.has_error_for("unit_price"));
        assert_eq!(result.errors().len(), 1);
    }

    #[test]
    fn test_apply_discount_fails_above_ceiling() {
        let mut item = item(21, 1000);
        assert!(matches!(
            item.apply_discount(),
            Err(SaleError::InvalidQuantity { quantity: 21 })
        ));
        assert_eq!(item.discount(), Discount::NONE);
    }

    #[test]
    fn test_apply_discount_is_idempotent() {
        let mut item = item(7, 1000);
        item.apply_discount().unwrap();
        let total = item.total_amount();
        item.apply_discount().unwrap();
        assert_eq!(item.total_amount(), total);
    }

    #[test]
    fn test_cancel_is_idempotent() {
        let mut item = item(5, 2000);
        item.apply_discount().unwrap();

        assert!(item.cancel());
        assert!(!item.cancel());
        assert!(item.is_cancelled());
        assert_eq!(item.discount().percent(), 10);
        assert_eq!(item.total_amount().cents(), 9000);
    }

    #[test]
    fn test_validate_valid_item() {
        assert!(item(3, 100).validate().is_valid());
    }

    #[test]
    fn test_validate_collects_every_error() {
        let bad = SaleItem::new("", " ", 0, Money::zero());
        let result = bad.validate();

        assert!(result.has_error_for("product_id"));
        assert!(result.has_error_for("product_name"));
        assert!(result.has_error_for("quantity"));
        assert!(result.has_error_for("unit_price"));
        assert_eq!(result.errors().len(), 4);
    }

    #[test]
    fn test_validate_rejects_quantity_over_twenty() {
        let result = item(25, 100).validate();
        assert_eq!(result.errors().len(), 1);
        assert_eq!(
            result.errors()[0].message,
            "Cannot sell more than 20 identical items"
        );
    }

    #[test]
    fn test_item_serialization_round_trip() {
        let mut item = item(4, 999);
        item.apply_discount().unwrap();
        let json = serde_json::to_string(&item).unwrap();
        let restored: SaleItem = serde_json::from_str(&json).unwrap();
        assert_eq!(item, restored);
    }
}
