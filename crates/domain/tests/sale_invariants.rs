//! Integration tests for the Sale aggregate.
//!
//! These exercise the public API only: discount tiers, totals, validation
//! aggregation and the lenient handling of unknown item ids.

use chrono::{DateTime, Utc};
use domain::{
    Discount, DomainEvent, Money, Sale, SaleError, SaleEvent, SaleItem, SaleItemId, SaleStatus,
};

fn empty_sale() -> Sale {
    Sale::new("S-1", "C1", "Jane", "B1", "Main", Utc::now())
}

fn widget(quantity: u32, price_cents: i64) -> SaleItem {
    SaleItem::new("P1", "Widget", quantity, Money::from_cents(price_cents))
}

mod discount_policy {
    use super::*;

    #[test]
    fn tiers_cover_every_allowed_quantity() {
        for q in 1..=20u32 {
            let expected = match q {
                1..=3 => 0,
                4..=9 => 10,
                _ => 20,
            };
            assert_eq!(
                Discount::for_quantity(q).unwrap().percent(),
                expected,
                "quantity {q}"
            );
        }
    }

    #[test]
    fn quantities_above_twenty_are_a_contract_violation() {
        for q in [21, 50, u32::MAX] {
            assert_eq!(
                Discount::for_quantity(q),
                Err(SaleError::InvalidQuantity { quantity: q })
            );
        }
    }

    #[test]
    fn discount_is_applied_at_attach_time() {
        let item = widget(4, 1000);
        assert_eq!(item.discount(), Discount::NONE);

        let mut sale = empty_sale();
        sale.add_item(item).unwrap();
        assert_eq!(sale.items()[0].discount().percent(), 10);
    }
}

mod totals {
    use super::*;

    #[test]
    fn item_totals_match_reference_amounts() {
        let mut sale = empty_sale();
        sale.add_items([widget(1, 1000), widget(5, 2000), widget(15, 1000)])
            .unwrap();

        let totals: Vec<i64> = sale
            .items()
            .iter()
            .map(|item| item.total_amount().cents())
            .collect();
        assert_eq!(totals, vec![1000, 9000, 12000]);
        assert_eq!(sale.total_amount().cents(), 22000);
    }

    #[test]
    fn empty_sale_totals_zero() {
        assert_eq!(empty_sale().total_amount(), Money::zero());
    }

    #[test]
    fn cancelled_items_still_count_towards_the_total() {
        let mut sale = empty_sale();
        sale.add_items([widget(5, 2000), widget(1, 1000)]).unwrap();
        let before = sale.total_amount();

        let id = sale.items()[0].id();
        assert!(sale.cancel_item(id));
        assert!(sale.cancel_item(id));

        let item = sale.get_item(id).unwrap();
        assert!(item.is_cancelled());
        assert_eq!(item.discount().percent(), 10);
        assert_eq!(sale.total_amount(), before);
    }
}

mod lifecycle {
    use super::*;

    #[test]
    fn unknown_ids_leave_the_sale_unchanged() {
        let mut sale = empty_sale();
        sale.add_item(widget(2, 500)).unwrap();
        let snapshot = sale.clone();

        assert!(!sale.remove_item(SaleItemId::new()));
        assert!(!sale.cancel_item(SaleItemId::new()));

        assert_eq!(sale, snapshot);
        assert_eq!(sale.status(), SaleStatus::Active);
    }

    #[test]
    fn cancelling_an_item_does_not_change_sale_status() {
        let mut sale = empty_sale();
        sale.add_item(widget(2, 500)).unwrap();
        let id = sale.items()[0].id();

        sale.cancel_item(id);
        assert_eq!(sale.status(), SaleStatus::Active);
        assert!(!sale.is_cancelled());
    }

    #[test]
    fn cancel_is_terminal() {
        let mut sale = empty_sale();
        sale.add_item(widget(2, 500)).unwrap();

        assert!(sale.cancel());
        assert!(!sale.cancel());
        assert_eq!(sale.status(), SaleStatus::Cancelled);
        assert!(sale.update_details("C2", "John", "B2", "North").is_err());
    }

    #[test]
    fn every_mutation_stamps_updated_at() {
        let mut sale = empty_sale();
        assert!(sale.updated_at().is_none());

        sale.add_item(widget(1, 100)).unwrap();
        let first = sale.updated_at().unwrap();

        let id = sale.items()[0].id();
        sale.remove_item(id);
        assert!(sale.updated_at().unwrap() >= first);
    }
}

mod validation {
    use super::*;

    #[test]
    fn sale_without_items_is_invalid_until_one_is_added() {
        let mut sale = empty_sale();

        let result = sale.validate();
        assert!(!result.is_valid());
        assert!(
            result
                .errors()
                .iter()
                .any(|e| e.field == "items" && e.message == "Sale must contain at least one item")
        );

        sale.add_item(widget(1, 1000)).unwrap();
        assert!(sale.validate().is_valid());
    }

    #[test]
    fn default_sale_date_is_rejected() {
        let mut sale = Sale::new("S-1", "C1", "Jane", "B1", "Main", DateTime::<Utc>::default());
        sale.add_item(widget(1, 1000)).unwrap();

        let result = sale.validate();
        assert_eq!(result.errors().len(), 1);
        assert_eq!(result.errors()[0].field, "sale_date");
    }

    #[test]
    fn item_errors_are_aggregated_with_their_index() {
        let mut sale = empty_sale();
        sale.add_items([widget(1, 1000), widget(0, -5)]).unwrap();

        let result = sale.validate();
        assert!(result.has_error_for("items[1].quantity"));
        assert!(result.has_error_for("items[1].unit_price"));
        assert!(!result.has_error_for("items[0].quantity"));
    }
}

#[test]
fn end_to_end_sale() {
    let mut sale = Sale::new("S-1", "C1", "Jane", "B1", "Main", Utc::now());
    sale.add_item(SaleItem::new("P1", "Widget", 12, Money::from_cents(1000)))
        .unwrap();

    let item = &sale.items()[0];
    assert_eq!(item.discount().percent(), 20);
    assert_eq!(item.total_amount().cents(), 9600);
    assert_eq!(sale.total_amount().cents(), 9600);
    assert!(sale.validate().is_valid());

    let event = SaleEvent::sale_created(&sale);
    assert_eq!(event.topic(), "sales-salecreated");
}
