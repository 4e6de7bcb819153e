//! Sale commands and their request-level validation.
//!
//! These checks run before the aggregate is touched. They are stricter than
//! [`Sale::validate`](domain::Sale::validate): field lengths and the number
//! of lines per sale are limited here.

use chrono::{DateTime, Utc};
use common::{SaleId, SaleItemId};
use domain::{
    BranchId, CustomerId, MAX_IDENTICAL_ITEMS, MAX_UNIT_PRICE, Money, SaleItem, SaleStatus,
    ValidationResult,
};
use sale_store::{SaleOrdering, SaleQuery};

/// Longest accepted identifier or sale number.
pub const MAX_CODE_LENGTH: usize = 50;

/// Longest accepted display name.
pub const MAX_NAME_LENGTH: usize = 100;

/// Most lines a single sale may carry.
pub const MAX_LINES_PER_SALE: usize = 20;

/// Largest page size a listing may request.
pub const MAX_PAGE_SIZE: usize = 100;

/// Command to create a new sale.
#[derive(Debug, Clone)]
pub struct CreateSale {
    pub sale_number: String,
    pub customer_id: String,
    pub customer_name: String,
    pub branch_id: String,
    pub branch_name: String,
    pub sale_date: DateTime<Utc>,
    pub items: Vec<CreateSaleItem>,
}

/// A line of a [`CreateSale`] command.
#[derive(Debug, Clone)]
pub struct CreateSaleItem {
    pub product_id: String,
    pub product_name: String,
    pub quantity: u32,
    pub unit_price: Money,
}

impl CreateSaleItem {
    pub fn new(
        product_id: impl Into<String>,
        product_name: impl Into<String>,
        quantity: u32,
        unit_price: Money,
    ) -> Self {
        Self {
            product_id: product_id.into(),
            product_name: product_name.into(),
            quantity,
            unit_price,
        }
    }

    pub(crate) fn to_item(&self) -> SaleItem {
        SaleItem::new(
            self.product_id.as_str(),
            self.product_name.as_str(),
            self.quantity,
            self.unit_price,
        )
    }
}

impl CreateSale {
    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::new();

        result.require("sale_number", &self.sale_number, "Sale number is required");
        result.max_length("sale_number", &self.sale_number, MAX_CODE_LENGTH);
        validate_parties(
            &mut result,
            &self.customer_id,
            &self.customer_name,
            &self.branch_id,
            &self.branch_name,
        );
        result.ensure(
            self.sale_date != DateTime::<Utc>::default(),
            "sale_date",
            "Sale date must be valid",
        );
        validate_line_count(&mut result, self.items.len());

        for (index, item) in self.items.iter().enumerate() {
            result.extend_prefixed(
                &format!("items[{index}]"),
                validate_line(
                    &item.product_id,
                    &item.product_name,
                    item.quantity,
                    item.unit_price,
                ),
            );
        }

        result
    }
}

/// Command to replace the customer, branch and lines of an existing sale.
#[derive(Debug, Clone)]
pub struct UpdateSale {
    pub id: SaleId,
    pub customer_id: String,
    pub customer_name: String,
    pub branch_id: String,
    pub branch_name: String,
    pub items: Vec<UpdateSaleItem>,
}

/// A line of an [`UpdateSale`] command.
///
/// A line carrying the id of an existing, unchanged line keeps that line
/// (and its cancellation flag). Any other line is priced as a new one.
#[derive(Debug, Clone)]
pub struct UpdateSaleItem {
    pub id: Option<SaleItemId>,
    pub product_id: String,
    pub product_name: String,
    pub quantity: u32,
    pub unit_price: Money,
}

impl UpdateSaleItem {
    /// Returns true if `item` already has this line's product, quantity and price.
    pub(crate) fn matches(&self, item: &SaleItem) -> bool {
        item.product_id().as_str() == self.product_id
            && item.product_name() == self.product_name
            && item.quantity() == self.quantity
            && item.unit_price() == self.unit_price
    }

    pub(crate) fn to_item(&self) -> SaleItem {
        SaleItem::new(
            self.product_id.as_str(),
            self.product_name.as_str(),
            self.quantity,
            self.unit_price,
        )
    }
}

impl UpdateSale {
    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::new();

        validate_parties(
            &mut result,
            &self.customer_id,
            &self.customer_name,
            &self.branch_id,
            &self.branch_name,
        );
        validate_line_count(&mut result, self.items.len());

        for (index, item) in self.items.iter().enumerate() {
            result.extend_prefixed(
                &format!("items[{index}]"),
                validate_line(
                    &item.product_id,
                    &item.product_name,
                    item.quantity,
                    item.unit_price,
                ),
            );
        }

        result
    }
}

/// Command to cancel a whole sale.
#[derive(Debug, Clone, Copy)]
pub struct CancelSale {
    pub id: SaleId,
}

impl CancelSale {
    pub fn new(id: SaleId) -> Self {
        Self { id }
    }
}

/// Command to cancel one line of a sale.
#[derive(Debug, Clone)]
pub struct CancelItem {
    pub sale_id: SaleId,
    pub item_id: SaleItemId,
    pub reason: Option<String>,
}

impl CancelItem {
    pub fn new(sale_id: SaleId, item_id: SaleItemId) -> Self {
        Self {
            sale_id,
            item_id,
            reason: None,
        }
    }

    /// Records why the line is cancelled.
    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }
}

/// Command to delete a sale.
#[derive(Debug, Clone, Copy)]
pub struct DeleteSale {
    pub id: SaleId,
}

impl DeleteSale {
    pub fn new(id: SaleId) -> Self {
        Self { id }
    }
}

/// Listing request with optional filters and an order-by expression such
/// as `"sale_date desc"`.
#[derive(Debug, Clone)]
pub struct GetSales {
    pub page: usize,
    pub size: usize,
    pub customer_id: Option<String>,
    pub branch_id: Option<String>,
    pub status: Option<String>,
    pub order_by: Option<String>,
}

impl Default for GetSales {
    fn default() -> Self {
        Self {
            page: 1,
            size: sale_store::query::DEFAULT_PAGE_SIZE,
            customer_id: None,
            branch_id: None,
            status: None,
            order_by: None,
        }
    }
}

impl GetSales {
    /// Validates the request and converts it into a store query.
    pub fn to_query(&self) -> Result<SaleQuery, ValidationResult> {
        let mut result = ValidationResult::new();

        result.ensure(self.page > 0, "page", "Page must be greater than 0");
        result.ensure(self.size > 0, "size", "Size must be greater than 0");
        result.ensure(
            self.size <= MAX_PAGE_SIZE,
            "size",
            "Size must not exceed 100",
        );

        let status = match non_blank(&self.status).map(str::parse::<SaleStatus>) {
            None => None,
            Some(Ok(status)) => Some(status),
            Some(Err(e)) => {
                result.push("status", e.to_string());
                None
            }
        };

        let ordering = match non_blank(&self.order_by).map(str::parse::<SaleOrdering>) {
            None => SaleOrdering::default(),
            Some(Ok(ordering)) => ordering,
            Some(Err(e)) => {
                result.push("order_by", e.to_string());
                SaleOrdering::default()
            }
        };

        result.into_result()?;

        Ok(SaleQuery {
            page: self.page,
            size: self.size,
            customer_id: non_blank(&self.customer_id).map(CustomerId::new),
            branch_id: non_blank(&self.branch_id).map(BranchId::new),
            status,
            ordering,
        })
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn validate_parties(
    result: &mut ValidationResult,
    customer_id: &str,
    customer_name: &str,
    branch_id: &str,
    branch_name: &str,
) {
    result.require("customer_id", customer_id, "Customer ID is required");
    result.max_length("customer_id", customer_id, MAX_CODE_LENGTH);
    result.require("customer_name", customer_name, "Customer name is required");
    result.max_length("customer_name", customer_name, MAX_NAME_LENGTH);
    result.require("branch_id", branch_id, "Branch ID is required");
    result.max_length("branch_id", branch_id, MAX_CODE_LENGTH);
    result.require("branch_name", branch_name, "Branch name is required");
    result.max_length("branch_name", branch_name, MAX_NAME_LENGTH);
}

fn validate_line_count(result: &mut ValidationResult, count: usize) {
    result.ensure(count > 0, "items", "Sale must contain at least one item");
    result.ensure(
        count <= MAX_LINES_PER_SALE,
        "items",
        "Cannot have more than 20 items in a sale",
    );
}

fn validate_line(
    product_id: &str,
    product_name: &str,
    quantity: u32,
    unit_price: Money,
) -> ValidationResult {
    let mut result = ValidationResult::new();

    result.require("product_id", product_id, "Product ID is required");
    result.max_length("product_id", product_id, MAX_CODE_LENGTH);
    result.require("product_name", product_name, "Product name is required");
    result.max_length("product_name", product_name, MAX_NAME_LENGTH);
    result.ensure(
        (1..=MAX_IDENTICAL_ITEMS).contains(&quantity),
        "quantity",
        "Quantity must be between 1 and 20",
    );
    result.ensure(
        unit_price.is_positive(),
        "unit_price",
        "Unit price must be greater than 0",
    );
    result.ensure(
        unit_price <= MAX_UNIT_PRICE,
        "unit_price",
        "Unit price must not exceed $1000000.00",
    );

    result
}
