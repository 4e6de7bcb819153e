use std::cmp::Ordering;

use domain::{BranchId, CustomerId, Sale, SaleStatus};
use thiserror::Error;

/// Default number of sales per page.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Filter, ordering and paging for sale listings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaleQuery {
    /// 1-based page number.
    pub page: usize,

    /// Sales per page.
    pub size: usize,

    pub customer_id: Option<CustomerId>,
    pub branch_id: Option<BranchId>,
    pub status: Option<SaleStatus>,
    pub ordering: SaleOrdering,
}

impl Default for SaleQuery {
    fn default() -> Self {
        Self {
            page: 1,
            size: DEFAULT_PAGE_SIZE,
            customer_id: None,
            branch_id: None,
            status: None,
            ordering: SaleOrdering::default(),
        }
    }
}

impl SaleQuery {
    /// Creates a query for the first page with default ordering.
    pub fn new() -> Self {
        Self::default()
    }

    /// Selects a page.
    pub fn page(mut self, page: usize, size: usize) -> Self {
        self.page = page;
        self.size = size;
        self
    }

    /// Filters by customer.
    pub fn customer_id(mut self, customer_id: impl Into<CustomerId>) -> Self {
        self.customer_id = Some(customer_id.into());
        self
    }

    /// Filters by branch.
    pub fn branch_id(mut self, branch_id: impl Into<BranchId>) -> Self {
        self.branch_id = Some(branch_id.into());
        self
    }

    /// Filters by status.
    pub fn status(mut self, status: SaleStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Sets the ordering.
    pub fn order_by(mut self, ordering: SaleOrdering) -> Self {
        self.ordering = ordering;
        self
    }

    /// Number of sales to skip before this page. Saturates for pages far
    /// past the end.
    pub fn offset(&self) -> usize {
        self.page.saturating_sub(1).saturating_mul(self.size)
    }

    /// Returns true if the sale passes every filter.
    pub fn matches(&self, sale: &Sale) -> bool {
        if let Some(ref customer_id) = self.customer_id
            && sale.customer_id() != customer_id
        {
            return false;
        }
        if let Some(ref branch_id) = self.branch_id
            && sale.branch_id() != branch_id
        {
            return false;
        }
        if let Some(status) = self.status
            && sale.status() != status
        {
            return false;
        }
        true
    }
}

/// Sortable sale attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderField {
    SaleDate,
    SaleNumber,
    CreatedAt,
    TotalAmount,
}

impl OrderField {
    /// Column backing this field in the `sales` table.
    pub fn column(&self) -> &'static str {
        match self {
            OrderField::SaleDate => "sale_date",
            OrderField::SaleNumber => "sale_number",
            OrderField::CreatedAt => "created_at",
            OrderField::TotalAmount => "total_cents",
        }
    }

    fn compare(&self, a: &Sale, b: &Sale) -> Ordering {
        match self {
            OrderField::SaleDate => a.sale_date().cmp(&b.sale_date()),
            OrderField::SaleNumber => a.sale_number().cmp(b.sale_number()),
            OrderField::CreatedAt => a.created_at().cmp(&b.created_at()),
            OrderField::TotalAmount => a.total_amount().cmp(&b.total_amount()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderDirection {
    Asc,
    Desc,
}

impl OrderDirection {
    pub fn as_sql(&self) -> &'static str {
        match self {
            OrderDirection::Asc => "ASC",
            OrderDirection::Desc => "DESC",
        }
    }
}

/// Sort order for sale listings. Defaults to newest sale date first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaleOrdering {
    pub field: OrderField,
    pub direction: OrderDirection,
}

impl Default for SaleOrdering {
    fn default() -> Self {
        Self {
            field: OrderField::SaleDate,
            direction: OrderDirection::Desc,
        }
    }
}

impl SaleOrdering {
    pub fn new(field: OrderField, direction: OrderDirection) -> Self {
        Self { field, direction }
    }

    /// Compares two sales under this ordering, falling back to the id so
    /// the order is total.
    pub fn compare(&self, a: &Sale, b: &Sale) -> Ordering {
        let ordering = self.field.compare(a, b).then_with(|| a.id().cmp(&b.id()));
        match self.direction {
            OrderDirection::Asc => ordering,
            OrderDirection::Desc => ordering.reverse(),
        }
    }

    /// Renders the `ORDER BY` clause body.
    pub fn to_sql(&self) -> String {
        let direction = self.direction.as_sql();
        format!("{} {direction}, id {direction}", self.field.column())
    }
}

/// Error returned for an order-by expression that cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown ordering: {0}")]
pub struct UnknownOrdering(pub String);

impl std::str::FromStr for SaleOrdering {
    type Err = UnknownOrdering;

    /// Parses `"<field> [asc|desc]"`. Field names are matched ignoring case
    /// and underscores, so `sale_date`, `saleDate` and `SaleDate` are equal.
    /// The direction defaults to ascending.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unknown = || UnknownOrdering(s.to_string());
        let mut parts = s.split_whitespace();

        let field_name: String = parts
            .next()
            .ok_or_else(unknown)?
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .collect::<String>()
            .to_ascii_lowercase();

        let field = match field_name.as_str() {
            "saledate" | "date" => OrderField::SaleDate,
            "salenumber" | "number" => OrderField::SaleNumber,
            "createdat" => OrderField::CreatedAt,
            "totalamount" | "total" => OrderField::TotalAmount,
            _ => return Err(unknown()),
        };

        let direction = match parts.next().map(str::to_ascii_lowercase).as_deref() {
            None | Some("asc") | Some("ascending") => OrderDirection::Asc,
            Some("desc") | Some("descending") => OrderDirection::Desc,
            Some(_) => return Err(unknown()),
        };

        if parts.next().is_some() {
            return Err(unknown());
        }

        Ok(Self { field, direction })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_query_is_first_page_by_date_desc() {
        let query = SaleQuery::new();
        assert_eq!(query.page, 1);
        assert_eq!(query.size, DEFAULT_PAGE_SIZE);
        assert_eq!(query.offset(), 0);
        assert_eq!(query.ordering.field, OrderField::SaleDate);
        assert_eq!(query.ordering.direction, OrderDirection::Desc);
    }

    #[test]
    fn offset_skips_previous_pages() {
        assert_eq!(SaleQuery::new().page(3, 25).offset(), 50);
    }

    #[test]
    fn offset_saturates_for_huge_pages() {
        assert_eq!(SaleQuery::new().page(usize::MAX, 100).offset(), usize::MAX);
    }

    #[test]
    fn parses_field_spellings() {
        for input in ["sale_date", "saleDate", "SaleDate", "SALE_DATE asc"] {
            let ordering: SaleOrdering = input.parse().unwrap();
            assert_eq!(ordering.field, OrderField::SaleDate, "{input}");
            assert_eq!(ordering.direction, OrderDirection::Asc, "{input}");
        }

        let ordering: SaleOrdering = "totalAmount DESC".parse().unwrap();
        assert_eq!(ordering, SaleOrdering::new(OrderField::TotalAmount, OrderDirection::Desc));
    }

    #[test]
    fn rejects_unknown_orderings() {
        for input in ["", "price", "sale_date sideways", "sale_date desc extra"] {
            assert!(input.parse::<SaleOrdering>().is_err(), "{input}");
        }
    }

    #[test]
    fn sql_clause_has_tie_breaker() {
        let ordering = SaleOrdering::new(OrderField::SaleNumber, OrderDirection::Asc);
        assert_eq!(ordering.to_sql(), "sale_number ASC, id ASC");
    }

    #[test]
    fn query_builder_chain() {
        let query = SaleQuery::new()
            .page(2, 5)
            .customer_id("C1")
            .branch_id("B1")
            .status(SaleStatus::Active);

        assert_eq!(query.customer_id, Some(CustomerId::new("C1")));
        assert_eq!(query.branch_id, Some(BranchId::new("B1")));
        assert_eq!(query.status, Some(SaleStatus::Active));
        assert_eq!(query.offset(), 5);
    }
}
