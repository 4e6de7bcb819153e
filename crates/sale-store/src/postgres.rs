use async_trait::async_trait;
use domain::Sale;
use sqlx::{PgPool, Row, postgres::PgRow};

use crate::{Page, Result, SaleId, SaleQuery, StoreError, Version, store::SaleRepository};

/// PostgreSQL-backed sale repository.
///
/// Each sale is one row of the `sales` table; the aggregate is kept as
/// JSONB next to the header columns used for filtering and ordering.
#[derive(Clone)]
pub struct PostgresSaleRepository {
    pool: PgPool,
}

impl PostgresSaleRepository {
    /// Creates a new PostgreSQL sale repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Gets a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Runs the database migrations.
    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("../../migrations").run(&self.pool).await?;
        Ok(())
    }

    fn row_to_sale(row: PgRow) -> Result<Sale> {
        let state: serde_json::Value = row.try_get("state")?;
        let mut sale: Sale = serde_json::from_value(state)?;
        sale.set_version(Version::new(row.try_get("version")?));
        Ok(sale)
    }

    /// Builds the `WHERE` clause for a query's filters along with the
    /// values to bind, in placeholder order.
    fn filter_clause(query: &SaleQuery) -> (String, Vec<String>) {
        let mut sql = String::from(" WHERE 1=1");
        let mut binds = Vec::new();

        if let Some(ref customer_id) = query.customer_id {
            binds.push(customer_id.to_string());
            sql.push_str(&format!(" AND customer_id = ${}", binds.len()));
        }
        if let Some(ref branch_id) = query.branch_id {
            binds.push(branch_id.to_string());
            sql.push_str(&format!(" AND branch_id = ${}", binds.len()));
        }
        if let Some(status) = query.status {
            binds.push(status.as_str().to_string());
            sql.push_str(&format!(" AND status = ${}", binds.len()));
        }

        (sql, binds)
    }

    async fn current_version(&self, id: SaleId) -> Result<Option<Version>> {
        let version: Option<i64> = sqlx::query_scalar("SELECT version FROM sales WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;

        Ok(version.map(Version::new))
    }
}

/// Converts a count to a `BIGINT` bind value, clamping at `i64::MAX`.
fn to_sql_bigint(value: usize) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

#[async_trait]
impl SaleRepository for PostgresSaleRepository {
    #[tracing::instrument(skip(self, sale), fields(sale_id = %sale.id()))]
    async fn create(&self, mut sale: Sale) -> Result<Sale> {
        sale.set_version(Version::first());
        let state = serde_json::to_value(&sale)?;

        let result = sqlx::query(
            r#"
            INSERT INTO sales (id, sale_number, sale_date, customer_id, branch_id, status,
                               total_cents, version, created_at, updated_at, state)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            ON CONFLICT (id) DO NOTHING
            "#,
        )
        .bind(sale.id().as_uuid())
        .bind(sale.sale_number())
        .bind(sale.sale_date())
        .bind(sale.customer_id().as_str())
        .bind(sale.branch_id().as_str())
        .bind(sale.status().as_str())
        .bind(sale.total_amount().cents())
        .bind(sale.version().as_i64())
        .bind(sale.created_at())
        .bind(sale.updated_at())
        .bind(state)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::AlreadyExists(sale.id()));
        }

        metrics::counter!("sale_store_writes_total", "op" => "create").increment(1);
        Ok(sale)
    }

    async fn get_by_id(&self, id: SaleId) -> Result<Option<Sale>> {
        let row: Option<PgRow> = sqlx::query("SELECT state, version FROM sales WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;

        row.map(Self::row_to_sale).transpose()
    }

    #[tracing::instrument(skip(self, sale), fields(sale_id = %sale.id(), version = %sale.version()))]
    async fn update(&self, sale: &Sale) -> Result<Version> {
        let expected = sale.version();
        let next = expected.next();

        let mut stored = sale.clone();
        stored.set_version(next);
        let state = serde_json::to_value(&stored)?;

        let result = sqlx::query(
            r#"
            UPDATE sales
            SET sale_number = $2, sale_date = $3, customer_id = $4, branch_id = $5,
                status = $6, total_cents = $7, version = $8, updated_at = $9, state = $10
            WHERE id = $1 AND version = $11
            "#,
        )
        .bind(sale.id().as_uuid())
        .bind(sale.sale_number())
        .bind(sale.sale_date())
        .bind(sale.customer_id().as_str())
        .bind(sale.branch_id().as_str())
        .bind(sale.status().as_str())
        .bind(sale.total_amount().cents())
        .bind(next.as_i64())
        .bind(sale.updated_at())
        .bind(state)
        .bind(expected.as_i64())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return match self.current_version(sale.id()).await? {
                Some(actual) => Err(StoreError::ConcurrencyConflict {
                    sale_id: sale.id(),
                    expected,
                    actual,
                }),
                None => Err(StoreError::NotFound(sale.id())),
            };
        }

        metrics::counter!("sale_store_writes_total", "op" => "update").increment(1);
        Ok(next)
    }

    async fn delete(&self, id: SaleId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM sales WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await?;

        let removed = result.rows_affected() > 0;
        if removed {
            metrics::counter!("sale_store_writes_total", "op" => "delete").increment(1);
        }
        Ok(removed)
    }

    async fn list(&self, query: &SaleQuery) -> Result<Page<Sale>> {
        let (filter, binds) = Self::filter_clause(query);

        let count_sql = format!("SELECT COUNT(*) FROM sales{filter}");
        let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
        for value in &binds {
            count_query = count_query.bind(value);
        }
        let total_items = count_query.fetch_one(&self.pool).await?;

        let select_sql = format!(
            "SELECT state, version FROM sales{filter} ORDER BY {} LIMIT ${} OFFSET ${}",
            query.ordering.to_sql(),
            binds.len() + 1,
            binds.len() + 2,
        );
        let mut select_query = sqlx::query(&select_sql);
        for value in &binds {
            select_query = select_query.bind(value);
        }
        let rows = select_query
            .bind(to_sql_bigint(query.size))
            .bind(to_sql_bigint(query.offset()))
            .fetch_all(&self.pool)
            .await?;

        let data = rows
            .into_iter()
            .map(Self::row_to_sale)
            .collect::<Result<Vec<_>>>()?;

        Ok(Page::new(
            data,
            query.page,
            query.size,
            total_items as usize,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::SaleStatus;

    #[test]
    fn filter_clause_numbers_placeholders_in_order() {
        let query = SaleQuery::new().branch_id("B1").status(SaleStatus::Active);
        let (sql, binds) = PostgresSaleRepository::filter_clause(&query);

        assert_eq!(sql, " WHERE 1=1 AND branch_id = $1 AND status = $2");
        assert_eq!(binds, vec!["B1".to_string(), "Active".to_string()]);
    }

    #[test]
    fn paging_binds_clamp_to_bigint() {
        assert_eq!(to_sql_bigint(25), 25);
        assert_eq!(
            to_sql_bigint(SaleQuery::new().page(usize::MAX, 100).offset()),
            i64::MAX
        );
    }

    #[test]
    fn empty_query_has_no_filters() {
        let (sql, binds) = PostgresSaleRepository::filter_clause(&SaleQuery::new());
        assert_eq!(sql, " WHERE 1=1");
        assert!(binds.is_empty());
    }
}
