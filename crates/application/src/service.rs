//! Sale use cases.

use std::collections::HashSet;

use common::SaleId;
use domain::{Sale, SaleError, SaleEvent, SaleStatus};
use message_broker::{MessageBroker, MessageBrokerExt};
use sale_store::{Page, SaleRepository, SaleRepositoryExt};

use crate::commands::{CancelItem, CancelSale, CreateSale, DeleteSale, GetSales, UpdateSale};
use crate::error::{ApplicationError, Result};

/// Runs sale commands against a repository and announces the results.
///
/// Every mutating use case follows the same steps: load, change the
/// aggregate, validate, persist, publish. Events are published only after
/// the write succeeded, and a failed publish never fails the use case.
pub struct SaleService<R, B>
where
    R: SaleRepository,
    B: MessageBroker,
{
    repository: R,
    broker: B,
}

impl<R, B> SaleService<R, B>
where
    R: SaleRepository,
    B: MessageBroker,
{
    pub fn new(repository: R, broker: B) -> Self {
        Self { repository, broker }
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    pub fn broker(&self) -> &B {
        &self.broker
    }

    /// Creates a sale with its priced lines and publishes `SaleCreated`.
    #[tracing::instrument(skip(self, cmd), fields(sale_number = %cmd.sale_number))]
    pub async fn create_sale(&self, cmd: CreateSale) -> Result<Sale> {
        metrics::counter!("sale_commands_total", "command" => "create").increment(1);
        cmd.validate().into_result()?;

        let mut sale = Sale::new(
            cmd.sale_number.as_str(),
            cmd.customer_id.as_str(),
            cmd.customer_name.as_str(),
            cmd.branch_id.as_str(),
            cmd.branch_name.as_str(),
            cmd.sale_date,
        );
        sale.add_items(cmd.items.iter().map(|item| item.to_item()))?;
        sale.validate().into_result()?;

        let sale = self.repository.create(sale).await?;
        tracing::info!(
            sale_id = %sale.id(),
            items = sale.item_count(),
            total = %sale.total_amount(),
            "sale created"
        );

        self.publish(SaleEvent::sale_created(&sale)).await;
        Ok(sale)
    }

    /// Returns a sale, or `None` if it does not exist.
    #[tracing::instrument(skip(self))]
    pub async fn get_sale(&self, id: SaleId) -> Result<Option<Sale>> {
        Ok(self.repository.get_by_id(id).await?)
    }

    /// Lists one page of sales.
    #[tracing::instrument(skip(self))]
    pub async fn list_sales(&self, request: GetSales) -> Result<Page<Sale>> {
        let query = request.to_query()?;
        Ok(self.repository.list(&query).await?)
    }

    /// Replaces the customer, branch and lines of an active sale and
    /// publishes `SaleUpdated`.
    ///
    /// A line that names an existing line by id and repeats its product,
    /// quantity and price keeps that line, including its cancellation.
    /// Every other line, including a second reference to the same
    /// existing line, is priced as a new one.
    #[tracing::instrument(skip(self, cmd), fields(sale_id = %cmd.id))]
    pub async fn update_sale(&self, cmd: UpdateSale) -> Result<Sale> {
        metrics::counter!("sale_commands_total", "command" => "update").increment(1);
        cmd.validate().into_result()?;

        let mut sale = self.load(cmd.id).await?;
        sale.update_details(
            cmd.customer_id.as_str(),
            cmd.customer_name.as_str(),
            cmd.branch_id.as_str(),
            cmd.branch_name.as_str(),
        )?;

        // An existing line is kept at most once; repeats become new lines.
        let mut kept = HashSet::new();
        let items: Vec<_> = cmd
            .items
            .iter()
            .map(|line| {
                line.id
                    .and_then(|id| sale.get_item(id))
                    .filter(|existing| line.matches(existing) && kept.insert(existing.id()))
                    .cloned()
                    .unwrap_or_else(|| line.to_item())
            })
            .collect();
        sale.replace_items(items)?;
        sale.validate().into_result()?;

        self.repository.save(&mut sale).await?;
        tracing::info!(version = %sale.version(), total = %sale.total_amount(), "sale updated");

        self.publish(SaleEvent::sale_updated(&sale)).await;
        Ok(sale)
    }

    /// Cancels a sale and publishes `SaleCancelled`.
    ///
    /// Fails with an invalid state transition if it is already cancelled.
    #[tracing::instrument(skip(self, cmd), fields(sale_id = %cmd.id))]
    pub async fn cancel_sale(&self, cmd: CancelSale) -> Result<Sale> {
        metrics::counter!("sale_commands_total", "command" => "cancel").increment(1);
        let mut sale = self.load(cmd.id).await?;

        if !sale.cancel() {
            return Err(SaleError::InvalidStateTransition {
                current: SaleStatus::Cancelled,
                action: "cancel",
            }
            .into());
        }

        self.repository.save(&mut sale).await?;
        tracing::info!(version = %sale.version(), "sale cancelled");

        self.publish(SaleEvent::sale_cancelled(&sale)).await;
        Ok(sale)
    }

    /// Cancels one line of a sale and publishes `ItemCancelled`.
    ///
    /// Cancelling a line that is already cancelled returns the sale as it
    /// is, without writing or publishing anything.
    #[tracing::instrument(skip(self, cmd), fields(sale_id = %cmd.sale_id, item_id = %cmd.item_id))]
    pub async fn cancel_item(&self, cmd: CancelItem) -> Result<Sale> {
        metrics::counter!("sale_commands_total", "command" => "cancel_item").increment(1);
        let mut sale = self.load(cmd.sale_id).await?;

        let not_found = || ApplicationError::ItemNotFound {
            sale_id: cmd.sale_id,
            item_id: cmd.item_id,
        };
        if sale.get_item(cmd.item_id).ok_or_else(not_found)?.is_cancelled() {
            tracing::debug!("item already cancelled");
            return Ok(sale);
        }
        if !sale.cancel_item(cmd.item_id) {
            return Err(not_found());
        }

        self.repository.save(&mut sale).await?;
        tracing::info!(version = %sale.version(), "sale item cancelled");

        if let Some(item) = sale.get_item(cmd.item_id) {
            self.publish(SaleEvent::item_cancelled(&sale, item, cmd.reason))
                .await;
        }
        Ok(sale)
    }

    /// Deletes a sale and publishes `SaleDeleted`.
    ///
    /// The sale passes through the cancelled state before it is removed.
    #[tracing::instrument(skip(self, cmd), fields(sale_id = %cmd.id))]
    pub async fn delete_sale(&self, cmd: DeleteSale) -> Result<()> {
        metrics::counter!("sale_commands_total", "command" => "delete").increment(1);
        let mut sale = self.load(cmd.id).await?;
        sale.cancel();

        if !self.repository.delete(cmd.id).await? {
            return Err(ApplicationError::SaleNotFound(cmd.id));
        }
        tracing::info!("sale deleted");

        self.publish(SaleEvent::sale_deleted(&sale)).await;
        Ok(())
    }

    async fn load(&self, id: SaleId) -> Result<Sale> {
        self.repository
            .get_by_id(id)
            .await?
            .ok_or(ApplicationError::SaleNotFound(id))
    }

    async fn publish(&self, event: SaleEvent) {
        if let Err(error) = self.broker.publish_event(&event).await {
            metrics::counter!("sale_event_publish_failures_total").increment(1);
            tracing::warn!(
                %error,
                sale_id = %event.sale_id(),
                event_type = domain::DomainEvent::event_type(&event),
                "failed to publish sale event"
            );
        }
    }
}
