//! Sale CRUD and cancellation endpoints.

use std::sync::Arc;

use application::{
    CancelItem, CancelSale, CreateSale, CreateSaleItem, DeleteSale, GetSales, SaleService,
    UpdateSale, UpdateSaleItem,
};
use axum::Json;
use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use common::{SaleId, SaleItemId};
use domain::{Money, Sale, SaleItem};
use message_broker::{FakeServiceBus, InMemoryMessageStore};
use sale_store::{Page, SaleRepository};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// The simulated bus every sale event goes through.
pub type SaleBus = FakeServiceBus<InMemoryMessageStore>;

/// Shared application state accessible from all handlers.
pub struct AppState<R: SaleRepository> {
    pub service: SaleService<R, SaleBus>,
}

// -- Request types --

#[derive(Debug, Deserialize)]
pub struct CreateSaleRequest {
    pub sale_number: String,
    pub sale_date: DateTime<Utc>,
    pub customer_id: String,
    pub customer_name: String,
    pub branch_id: String,
    pub branch_name: String,
    #[serde(default)]
    pub items: Vec<SaleItemRequest>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateSaleRequest {
    pub customer_id: String,
    pub customer_name: String,
    pub branch_id: String,
    pub branch_name: String,
    #[serde(default)]
    pub items: Vec<SaleItemRequest>,
}

/// A sale line. `id` is only meaningful on update, where it names the
/// existing line to keep.
#[derive(Debug, Deserialize)]
pub struct SaleItemRequest {
    pub id: Option<SaleItemId>,
    pub product_id: String,
    pub product_name: String,
    pub quantity: u32,
    pub unit_price_cents: i64,
}

#[derive(Debug, Deserialize)]
pub struct CancelItemRequest {
    pub reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ListSalesParams {
    pub page: Option<usize>,
    pub size: Option<usize>,
    pub customer_id: Option<String>,
    pub branch_id: Option<String>,
    pub status: Option<String>,
    pub order_by: Option<String>,
}

// -- Response types --

#[derive(Debug, Serialize)]
pub struct SaleResponse {
    pub id: String,
    pub sale_number: String,
    pub sale_date: DateTime<Utc>,
    pub customer_id: String,
    pub customer_name: String,
    pub branch_id: String,
    pub branch_name: String,
    pub status: String,
    pub is_cancelled: bool,
    pub total_amount_cents: i64,
    pub version: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub items: Vec<SaleItemResponse>,
}

#[derive(Debug, Serialize)]
pub struct SaleItemResponse {
    pub id: String,
    pub product_id: String,
    pub product_name: String,
    pub quantity: u32,
    pub unit_price_cents: i64,
    pub discount_percent: u8,
    pub total_amount_cents: i64,
    pub is_cancelled: bool,
}

impl From<&SaleItem> for SaleItemResponse {
    fn from(item: &SaleItem) -> Self {
        Self {
            id: item.id().to_string(),
            product_id: item.product_id().to_string(),
            product_name: item.product_name().to_string(),
            quantity: item.quantity(),
            unit_price_cents: item.unit_price().cents(),
            discount_percent: item.discount().percent(),
            total_amount_cents: item.total_amount().cents(),
            is_cancelled: item.is_cancelled(),
        }
    }
}

impl From<Sale> for SaleResponse {
    fn from(sale: Sale) -> Self {
        Self {
            id: sale.id().to_string(),
            sale_number: sale.sale_number().to_string(),
            sale_date: sale.sale_date(),
            customer_id: sale.customer_id().to_string(),
            customer_name: sale.customer_name().to_string(),
            branch_id: sale.branch_id().to_string(),
            branch_name: sale.branch_name().to_string(),
            status: sale.status().to_string(),
            is_cancelled: sale.is_cancelled(),
            total_amount_cents: sale.total_amount().cents(),
            version: sale.version().as_i64(),
            created_at: sale.created_at(),
            updated_at: sale.updated_at(),
            items: sale.items().iter().map(SaleItemResponse::from).collect(),
        }
    }
}

// -- Handlers --

/// POST /sales: create a sale with its lines.
#[tracing::instrument(skip(state, req), fields(sale_number = %req.sale_number))]
pub async fn create<R: SaleRepository + 'static>(
    State(state): State<Arc<AppState<R>>>,
    Json(req): Json<CreateSaleRequest>,
) -> Result<(StatusCode, Json<SaleResponse>), ApiError> {
    let cmd = CreateSale {
        sale_number: req.sale_number,
        customer_id: req.customer_id,
        customer_name: req.customer_name,
        branch_id: req.branch_id,
        branch_name: req.branch_name,
        sale_date: req.sale_date,
        items: req
            .items
            .into_iter()
            .map(|item| {
                CreateSaleItem::new(
                    item.product_id,
                    item.product_name,
                    item.quantity,
                    Money::from_cents(item.unit_price_cents),
                )
            })
            .collect(),
    };

    let sale = state.service.create_sale(cmd).await?;
    Ok((StatusCode::CREATED, Json(sale.into())))
}

/// GET /sales/{id}: load a sale by id.
#[tracing::instrument(skip(state))]
pub async fn get<R: SaleRepository + 'static>(
    State(state): State<Arc<AppState<R>>>,
    Path(id): Path<String>,
) -> Result<Json<SaleResponse>, ApiError> {
    let sale_id = parse_sale_id(&id)?;
    let sale = state
        .service
        .get_sale(sale_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Sale {id} not found")))?;

    Ok(Json(sale.into()))
}

/// GET /sales: list sales one page at a time.
#[tracing::instrument(skip(state))]
pub async fn list<R: SaleRepository + 'static>(
    State(state): State<Arc<AppState<R>>>,
    Query(params): Query<ListSalesParams>,
) -> Result<Json<Page<SaleResponse>>, ApiError> {
    let defaults = GetSales::default();
    let request = GetSales {
        page: params.page.unwrap_or(defaults.page),
        size: params.size.unwrap_or(defaults.size),
        customer_id: params.customer_id,
        branch_id: params.branch_id,
        status: params.status,
        order_by: params.order_by,
    };

    let page = state.service.list_sales(request).await?;
    Ok(Json(page.map(SaleResponse::from)))
}

/// PUT /sales/{id}: replace the customer, branch and lines of a sale.
#[tracing::instrument(skip(state, req))]
pub async fn update<R: SaleRepository + 'static>(
    State(state): State<Arc<AppState<R>>>,
    Path(id): Path<String>,
    Json(req): Json<UpdateSaleRequest>,
) -> Result<Json<SaleResponse>, ApiError> {
    let cmd = UpdateSale {
        id: parse_sale_id(&id)?,
        customer_id: req.customer_id,
        customer_name: req.customer_name,
        branch_id: req.branch_id,
        branch_name: req.branch_name,
        items: req
            .items
            .into_iter()
            .map(|item| UpdateSaleItem {
                id: item.id,
                product_id: item.product_id,
                product_name: item.product_name,
                quantity: item.quantity,
                unit_price: Money::from_cents(item.unit_price_cents),
            })
            .collect(),
    };

    let sale = state.service.update_sale(cmd).await?;
    Ok(Json(sale.into()))
}

/// DELETE /sales/{id}: delete a sale.
#[tracing::instrument(skip(state))]
pub async fn delete<R: SaleRepository + 'static>(
    State(state): State<Arc<AppState<R>>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let sale_id = parse_sale_id(&id)?;
    state.service.delete_sale(DeleteSale::new(sale_id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /sales/{id}/cancel: cancel a whole sale.
#[tracing::instrument(skip(state))]
pub async fn cancel<R: SaleRepository + 'static>(
    State(state): State<Arc<AppState<R>>>,
    Path(id): Path<String>,
) -> Result<Json<SaleResponse>, ApiError> {
    let sale_id = parse_sale_id(&id)?;
    let sale = state.service.cancel_sale(CancelSale::new(sale_id)).await?;
    Ok(Json(sale.into()))
}

/// POST /sales/{id}/items/{item_id}/cancel: cancel one line.
///
/// The body is optional; when present it may carry a `reason`.
#[tracing::instrument(skip(state, body))]
pub async fn cancel_item<R: SaleRepository + 'static>(
    State(state): State<Arc<AppState<R>>>,
    Path((id, item_id)): Path<(String, String)>,
    body: Bytes,
) -> Result<Json<SaleResponse>, ApiError> {
    let sale_id = parse_sale_id(&id)?;
    let item_id: SaleItemId = item_id
        .parse()
        .map_err(|e| ApiError::BadRequest(format!("Invalid item ID format: {e}")))?;

    let reason = if body.iter().all(u8::is_ascii_whitespace) {
        None
    } else {
        serde_json::from_slice::<CancelItemRequest>(&body)
            .map_err(|e| ApiError::BadRequest(format!("Invalid request body: {e}")))?
            .reason
    };

    let cmd = CancelItem {
        sale_id,
        item_id,
        reason,
    };
    let sale = state.service.cancel_item(cmd).await?;
    Ok(Json(sale.into()))
}

fn parse_sale_id(id: &str) -> Result<SaleId, ApiError> {
    id.parse()
        .map_err(|e| ApiError::BadRequest(format!("Invalid ID format: {e}")))
}
