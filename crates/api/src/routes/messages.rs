//! Inspection endpoint for the simulated message bus.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Query, State};
use message_broker::{MessageDocument, MessageStore};
use sale_store::SaleRepository;
use serde::Deserialize;

use crate::error::ApiError;
use crate::routes::sales::AppState;

#[derive(Debug, Deserialize)]
pub struct MessagesParams {
    pub event_type: Option<String>,
}

/// GET /messages: list published messages in publication order.
#[tracing::instrument(skip(state))]
pub async fn list<R: SaleRepository + 'static>(
    State(state): State<Arc<AppState<R>>>,
    Query(params): Query<MessagesParams>,
) -> Result<Json<Vec<MessageDocument>>, ApiError> {
    let messages = state
        .service
        .broker()
        .store()
        .messages(params.event_type.as_deref())
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    Ok(Json(messages))
}
