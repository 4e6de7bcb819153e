//! HTTP API server for the sales backend.
//!
//! Exposes sale CRUD and cancellation over REST, plus an inspection
//! endpoint for the simulated message bus, with structured logging
//! (tracing) and Prometheus metrics.

pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;
use std::time::Duration;

use application::SaleService;
use axum::Router;
use axum::routing::{get, post};
use message_broker::{FakeServiceBus, InMemoryMessageStore};
use metrics_exporter_prometheus::PrometheusHandle;
use sale_store::SaleRepository;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use routes::sales::AppState;

/// Creates the Axum application router with all routes and shared state.
pub fn create_app<R: SaleRepository + 'static>(
    state: Arc<AppState<R>>,
    metrics_handle: PrometheusHandle,
) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::get))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::health::check))
        .route(
            "/sales",
            post(routes::sales::create::<R>).get(routes::sales::list::<R>),
        )
        .route(
            "/sales/{id}",
            get(routes::sales::get::<R>)
                .put(routes::sales::update::<R>)
                .delete(routes::sales::delete::<R>),
        )
        .route("/sales/{id}/cancel", post(routes::sales::cancel::<R>))
        .route(
            "/sales/{id}/items/{item_id}/cancel",
            post(routes::sales::cancel_item::<R>),
        )
        .route("/messages", get(routes::messages::list::<R>))
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

/// Creates the application state over a sale repository, with a fresh
/// simulated bus that waits `broker_delay` per publish.
pub fn create_state<R: SaleRepository>(repository: R, broker_delay: Duration) -> Arc<AppState<R>> {
    let broker = FakeServiceBus::new(InMemoryMessageStore::new()).with_delay(broker_delay);
    Arc::new(AppState {
        service: SaleService::new(repository, broker),
    })
}
