//! HTTP API server for the bakery order system.
//!
//! Provides REST endpoints for orders (the lifecycle core), the product
//! catalog, and clients, with structured logging (tracing) and Prometheus
//! metrics.

pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::routing::{delete, get, patch, post, put};
use domain::OrderService;
use metrics_exporter_prometheus::PrometheusHandle;
use storage::PgStore;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use routes::orders::AppState;

/// Creates the application state from a connected store.
pub fn create_state(store: PgStore) -> Arc<AppState> {
    Arc::new(AppState {
        order_service: OrderService::new(store.clone()),
        store,
    })
}

/// Creates the Axum application router with all routes and shared state.
pub fn create_app(state: Arc<AppState>, metrics_handle: PrometheusHandle) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::get))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::health::check))
        .route("/orders", post(routes::orders::create))
        .route("/orders", get(routes::orders::list))
        .route("/orders/{id}", get(routes::orders::get))
        .route("/orders/{id}", put(routes::orders::update))
        .route("/orders/{id}", delete(routes::orders::delete))
        .route("/orders/{id}/status", patch(routes::orders::change_status))
        .route("/products", post(routes::products::create))
        .route("/products", get(routes::products::list))
        .route("/products/{id}", get(routes::products::get))
        .route("/products/{id}", put(routes::products::update))
        .route("/products/{id}", delete(routes::products::delete))
        .route("/clients", post(routes::clients::create))
        .route("/clients", get(routes::clients::list))
        .route("/clients/{id}", get(routes::clients::get))
        .route("/clients/{id}", put(routes::clients::update))
        .route("/clients/{id}", delete(routes::clients::delete))
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
