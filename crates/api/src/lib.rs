//! HTTP API server with observability for the PVZ service.
//!
//! Provides REST endpoints for pickup points, receptions and products,
//! with structured logging (tracing) and Prometheus metrics. The router is
//! generic over the storage backend so tests can run against the in-memory
//! store.

pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use store::{PickupPointStore, ProductStore, ReceptionStore};

pub use routes::pvz::AppState;

/// Creates the Axum application router with all routes and shared state.
pub fn create_app<S>(state: Arc<AppState<S>>, metrics_handle: PrometheusHandle) -> Router
where
    S: PickupPointStore + ReceptionStore + ProductStore + Clone + Send + Sync + 'static,
{
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::get))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::health::check))
        .route("/pvz", post(routes::pvz::create::<S>))
        .route("/pvz", get(routes::pvz::list::<S>))
        .route("/pvz/all", get(routes::pvz::all::<S>))
        .route(
            "/pvz/{pvz_id}/close_last_reception",
            post(routes::reception::close_last::<S>),
        )
        .route(
            "/pvz/{pvz_id}/delete_last_product",
            post(routes::product::delete_last::<S>),
        )
        .route("/receptions", post(routes::reception::create::<S>))
        .route("/products", post(routes::product::create::<S>))
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

/// Creates the application state over the given store.
pub fn create_state<S: Clone + PickupPointStore + ReceptionStore + ProductStore>(
    store: S,
) -> Arc<AppState<S>> {
    Arc::new(AppState::new(store))
}
