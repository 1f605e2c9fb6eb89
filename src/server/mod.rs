//! HTTP front end

pub mod error;
pub mod routes;

use crate::metrics::ServiceMetrics;
use crate::models::InferenceEngine;
use crate::presenter::Presenter;
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use error::AppError;

/// Shared, read-only state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub engine: InferenceEngine,
    pub presenter: Arc<Presenter>,
    pub metrics: Arc<ServiceMetrics>,
}

impl AppState {
    pub fn new(engine: InferenceEngine, presenter: Presenter, metrics: Arc<ServiceMetrics>) -> Self {
        Self {
            engine,
            presenter: Arc::new(presenter),
            metrics,
        }
    }
}

/// Build the router with all pages, API routes and middleware
pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Pages
        .route("/", get(routes::home))
        .route("/Predict", get(routes::prediction_form))
        .route("/form", post(routes::submit_form))
        // JSON API
        .route("/api/predict", post(routes::api_predict))
        .route("/api/health", get(routes::health_check))
        .route("/api/stats", get(routes::stats))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods(Any)
                        .allow_headers(Any),
                ),
        )
        .with_state(state)
}
