//! Route table for the scoring service

use super::handlers;
use super::state::PredictorContext;
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

/// Build the router over a loaded context
pub fn create_router(ctx: Arc<PredictorContext>) -> Router {
    // Browser front ends call the service cross-origin
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/predict", post(handlers::predict))
        .route("/health", get(handlers::health_check))
        .fallback(handlers::handle_404)
        .with_state(ctx)
        .layer(cors)
}
