use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{api::handlers, rates::RateProvider};

/// Create the application router with all endpoints
pub fn create_router(provider: Arc<dyn RateProvider>) -> Router {
    // The original browser client is served from a different origin
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/cart-calculate", post(handlers::cart_calculate))
        .with_state(provider)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
