use axum::{extract::State, response::IntoResponse, Json};
use serde::Deserialize;
use std::sync::Arc;

use crate::api::error::{ApiError, Result};
use crate::cart::{self, LineItem};
use crate::rates::RateProvider;

pub type ProviderState = Arc<dyn RateProvider>;

#[derive(Debug, Deserialize)]
pub struct CalculateRequest {
    pub cart: Vec<LineItem>,
}

/// POST /cart-calculate
/// Fetches the current rate pair and returns the cart total in RUB/USD/EUR.
pub async fn cart_calculate(
    State(provider): State<ProviderState>,
    Json(request): Json<CalculateRequest>,
) -> Result<impl IntoResponse> {
    let rates = provider.fetch_rates().await.map_err(|e| {
        tracing::warn!(error = %e, "Rate fetch failed");
        ApiError::RatesUnavailable
    })?;

    let summary = cart::calculate(&request.cart, &rates);
    tracing::debug!(items = request.cart.len(), total_rub = summary.rub, "Calculated cart total");

    Ok(Json(summary))
}

/// GET /health
/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "multicart"
    }))
}
