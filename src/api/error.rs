use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Upstream rate feed unreachable or unparseable. The contract exposes
    /// this as a bare 404 with no body; the cause is only logged.
    #[error("Exchange rates unavailable")]
    RatesUnavailable,

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::RatesUnavailable => StatusCode::NOT_FOUND.into_response(),
            ApiError::Internal(_) => {
                let body = Json(json!({ "error": self.to_string() }));
                (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
            }
        }
    }
}
