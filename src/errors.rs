use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use thiserror::Error;
use tracing::error;

use crate::external::price_provider::PriceProviderError;
use crate::models::ErrorResponse;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Insufficient data: {0}")]
    InsufficientData(String),
    #[error("Rate limited by external provider")]
    RateLimited,
    #[error("External error: {0}")]
    Upstream(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::InsufficientData(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            AppError::Upstream(_) => StatusCode::BAD_GATEWAY,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub fn error_body(message: impl Into<String>) -> Json<ErrorResponse> {
    Json(ErrorResponse { error: message.into() })
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();
        match self {
            AppError::Validation(msg) | AppError::NotFound(msg) | AppError::InsufficientData(msg) => {
                (status, error_body(msg)).into_response()
            }
            AppError::RateLimited => {
                let mut headers = HeaderMap::new();
                headers.insert("Retry-After", HeaderValue::from_static("60"));
                (status, headers, error_body("Rate limited")).into_response()
            }
            // upstream and internal details stay in the logs
            AppError::Upstream(_) => (status, error_body("Price provider unavailable")).into_response(),
            AppError::Internal(msg) => {
                error!("Internal server error: {}", msg);
                (status, error_body("Internal server error")).into_response()
            }
        }
    }
}

impl From<PriceProviderError> for AppError {
    fn from(value: PriceProviderError) -> Self {
        match value {
            PriceProviderError::NotFound => AppError::NotFound("Symbol not found".to_string()),
            PriceProviderError::RateLimited => AppError::RateLimited,
            PriceProviderError::Network(msg) => AppError::Upstream(msg),
            PriceProviderError::MalformedResponse(msg) => AppError::Upstream(msg),
        }
    }
}
